//! Thread-safe inventory handle
//!
//! One `parking_lot::RwLock` guards the map and both indexes as a single unit
//! of state. Mutations take the write side; every query takes the read side,
//! so readers run in parallel and never observe a half-applied mutation.
//!
//! # Example
//!
//! ```
//! use stockdex_index::SharedInventory;
//! use rust_decimal_macros::dec;
//! use std::thread;
//!
//! let inventory = SharedInventory::new();
//!
//! thread::scope(|s| {
//!     for t in 0..4 {
//!         let inventory = inventory.clone();
//!         s.spawn(move || {
//!             for i in 0..100 {
//!                 inventory.upsert(format!("t{t}-{i}"), dec!(1.5), i).unwrap();
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(inventory.len(), 400);
//! ```

use crate::{
    config::{ConfigError, IndexConfig},
    inventory::{InventoryIndex, InventorySnapshot, UpsertOutcome},
    top_k::RankBy,
};
use parking_lot::{RwLock, RwLockReadGuard};
use rust_decimal::Decimal;
use std::sync::Arc;
use stockdex_types::{Item, Metadata, Result, Totals};
use tracing::{debug, instrument};

/// Cloneable handle to an inventory shared between threads
///
/// Every clone refers to the same inventory. Each method is linearizable:
/// it takes effect atomically while holding the lock.
#[derive(Debug, Clone, Default)]
pub struct SharedInventory {
    inner: Arc<RwLock<InventoryIndex>>,
}

impl SharedInventory {
    /// Create an empty shared inventory with the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty shared inventory from a config
    pub fn with_config(config: IndexConfig) -> std::result::Result<Self, ConfigError> {
        let index = InventoryIndex::with_config(config)?;
        debug!(inventory = index.name(), "shared inventory created");
        Ok(Self::from(index))
    }

    /// Get the inventory name
    pub fn name(&self) -> String {
        self.inner.read().name().to_string()
    }

    /// Acquire the shared read guard
    ///
    /// Hold the guard while consuming lazy iterators such as
    /// [`InventoryIndex::iter`] or [`InventoryIndex::items_in_price_range`]
    /// to see one consistent state. Writers block until it is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, InventoryIndex> {
        self.inner.read()
    }

    // ========================================================================
    // Mutations (exclusive)
    // ========================================================================

    /// Insert or replace an item
    #[instrument(level = "debug", skip(self, key))]
    pub fn upsert(
        &self,
        key: impl Into<String>,
        price: Decimal,
        quantity: i64,
    ) -> Result<UpsertOutcome> {
        self.inner.write().upsert(key, price, quantity)
    }

    /// Insert or replace an item with metadata
    #[instrument(level = "debug", skip(self, key, metadata))]
    pub fn upsert_with_metadata(
        &self,
        key: impl Into<String>,
        price: Decimal,
        quantity: i64,
        metadata: Metadata,
    ) -> Result<UpsertOutcome> {
        self.inner
            .write()
            .upsert_with_metadata(key, price, quantity, metadata)
    }

    /// Remove an item, returning it
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&self, key: &str) -> Result<Item> {
        self.inner.write().remove(key)
    }

    /// Remove every item
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    // ========================================================================
    // Queries (shared)
    // ========================================================================

    /// Get a copy of an item
    pub fn get(&self, key: &str) -> Result<Item> {
        self.inner.read().get(key).cloned()
    }

    /// Check if a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().contains(key)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the inventory is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Quantity and value of items priced in `[lo, hi]`
    pub fn range_totals(&self, lo: Decimal, hi: Decimal) -> Totals {
        self.inner.read().range_totals(lo, hi)
    }

    /// Total quantity of items priced in `[lo, hi]`
    pub fn range_quantity(&self, lo: Decimal, hi: Decimal) -> u64 {
        self.inner.read().range_quantity(lo, hi)
    }

    /// Total value of items priced in `[lo, hi]`
    pub fn range_value(&self, lo: Decimal, hi: Decimal) -> Decimal {
        self.inner.read().range_value(lo, hi)
    }

    /// Number of items priced in `[lo, hi]`
    pub fn range_count(&self, lo: Decimal, hi: Decimal) -> usize {
        self.inner.read().range_count(lo, hi)
    }

    /// Quantity and value of the whole inventory
    pub fn total(&self) -> Totals {
        self.inner.read().total()
    }

    /// The `k` most expensive items
    pub fn top_k_price(&self, k: usize) -> Vec<Item> {
        self.inner.read().top_k_price(k).cloned().collect()
    }

    /// The `k` items with the largest quantity
    pub fn top_k_quantity(&self, k: usize) -> Vec<Item> {
        self.inner.read().top_k_quantity(k).cloned().collect()
    }

    /// Top `k` items by the chosen field
    pub fn top_k(&self, rank_by: RankBy, k: usize) -> Vec<Item> {
        match rank_by {
            RankBy::Price => self.top_k_price(k),
            RankBy::Quantity => self.top_k_quantity(k),
        }
    }

    /// Copy of every item, taken under one read lock
    pub fn items(&self) -> Vec<Item> {
        self.inner.read().iter().cloned().collect()
    }

    /// Serializable snapshot, taken under one read lock
    pub fn snapshot(&self) -> InventorySnapshot {
        self.inner.read().snapshot()
    }

    /// Verify map/index consistency under one read lock
    pub fn is_consistent(&self) -> bool {
        self.inner.read().is_consistent()
    }
}

impl From<InventoryIndex> for SharedInventory {
    fn from(index: InventoryIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::thread;

    #[test]
    fn test_clones_share_state() {
        let a = SharedInventory::new();
        let b = a.clone();

        a.upsert("apple", dec!(1.25), 100).unwrap();
        assert_eq!(b.get("apple").unwrap().quantity, 100);

        b.remove("apple").unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn test_read_guard_iteration() {
        let inventory = SharedInventory::new();
        inventory.upsert("a", dec!(1), 1).unwrap();
        inventory.upsert("b", dec!(2), 2).unwrap();

        let guard = inventory.read();
        let in_range: Vec<_> = guard
            .items_in_price_range(dec!(1), dec!(2))
            .map(|item| item.key.clone())
            .collect();
        assert_eq!(in_range, vec!["a", "b"]);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let inventory = SharedInventory::new();

        thread::scope(|s| {
            for t in 0..4i64 {
                let inventory = inventory.clone();
                s.spawn(move || {
                    for i in 0..250i64 {
                        let key = format!("w{t}-{i}");
                        inventory.upsert(key.as_str(), Decimal::from(i), t + 1).unwrap();
                        if i % 5 == 0 {
                            inventory.remove(&key).unwrap();
                        }
                    }
                });
            }
            for _ in 0..2 {
                let inventory = inventory.clone();
                s.spawn(move || {
                    for _ in 0..200 {
                        let guard = inventory.read();
                        // Root aggregate must equal the sum over visible items
                        let visible: Totals = guard.iter().sum();
                        assert_eq!(visible, guard.total());
                        assert_eq!(guard.iter().count(), guard.len());
                    }
                });
            }
        });

        assert_eq!(inventory.len(), 4 * 200);
        assert!(inventory.is_consistent());
    }

    #[test]
    fn test_with_config_name() {
        let inventory = SharedInventory::with_config(IndexConfig::new("depot")).unwrap();
        assert_eq!(inventory.name(), "depot");
        assert_eq!(inventory.snapshot().name, "depot");
    }
}
