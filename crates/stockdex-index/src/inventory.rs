//! Inventory index: primary map plus price and quantity indexes
//!
//! Every mutation keeps three structures in step:
//!
//! ```text
//! items:       key -> Item                 (O(1) lookup)
//! by_price:    (price, key)    -> weight   (range totals, top-K by price)
//! by_quantity: (quantity, key) -> weight   (top-K by quantity)
//! ```
//!
//! This type is single-threaded; wrap it in
//! [`SharedInventory`](crate::SharedInventory) for concurrent use.

use crate::{
    config::{ConfigError, IndexConfig},
    ordered::OrderedIndex,
    top_k::{RankBy, TopK},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stockdex_types::{InventoryError, Item, Metadata, Result, Totals};
use tracing::{debug, trace};

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The key was new
    Inserted,
    /// An existing item was replaced
    Updated,
}

/// Indexed inventory with O(log N) mutations and range/top-K queries
#[derive(Debug, Clone)]
pub struct InventoryIndex {
    /// Name for log events and snapshots
    name: String,
    /// Primary storage
    items: HashMap<String, Item>,
    /// Entries keyed by `(price, key)`
    by_price: OrderedIndex<Decimal>,
    /// Entries keyed by `(quantity, key)`
    by_quantity: OrderedIndex<u64>,
}

impl Default for InventoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject negative price or quantity before anything is touched
pub(crate) fn validate(price: Decimal, quantity: i64) -> Result<u64> {
    if price < Decimal::ZERO {
        return Err(InventoryError::invalid_input("price", price));
    }
    u64::try_from(quantity).map_err(|_| InventoryError::invalid_input("quantity", quantity))
}

/// Weight of a validated price/quantity pair
///
/// Fails if the pair, added to `total` with `replaced` taken out, would not
/// fit. Every subtree aggregate is bounded by the root total, so once this
/// passes no aggregate update can overflow.
pub(crate) fn checked_weight(
    total: Totals,
    replaced: Option<&Item>,
    price: Decimal,
    quantity: u64,
) -> Result<Totals> {
    let weight =
        Totals::checked_of(price, quantity).ok_or_else(|| InventoryError::overflow("price", price))?;
    let base = replaced.map_or(total, |old| total - Totals::of_item(old));

    if base.quantity.checked_add(weight.quantity).is_none() {
        return Err(InventoryError::overflow("quantity", quantity));
    }
    if base.value.checked_add(weight.value).is_none() {
        return Err(InventoryError::overflow("price", price));
    }
    Ok(weight)
}

impl InventoryIndex {
    /// Create an empty inventory with the default config
    pub fn new() -> Self {
        Self::from_valid_config(IndexConfig::default())
    }

    /// Create an empty inventory from a config
    pub fn with_config(config: IndexConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: IndexConfig) -> Self {
        Self {
            name: config.name,
            items: HashMap::with_capacity(config.initial_capacity),
            by_price: OrderedIndex::new(),
            by_quantity: OrderedIndex::new(),
        }
    }

    /// Get the inventory name
    pub fn name(&self) -> &str {
        &self.name
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Insert a new item or replace an existing one's price and quantity
    ///
    /// Any metadata previously stored for the key is cleared.
    pub fn upsert(
        &mut self,
        key: impl Into<String>,
        price: Decimal,
        quantity: i64,
    ) -> Result<UpsertOutcome> {
        self.upsert_with_metadata(key, price, quantity, Metadata::new())
    }

    /// Insert or replace an item, attaching metadata
    ///
    /// Fails with [`InventoryError::InvalidInput`] if `price` or `quantity` is
    /// negative, or if the inventory's summed quantity or value would
    /// overflow. The inventory is left unchanged on failure.
    pub fn upsert_with_metadata(
        &mut self,
        key: impl Into<String>,
        price: Decimal,
        quantity: i64,
        metadata: Metadata,
    ) -> Result<UpsertOutcome> {
        let quantity = validate(price, quantity)?;
        let key = key.into();
        let weight = checked_weight(self.total(), self.items.get(&key), price, quantity)?;

        let outcome = match self.items.get(&key) {
            Some(old) => {
                let stale_price = self.by_price.remove(old.price, &key);
                let stale_quantity = self.by_quantity.remove(old.quantity, &key);
                debug_assert!(
                    stale_price.is_some() && stale_quantity.is_some(),
                    "missing index entry for {key}"
                );
                UpsertOutcome::Updated
            }
            None => UpsertOutcome::Inserted,
        };

        let fresh_price = self.by_price.insert(price, &key, weight);
        let fresh_quantity = self.by_quantity.insert(quantity, &key, weight);
        debug_assert!(fresh_price && fresh_quantity, "duplicate index entry for {key}");

        trace!(inventory = %self.name, key = %key, %price, quantity, ?outcome, "item upserted");

        self.items.insert(
            key.clone(),
            Item {
                key,
                price,
                quantity,
                metadata,
            },
        );

        Ok(outcome)
    }

    /// Remove an item
    ///
    /// Returns the removed item, or [`InventoryError::NotFound`]
    pub fn remove(&mut self, key: &str) -> Result<Item> {
        let item = self
            .items
            .remove(key)
            .ok_or_else(|| InventoryError::not_found(key))?;

        let price_entry = self.by_price.remove(item.price, key);
        let quantity_entry = self.by_quantity.remove(item.quantity, key);
        debug_assert!(
            price_entry.is_some() && quantity_entry.is_some(),
            "missing index entry for {key}"
        );

        trace!(inventory = %self.name, key, "item removed");
        Ok(item)
    }

    /// Remove every item
    pub fn clear(&mut self) {
        debug!(inventory = %self.name, items = self.items.len(), "clearing inventory");
        self.items.clear();
        self.by_price.clear();
        self.by_quantity.clear();
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Get an item by key (O(1))
    pub fn get(&self, key: &str) -> Result<&Item> {
        self.items
            .get(key)
            .ok_or_else(|| InventoryError::not_found(key))
    }

    /// Check if a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Number of items (O(1))
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the inventory is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all items in ascending `(price, key desc)` order
    ///
    /// The order is stable for an unchanged inventory.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.by_price
            .iter()
            .filter_map(move |entry| self.items.get(entry.key))
    }

    // ========================================================================
    // Range Aggregation
    // ========================================================================

    /// Quantity and value of items priced in `[lo, hi]` (O(log N))
    pub fn range_totals(&self, lo: Decimal, hi: Decimal) -> Totals {
        self.by_price.range_totals(lo, hi)
    }

    /// Total quantity of items priced in `[lo, hi]`
    pub fn range_quantity(&self, lo: Decimal, hi: Decimal) -> u64 {
        self.range_totals(lo, hi).quantity
    }

    /// Total `price * quantity` of items priced in `[lo, hi]`
    pub fn range_value(&self, lo: Decimal, hi: Decimal) -> Decimal {
        self.range_totals(lo, hi).value
    }

    /// Number of items priced in `[lo, hi]` (O(log N))
    pub fn range_count(&self, lo: Decimal, hi: Decimal) -> usize {
        self.by_price.range_count(lo, hi)
    }

    /// Items priced in `[lo, hi]`, cheapest first
    pub fn items_in_price_range(
        &self,
        lo: Decimal,
        hi: Decimal,
    ) -> impl Iterator<Item = &Item> + '_ {
        self.by_price
            .range(lo, hi)
            .filter_map(move |entry| self.items.get(entry.key))
    }

    /// Quantity and value of the whole inventory (O(1))
    pub fn total(&self) -> Totals {
        self.by_price.totals()
    }

    // ========================================================================
    // Top-K
    // ========================================================================

    /// The `k` most expensive items, ties in ascending key order
    pub fn top_k_price(&self, k: usize) -> TopK<'_, Decimal> {
        TopK::new(&self.by_price, &self.items, k)
    }

    /// The `k` items with the largest quantity, ties in ascending key order
    pub fn top_k_quantity(&self, k: usize) -> TopK<'_, u64> {
        TopK::new(&self.by_quantity, &self.items, k)
    }

    /// Top `k` items by the chosen field, collected
    pub fn top_k(&self, rank_by: RankBy, k: usize) -> Vec<&Item> {
        match rank_by {
            RankBy::Price => self.top_k_price(k).collect(),
            RankBy::Quantity => self.top_k_quantity(k).collect(),
        }
    }

    // ========================================================================
    // Snapshots and Consistency
    // ========================================================================

    /// Capture every item as an owned, serializable snapshot
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            name: self.name.clone(),
            items: self.iter().cloned().collect(),
            totals: self.total(),
        }
    }

    /// Verify that the map and both indexes describe the same items
    ///
    /// O(N). Intended for tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        let n = self.items.len();
        if self.by_price.len() != n || self.by_quantity.len() != n {
            return false;
        }
        if !self.by_price.is_well_formed() || !self.by_quantity.is_well_formed() {
            return false;
        }

        let price_ok = self.by_price.iter().all(|entry| {
            self.items.get(entry.key).map_or(false, |item| {
                item.price == entry.sort_key && entry.weight == Totals::of_item(item)
            })
        });
        let quantity_ok = self.by_quantity.iter().all(|entry| {
            self.items.get(entry.key).map_or(false, |item| {
                item.quantity == entry.sort_key && entry.weight == Totals::of_item(item)
            })
        });

        price_ok && quantity_ok
    }
}

/// Owned copy of the inventory at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Inventory name
    pub name: String,
    /// Items in ascending price order
    pub items: Vec<Item>,
    /// Totals over all items
    pub totals: Totals,
}

impl InventorySnapshot {
    /// Number of items captured
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the snapshot holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by key (linear scan)
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.key == key)
    }
}
