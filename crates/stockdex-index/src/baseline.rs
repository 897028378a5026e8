//! Unindexed inventory that answers every query by scanning
//!
//! Same operations and error semantics as [`InventoryIndex`](crate::InventoryIndex),
//! but range queries are O(N) and top-K is O(N + K log K) partial selection.
//! Serves as the reference in cross-checks and as the "before" side of the
//! performance comparison.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use stockdex_types::{InventoryError, Item, Metadata, Result, Totals};

use crate::{
    inventory::{checked_weight, validate, UpsertOutcome},
    top_k::RankBy,
};

/// Hash map inventory without secondary indexes
#[derive(Debug, Clone, Default)]
pub struct ScanInventory {
    items: HashMap<String, Item>,
    /// Running sum over all items, used only for overflow checks
    total: Totals,
}

impl ScanInventory {
    /// Create an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item
    pub fn upsert(
        &mut self,
        key: impl Into<String>,
        price: Decimal,
        quantity: i64,
    ) -> Result<UpsertOutcome> {
        self.upsert_with_metadata(key, price, quantity, Metadata::new())
    }

    /// Insert or replace an item with metadata
    pub fn upsert_with_metadata(
        &mut self,
        key: impl Into<String>,
        price: Decimal,
        quantity: i64,
        metadata: Metadata,
    ) -> Result<UpsertOutcome> {
        let quantity = validate(price, quantity)?;
        let key = key.into();
        let weight = checked_weight(self.total, self.items.get(&key), price, quantity)?;

        let item = Item {
            key: key.clone(),
            price,
            quantity,
            metadata,
        };
        let outcome = match self.items.insert(key, item) {
            Some(old) => {
                self.total = self.total - Totals::of_item(&old);
                UpsertOutcome::Updated
            }
            None => UpsertOutcome::Inserted,
        };
        self.total += weight;
        Ok(outcome)
    }

    /// Remove an item
    pub fn remove(&mut self, key: &str) -> Result<Item> {
        let item = self
            .items
            .remove(key)
            .ok_or_else(|| InventoryError::not_found(key))?;
        self.total = self.total - Totals::of_item(&item);
        Ok(item)
    }

    /// Get an item
    pub fn get(&self, key: &str) -> Result<&Item> {
        self.items
            .get(key)
            .ok_or_else(|| InventoryError::not_found(key))
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the inventory is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over items in map order
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.values()
    }

    /// Quantity and value of the whole inventory
    pub fn total(&self) -> Totals {
        self.total
    }

    /// Quantity and value of items priced in `[lo, hi]` (full scan)
    pub fn range_totals(&self, lo: Decimal, hi: Decimal) -> Totals {
        self.items
            .values()
            .filter(|item| lo <= item.price && item.price <= hi)
            .sum()
    }

    /// Total quantity of items priced in `[lo, hi]`
    pub fn range_quantity(&self, lo: Decimal, hi: Decimal) -> u64 {
        self.range_totals(lo, hi).quantity
    }

    /// Total value of items priced in `[lo, hi]`
    pub fn range_value(&self, lo: Decimal, hi: Decimal) -> Decimal {
        self.range_totals(lo, hi).value
    }

    /// Top `k` items by the chosen field, ties in ascending key order
    pub fn top_k(&self, rank_by: RankBy, k: usize) -> Vec<&Item> {
        match rank_by {
            RankBy::Price => self.top_by(k, |item| item.price),
            RankBy::Quantity => self.top_by(k, |item| Decimal::from(item.quantity)),
        }
    }

    /// The `k` most expensive items
    pub fn top_k_price(&self, k: usize) -> Vec<&Item> {
        self.top_k(RankBy::Price, k)
    }

    /// The `k` items with the largest quantity
    pub fn top_k_quantity(&self, k: usize) -> Vec<&Item> {
        self.top_k(RankBy::Quantity, k)
    }

    fn top_by(&self, k: usize, field: impl Fn(&Item) -> Decimal) -> Vec<&Item> {
        if k == 0 {
            return Vec::new();
        }

        let rank = |a: &&Item, b: &&Item| -> Ordering {
            field(b).cmp(&field(a)).then_with(|| a.key.cmp(&b.key))
        };

        let mut all: Vec<&Item> = self.items.values().collect();
        if k < all.len() {
            all.select_nth_unstable_by(k - 1, &rank);
            all.truncate(k);
        }
        all.sort_unstable_by(&rank);
        all
    }
}
