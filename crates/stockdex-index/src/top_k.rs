//! Top-K selection by walking an ordered index from its maximum end
//!
//! Costs O(log N + K): the walk positions on the maximum entry and then steps
//! through in-order predecessors. Nothing is sorted at query time.

use crate::ordered::{Descending, OrderedIndex};
use std::collections::HashMap;
use stockdex_types::Item;

/// Field a top-K query ranks by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankBy {
    /// Highest unit price first
    Price,
    /// Highest quantity first
    Quantity,
}

impl std::fmt::Display for RankBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankBy::Price => write!(f, "price"),
            RankBy::Quantity => write!(f, "quantity"),
        }
    }
}

/// Lazy top-K walk resolving index entries to items
///
/// Yields at most `k` items, strictly descending by the ranked field, ties in
/// ascending key order.
pub struct TopK<'a, K> {
    walk: Descending<'a, K>,
    items: &'a HashMap<String, Item>,
    remaining: usize,
}

impl<'a, K: Ord + Copy> TopK<'a, K> {
    pub(crate) fn new(index: &'a OrderedIndex<K>, items: &'a HashMap<String, Item>, k: usize) -> Self {
        Self {
            walk: index.descending(),
            items,
            remaining: k,
        }
    }
}

impl<'a, K: Copy> Iterator for TopK<'a, K> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.walk.next()?;
        self.remaining -= 1;
        let item = self.items.get(entry.key);
        debug_assert!(item.is_some(), "index entry without item: {}", entry.key);
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
