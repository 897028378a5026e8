//! Range aggregation over the ordered index
//!
//! Answers "how much quantity / value lies in `[lo, hi]`" in O(log N) by
//! descending to the first node inside the range (the split node), then
//! walking its two boundary paths. On the lower path every node at or above
//! `lo` contributes itself plus its whole right subtree; on the upper path
//! every node at or below `hi` contributes itself plus its whole left subtree.
//! No entry inside the range is visited individually.

use crate::ordered::{self, Link, Node, OrderedIndex};
use std::ops::Add;
use stockdex_types::Totals;

/// Entry count and totals of a set of entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Span {
    count: usize,
    totals: Totals,
}

impl Span {
    fn of_node<K>(node: &Node<K>) -> Self {
        Self {
            count: 1,
            totals: node.weight,
        }
    }

    fn of_subtree<K>(link: &Link<K>) -> Self {
        Self {
            count: ordered::size(link),
            totals: ordered::totals(link),
        }
    }
}

impl Add for Span {
    type Output = Span;

    fn add(self, rhs: Span) -> Span {
        Span {
            count: self.count + rhs.count,
            totals: self.totals + rhs.totals,
        }
    }
}

/// Entries with `sort_key >= lo` in the subtree
fn span_at_least<K: Ord>(mut cur: Option<&Node<K>>, lo: &K) -> Span {
    let mut acc = Span::default();
    while let Some(node) = cur {
        if node.sort_key >= *lo {
            acc = acc + Span::of_node(node) + Span::of_subtree(&node.right);
            cur = node.left.as_deref();
        } else {
            cur = node.right.as_deref();
        }
    }
    acc
}

/// Entries with `sort_key <= hi` in the subtree
fn span_at_most<K: Ord>(mut cur: Option<&Node<K>>, hi: &K) -> Span {
    let mut acc = Span::default();
    while let Some(node) = cur {
        if node.sort_key <= *hi {
            acc = acc + Span::of_subtree(&node.left) + Span::of_node(node);
            cur = node.right.as_deref();
        } else {
            cur = node.left.as_deref();
        }
    }
    acc
}

fn span_between<K: Ord>(root: &Link<K>, lo: &K, hi: &K) -> Span {
    if lo > hi {
        return Span::default();
    }

    let mut cur = root.as_deref();
    while let Some(node) = cur {
        if node.sort_key < *lo {
            cur = node.right.as_deref();
        } else if node.sort_key > *hi {
            cur = node.left.as_deref();
        } else {
            return span_at_least(node.left.as_deref(), lo)
                + Span::of_node(node)
                + span_at_most(node.right.as_deref(), hi);
        }
    }
    Span::default()
}

impl<K: Ord + Copy> OrderedIndex<K> {
    /// Summed quantity and value of entries with `lo <= sort_key <= hi`
    ///
    /// Returns [`Totals::ZERO`] when `lo > hi` or nothing falls in range.
    pub fn range_totals(&self, lo: K, hi: K) -> Totals {
        span_between(&self.root, &lo, &hi).totals
    }

    /// Number of entries with `lo <= sort_key <= hi`
    pub fn range_count(&self, lo: K, hi: K) -> usize {
        span_between(&self.root, &lo, &hi).count
    }
}
