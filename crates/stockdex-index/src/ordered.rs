//! Balanced order-statistics tree over `(sort key, item key)` entries
//!
//! An AVL tree whose nodes carry subtree aggregates: entry count, summed
//! quantity and summed value. Aggregates are recomputed on the way back up
//! from every insert and remove, in the same O(log N) pass.
//!
//! Entries are ordered by sort key ascending, then by item key descending
//! (`Reverse<&str>`). A walk from the maximum end therefore yields the largest
//! sort keys first, with equal sort keys in ascending item key order.

use std::cmp::{Ordering, Reverse};
use stockdex_types::Totals;

pub(crate) type Link<K> = Option<Box<Node<K>>>;

#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    pub(crate) sort_key: K,
    pub(crate) key: String,
    /// This entry's own contribution
    pub(crate) weight: Totals,
    /// Aggregate over the subtree rooted here, this entry included
    pub(crate) totals: Totals,
    /// Entries in the subtree rooted here
    pub(crate) size: usize,
    height: u8,
    pub(crate) left: Link<K>,
    pub(crate) right: Link<K>,
}

/// A borrowed view of one index entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry<'a, K> {
    /// Ordering value (price or quantity)
    pub sort_key: K,
    /// Item key that owns the entry
    pub key: &'a str,
    /// The entry's quantity/value contribution
    pub weight: Totals,
}

impl<K> Node<K> {
    fn leaf(sort_key: K, key: String, weight: Totals) -> Box<Self> {
        Box::new(Self {
            sort_key,
            key,
            weight,
            totals: weight,
            size: 1,
            height: 1,
            left: None,
            right: None,
        })
    }

    /// Recompute height and aggregates from the children
    fn update(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
        self.size = 1 + size(&self.left) + size(&self.right);
        self.totals = totals(&self.left) + self.weight + totals(&self.right);
    }

    fn balance_factor(&self) -> i16 {
        i16::from(height(&self.left)) - i16::from(height(&self.right))
    }
}

impl<K: Copy> Node<K> {
    pub(crate) fn entry(&self) -> IndexEntry<'_, K> {
        IndexEntry {
            sort_key: self.sort_key,
            key: &self.key,
            weight: self.weight,
        }
    }
}

fn height<K>(link: &Link<K>) -> u8 {
    link.as_ref().map_or(0, |n| n.height)
}

pub(crate) fn size<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

pub(crate) fn totals<K>(link: &Link<K>) -> Totals {
    link.as_ref().map_or(Totals::ZERO, |n| n.totals)
}

fn cmp_entry<K: Ord>(sort_key: &K, key: &str, node: &Node<K>) -> Ordering {
    (sort_key, Reverse(key)).cmp(&(&node.sort_key, Reverse(node.key.as_str())))
}

fn rotate_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update();
    pivot.right = Some(node);
    pivot.update();
    pivot
}

fn rotate_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update();
    pivot.left = Some(node);
    pivot.update();
    pivot
}

/// Restore the AVL property at `node` after one of its subtrees changed height by one
fn rebalance<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    node.update();
    let factor = node.balance_factor();

    if factor > 1 {
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance_factor() < 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        return rotate_right(node);
    }

    if factor < -1 {
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance_factor() > 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        return rotate_left(node);
    }

    node
}

fn insert_node<K: Ord>(
    link: Link<K>,
    sort_key: K,
    key: &str,
    weight: Totals,
    inserted: &mut bool,
) -> Box<Node<K>> {
    let Some(mut node) = link else {
        *inserted = true;
        return Node::leaf(sort_key, key.to_owned(), weight);
    };

    match cmp_entry(&sort_key, key, &node) {
        Ordering::Less => {
            node.left = Some(insert_node(node.left.take(), sort_key, key, weight, inserted));
        }
        Ordering::Greater => {
            node.right = Some(insert_node(node.right.take(), sort_key, key, weight, inserted));
        }
        Ordering::Equal => return node,
    }

    rebalance(node)
}

fn remove_node<K: Ord>(
    link: Link<K>,
    sort_key: &K,
    key: &str,
    removed: &mut Option<Totals>,
) -> Link<K> {
    let mut node = link?;

    match cmp_entry(sort_key, key, &node) {
        Ordering::Less => node.left = remove_node(node.left.take(), sort_key, key, removed),
        Ordering::Greater => node.right = remove_node(node.right.take(), sort_key, key, removed),
        Ordering::Equal => {
            *removed = Some(node.weight);
            return match (node.left.take(), node.right.take()) {
                (None, None) => None,
                (Some(child), None) | (None, Some(child)) => Some(child),
                (Some(left), Some(right)) => {
                    let (rest, mut successor) = take_min(right);
                    successor.left = Some(left);
                    successor.right = rest;
                    Some(rebalance(successor))
                }
            };
        }
    }

    Some(rebalance(node))
}

/// Detach the minimum node of a subtree, returning the remaining subtree and the node
fn take_min<K>(mut node: Box<Node<K>>) -> (Link<K>, Box<Node<K>>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (rest, node)
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
    }
}

/// Ordered index with O(log N) insert/remove and subtree aggregates
///
/// Used twice by the inventory: once keyed by price, once by quantity.
#[derive(Debug, Clone)]
pub struct OrderedIndex<K> {
    pub(crate) root: Link<K>,
}

impl<K> Default for OrderedIndex<K> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<K: Ord + Copy> OrderedIndex<K> {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry
    ///
    /// Returns false (and changes nothing) if the exact `(sort_key, key)` pair
    /// is already present. A stale pair must be removed first.
    ///
    /// # Panics
    ///
    /// Panics if the summed aggregates overflow. Callers that accept
    /// arbitrary weights must bound them against [`OrderedIndex::totals`]
    /// first, as the inventory does.
    pub fn insert(&mut self, sort_key: K, key: &str, weight: Totals) -> bool {
        let mut inserted = false;
        self.root = Some(insert_node(self.root.take(), sort_key, key, weight, &mut inserted));
        inserted
    }

    /// Remove an entry
    ///
    /// Returns the removed entry's contribution, or `None` if the pair is absent
    pub fn remove(&mut self, sort_key: K, key: &str) -> Option<Totals> {
        let mut removed = None;
        self.root = remove_node(self.root.take(), &sort_key, key, &mut removed);
        removed
    }

    /// Check whether the exact pair is present
    pub fn contains(&self, sort_key: K, key: &str) -> bool {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match cmp_entry(&sort_key, key, node) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        size(&self.root)
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Aggregate over every entry (O(1), read from the root)
    pub fn totals(&self) -> Totals {
        totals(&self.root)
    }

    /// Smallest entry
    pub fn first(&self) -> Option<IndexEntry<'_, K>> {
        self.iter().next()
    }

    /// Largest entry
    pub fn last(&self) -> Option<IndexEntry<'_, K>> {
        self.descending().next()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Iterate over all entries in ascending order
    pub fn iter(&self) -> Range<'_, K> {
        Range::new(&self.root, None, None)
    }

    /// Iterate over entries with `lo <= sort_key <= hi` in ascending order
    ///
    /// Lazy: positioning costs O(log N), each step amortized O(1).
    /// Empty when `lo > hi`.
    pub fn range(&self, lo: K, hi: K) -> Range<'_, K> {
        Range::new(&self.root, Some(lo), Some(hi))
    }

    /// Iterate over all entries from the largest sort key down
    pub fn descending(&self) -> Descending<'_, K> {
        Descending::new(&self.root)
    }

    /// The `k` entries with the largest sort keys, highest first
    ///
    /// Returns every entry if fewer than `k` exist.
    pub fn max_k_descending(&self, k: usize) -> Vec<IndexEntry<'_, K>> {
        self.descending().take(k).collect()
    }

    /// Verify ordering, balance and aggregates of the whole tree
    ///
    /// O(N). Intended for tests and debug assertions.
    pub fn is_well_formed(&self) -> bool {
        fn check<K: Ord>(link: &Link<K>) -> Option<(u8, usize, Totals)> {
            let Some(node) = link else {
                return Some((0, 0, Totals::ZERO));
            };
            let (lh, ls, lt) = check(&node.left)?;
            let (rh, rs, rt) = check(&node.right)?;

            let left_ordered = node
                .left
                .as_ref()
                .map_or(true, |l| cmp_entry(&l.sort_key, &l.key, node) == Ordering::Less);
            let right_ordered = node
                .right
                .as_ref()
                .map_or(true, |r| cmp_entry(&r.sort_key, &r.key, node) == Ordering::Greater);
            let balanced = (i16::from(lh) - i16::from(rh)).abs() <= 1;
            let height_ok = node.height == 1 + lh.max(rh);
            let size_ok = node.size == 1 + ls + rs;
            let expected = lt + node.weight + rt;

            (left_ordered && right_ordered && balanced && height_ok && size_ok && node.totals == expected)
                .then_some((node.height, node.size, expected))
        }

        let ordered = self
            .iter()
            .zip(self.iter().skip(1))
            .all(|(a, b)| (a.sort_key, Reverse(a.key)) < (b.sort_key, Reverse(b.key)));

        ordered && check(&self.root).is_some()
    }
}

/// Ascending in-order walk, optionally bounded by sort key
pub struct Range<'a, K> {
    stack: Vec<&'a Node<K>>,
    hi: Option<K>,
}

impl<'a, K: Ord + Copy> Range<'a, K> {
    fn new(root: &'a Link<K>, lo: Option<K>, hi: Option<K>) -> Self {
        let mut stack = Vec::new();
        let mut cur = root.as_deref();
        while let Some(node) = cur {
            if lo.map_or(false, |lo| node.sort_key < lo) {
                cur = node.right.as_deref();
            } else {
                stack.push(node);
                cur = node.left.as_deref();
            }
        }
        Self { stack, hi }
    }
}

impl<'a, K: Ord + Copy> Iterator for Range<'a, K> {
    type Item = IndexEntry<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if self.hi.map_or(false, |hi| node.sort_key > hi) {
            self.stack.clear();
            return None;
        }

        let mut cur = node.right.as_deref();
        while let Some(n) = cur {
            self.stack.push(n);
            cur = n.left.as_deref();
        }

        Some(node.entry())
    }
}

/// Descending in-order walk from the maximum entry
pub struct Descending<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Descending<'a, K> {
    fn new(root: &'a Link<K>) -> Self {
        let mut walk = Self { stack: Vec::new() };
        walk.push_right_spine(root.as_deref());
        walk
    }

    fn push_right_spine(&mut self, mut cur: Option<&'a Node<K>>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = node.right.as_deref();
        }
    }
}

impl<'a, K: Copy> Iterator for Descending<'a, K> {
    type Item = IndexEntry<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_right_spine(node.left.as_deref());
        Some(node.entry())
    }
}
