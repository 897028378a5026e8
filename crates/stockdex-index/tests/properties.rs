//! Property tests: the indexed inventory against the scan baseline

use proptest::prelude::*;
use rust_decimal::Decimal;
use stockdex_index::{InventoryIndex, Item, RankBy, ScanInventory};

#[derive(Debug, Clone)]
enum Op {
    Upsert { key: u8, cents: i64, qty: i64 },
    Remove { key: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..40, -50i64..5_000, -5i64..500)
            .prop_map(|(key, cents, qty)| Op::Upsert { key, cents, qty }),
        1 => (0u8..40).prop_map(|key| Op::Remove { key }),
    ]
}

fn apply(ops: &[Op]) -> (InventoryIndex, ScanInventory) {
    let mut indexed = InventoryIndex::new();
    let mut scan = ScanInventory::new();

    for op in ops {
        match *op {
            Op::Upsert { key, cents, qty } => {
                let key = format!("k{key:02}");
                let price = Decimal::new(cents, 2);
                let a = indexed.upsert(key.as_str(), price, qty);
                let b = scan.upsert(key.as_str(), price, qty);
                assert_eq!(a, b);
            }
            Op::Remove { key } => {
                let key = format!("k{key:02}");
                assert_eq!(indexed.remove(&key), scan.remove(&key));
            }
        }
    }

    (indexed, scan)
}

fn keys<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<&'a str> {
    items.into_iter().map(|item| item.key.as_str()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Property: map keys and index entries always agree.
    #[test]
    fn indexes_stay_consistent(ops in prop::collection::vec(op(), 0..200)) {
        let (indexed, scan) = apply(&ops);
        prop_assert!(indexed.is_consistent());
        prop_assert_eq!(indexed.len(), scan.len());
    }

    /// Property: range totals equal a brute-force scan.
    #[test]
    fn range_totals_match_scan(
        ops in prop::collection::vec(op(), 0..200),
        lo in -100i64..5_100,
        width in -100i64..5_100,
    ) {
        let (indexed, scan) = apply(&ops);
        let lo = Decimal::new(lo, 2);
        let hi = lo + Decimal::new(width, 2);

        prop_assert_eq!(indexed.range_quantity(lo, hi), scan.range_quantity(lo, hi));
        prop_assert_eq!(indexed.range_value(lo, hi), scan.range_value(lo, hi));

        let in_range = scan.iter().filter(|i| lo <= i.price && i.price <= hi).count();
        prop_assert_eq!(indexed.range_count(lo, hi), in_range);
        prop_assert_eq!(indexed.items_in_price_range(lo, hi).count(), in_range);
    }

    /// Property: top-K equals sort-and-slice, ties by ascending key.
    #[test]
    fn top_k_matches_scan(ops in prop::collection::vec(op(), 0..200), k in 0usize..50) {
        let (indexed, scan) = apply(&ops);

        prop_assert_eq!(keys(indexed.top_k(RankBy::Price, k)), keys(scan.top_k(RankBy::Price, k)));
        prop_assert_eq!(
            keys(indexed.top_k(RankBy::Quantity, k)),
            keys(scan.top_k(RankBy::Quantity, k))
        );
    }

    /// Property: upserting identical values is a no-op on every query.
    #[test]
    fn repeat_upsert_is_idempotent(ops in prop::collection::vec(op(), 1..100)) {
        let (mut indexed, _) = apply(&ops);
        let before = indexed.snapshot();

        let existing: Vec<Item> = indexed.iter().cloned().collect();
        for item in existing {
            let qty = i64::try_from(item.quantity).unwrap();
            indexed.upsert(item.key.as_str(), item.price, qty).unwrap();
        }

        prop_assert_eq!(indexed.snapshot(), before);
        prop_assert!(indexed.is_consistent());
    }
}
