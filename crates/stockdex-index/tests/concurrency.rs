//! Concurrent access tests for the shared inventory

mod common;

use common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use stockdex_index::{SharedInventory, Totals};

fn inserter(inventory: &SharedInventory, start: i64, count: i64) {
    for i in start..start + count {
        inventory
            .upsert(format!("item{i}"), Decimal::from(i), i)
            .unwrap();
    }
}

fn remover(inventory: &SharedInventory, start: i64, count: i64) {
    for i in start..start + count {
        match inventory.remove(&format!("item{i}")) {
            Ok(_) => {}
            Err(err) => assert!(err.is_not_found()),
        }
    }
}

#[test]
fn test_concurrent_upserts_and_removals() {
    let inventory = SharedInventory::new();

    thread::scope(|s| {
        for offset in [0, 1000] {
            let inventory = &inventory;
            s.spawn(move || inserter(inventory, offset, 1000));
        }
        for offset in [500, 1500] {
            let inventory = &inventory;
            s.spawn(move || remover(inventory, offset, 1000));
        }
    });

    let size = inventory.len();
    assert!(size <= 2000);
    assert!(inventory.is_consistent());

    // Keys 0..500 were never targeted by a remover
    for i in 0..500 {
        assert!(inventory.contains(&format!("item{i}")));
    }

    for item in inventory.items() {
        let got = inventory.get(&item.key).unwrap();
        assert_eq!(got.price, item.price);
        assert_eq!(got.quantity, item.quantity);
    }
}

#[test]
fn test_readers_never_see_partial_updates() {
    let inventory = shared_from(&produce());
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            // Moves stock between two keys; the total is invariant
            for round in 0..2_000i64 {
                let moved = round % 100;
                inventory.upsert("apple", dec!(1), 100 - moved).unwrap();
                inventory.upsert("banana", dec!(1), 150 + moved).unwrap();
            }
            done.store(true, Ordering::Release);
        });

        for _ in 0..3 {
            s.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    let guard = inventory.read();
                    let visible: Totals = guard.iter().sum();
                    assert_eq!(visible, guard.total());
                    assert_eq!(guard.range_count(Decimal::ZERO, Decimal::MAX), guard.len());
                    assert_eq!(guard.len(), 3);
                }
            });
        }
    });

    assert!(inventory.is_consistent());
}

#[test]
fn test_parallel_queries_match_serial() {
    let inventory = SharedInventory::new();
    for i in 0..1_000i64 {
        inventory
            .upsert(format!("sku{i}"), Decimal::new(i * 13 % 997, 1), i % 50)
            .unwrap();
    }

    let lo = dec!(10);
    let hi = dec!(60);
    let expected_totals = inventory.range_totals(lo, hi);
    let expected_top = owned_keys(inventory.top_k_price(25));

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(inventory.range_totals(lo, hi), expected_totals);
                    assert_eq!(owned_keys(inventory.top_k_price(25)), expected_top);
                }
            });
        }
    });
}
