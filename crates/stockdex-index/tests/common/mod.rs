//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use stockdex_index::{InventoryIndex, Item, ScanInventory, SharedInventory};

/// The produce inventory used throughout the docs
pub fn produce() -> Vec<(&'static str, Decimal, i64)> {
    vec![
        ("apple", dec!(1.25), 100),
        ("banana", dec!(0.75), 150),
        ("carrot", dec!(0.50), 200),
    ]
}

/// Small inventory with a zero-quantity item
pub fn seeded() -> Vec<(&'static str, Decimal, i64)> {
    vec![
        ("A", dec!(10.0), 5),
        ("B", dec!(20.0), 2),
        ("C", dec!(15.0), 0),
    ]
}

pub fn index_from(rows: &[(&str, Decimal, i64)]) -> InventoryIndex {
    let mut inv = InventoryIndex::new();
    for (key, price, qty) in rows {
        inv.upsert(*key, *price, *qty).unwrap();
    }
    inv
}

pub fn scan_from(rows: &[(&str, Decimal, i64)]) -> ScanInventory {
    let mut inv = ScanInventory::new();
    for (key, price, qty) in rows {
        inv.upsert(*key, *price, *qty).unwrap();
    }
    inv
}

pub fn shared_from(rows: &[(&str, Decimal, i64)]) -> SharedInventory {
    SharedInventory::from(index_from(rows))
}

pub fn keys<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<String> {
    items.into_iter().map(|item| item.key.clone()).collect()
}

pub fn owned_keys(items: Vec<Item>) -> Vec<String> {
    items.into_iter().map(|item| item.key).collect()
}
