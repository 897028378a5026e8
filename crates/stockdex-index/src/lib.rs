//! Concurrent in-memory inventory index
//!
//! This crate keeps a keyed set of priced items indexed two ways, by price
//! and by quantity, so that range aggregates and top-K queries never scan the
//! whole inventory.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `upsert`, `remove` | O(log N) |
//! | `get`, `len`, `total` | O(1) |
//! | `range_quantity`, `range_value`, `range_count` | O(log N) |
//! | `top_k_price`, `top_k_quantity` | O(log N + K) |
//!
//! # Example
//!
//! ```
//! use stockdex_index::SharedInventory;
//! use rust_decimal_macros::dec;
//!
//! let inventory = SharedInventory::new();
//! inventory.upsert("apple", dec!(1.25), 100).unwrap();
//! inventory.upsert("banana", dec!(0.75), 150).unwrap();
//! inventory.upsert("carrot", dec!(0.50), 200).unwrap();
//!
//! assert_eq!(inventory.range_quantity(dec!(0.6), dec!(1.5)), 250);
//! assert_eq!(inventory.range_value(dec!(0.6), dec!(1.5)), dec!(237.5));
//!
//! let top: Vec<_> = inventory.top_k_quantity(2).into_iter().map(|i| i.key).collect();
//! assert_eq!(top, ["carrot", "banana"]);
//! ```

pub mod aggregate;
pub mod baseline;
pub mod config;
pub mod inventory;
pub mod ordered;
pub mod shared;
pub mod top_k;

// Re-export main types
pub use baseline::ScanInventory;
pub use config::{ConfigError, IndexConfig, DEFAULT_INVENTORY_NAME};
pub use inventory::{InventoryIndex, InventorySnapshot, UpsertOutcome};
pub use ordered::{Descending, IndexEntry, OrderedIndex, Range};
pub use shared::SharedInventory;
pub use top_k::{RankBy, TopK};

pub use stockdex_types::{Decimal, InventoryError, Item, Metadata, Result, Totals};
