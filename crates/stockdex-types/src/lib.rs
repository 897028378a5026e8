//! Shared types for the Stockdex inventory index
//!
//! This crate provides the core type definitions used across the workspace.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Item`] - Keyed inventory record with decimal price
//! - [`Metadata`] - Free-form item attributes
//! - [`Totals`] - Quantity and value sums returned by range queries
//! - [`InventoryError`] - Error types

pub mod error;
pub mod item;
pub mod totals;

// Re-export commonly used types
pub use error::*;
pub use item::*;
pub use totals::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
