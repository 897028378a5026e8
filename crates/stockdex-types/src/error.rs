//! Error types for inventory operations

use thiserror::Error;

/// Failure kinds surfaced by inventory operations
///
/// Both variants are expected, caller-recoverable conditions. Range and
/// top-K queries never fail; they return empty results for degenerate input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// A supplied value violates a domain invariant (negative price or
    /// quantity, or totals that would no longer be representable)
    #[error("Invalid input: {field} {reason}, got {value}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// The violated rule
        reason: &'static str,
        /// The rejected value, as supplied
        value: String,
    },

    /// The referenced key is not currently present
    #[error("Item '{key}' not found")]
    NotFound { key: String },
}

impl InventoryError {
    /// Create an invalid input error for a negative field
    pub fn invalid_input(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidInput {
            field,
            reason: "must be non-negative",
            value: value.to_string(),
        }
    }

    /// Create an invalid input error for a value the inventory totals cannot absorb
    pub fn overflow(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidInput {
            field,
            reason: "would overflow inventory totals",
            value: value.to_string(),
        }
    }

    /// Create a not found error for a key
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Returns true if the caller referenced a missing key
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the caller supplied an invalid value
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// The key involved, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::NotFound { key } => Some(key),
            Self::InvalidInput { .. } => None,
        }
    }
}

/// Result type alias for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
