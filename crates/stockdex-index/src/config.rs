//! Inventory index configuration

/// Default inventory name used in log events and snapshots
pub const DEFAULT_INVENTORY_NAME: &str = "inventory";

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Name is empty or whitespace
    #[error("inventory name must not be empty")]
    EmptyName,

    /// Name contains characters that break log filtering
    #[error("invalid inventory name: {name} (control characters are not allowed)")]
    InvalidName { name: String },
}

/// Settings for an [`InventoryIndex`](crate::InventoryIndex)
///
/// # Example
///
/// ```
/// use stockdex_index::IndexConfig;
///
/// let config = IndexConfig::new("warehouse-a").with_capacity(10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Name reported in log events and snapshots
    pub name: String,

    /// Expected item count, used to presize the primary map
    pub initial_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_INVENTORY_NAME.to_string(),
            initial_capacity: 0,
        }
    }
}

impl IndexConfig {
    /// Create a config with the given name and default capacity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Presize the primary map for `capacity` items
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.name.chars().any(char::is_control) {
            return Err(ConfigError::InvalidName {
                name: self.name.escape_debug().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = IndexConfig::default();
        assert_eq!(config.name, DEFAULT_INVENTORY_NAME);
        assert_eq!(config.initial_capacity, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = IndexConfig::default().with_name("cold-storage").with_capacity(64);
        assert_eq!(config.name, "cold-storage");
        assert_eq!(config.initial_capacity, 64);
    }

    #[test]
    fn test_rejects_bad_names() {
        assert_eq!(IndexConfig::new("  ").validate(), Err(ConfigError::EmptyName));
        assert!(matches!(
            IndexConfig::new("bad\nname").validate(),
            Err(ConfigError::InvalidName { .. })
        ));
    }
}
