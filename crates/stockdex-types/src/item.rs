//! Inventory item record with decimal pricing

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Free-form attributes attached to an item (never indexed)
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A single keyed item in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identity of the item
    pub key: String,
    /// Unit price, never negative
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price: Decimal,
    /// Units held
    pub quantity: u64,
    /// Extra attributes supplied by the caller
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl Item {
    /// Create an item without metadata
    pub fn new(key: impl Into<String>, price: Decimal, quantity: u64) -> Self {
        Self {
            key: key.into(),
            price,
            quantity,
            metadata: Metadata::new(),
        }
    }

    /// Attach metadata to the item
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Stock value: `price * quantity`
    pub fn value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Check if no units are held
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }
}

/// Accepts prices as JSON strings or numbers without going through f64
/// unless the number uses scientific notation
fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use rust_decimal::prelude::FromPrimitive;
    use serde::de::Error;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Decimal::from_str(&s).map_err(D::Error::custom),
        StringOrNumber::Number(n) => {
            let s = n.to_string();
            if s.contains('e') || s.contains('E') {
                let f = n.as_f64().ok_or_else(|| D::Error::custom("invalid number"))?;
                Decimal::from_f64(f).ok_or_else(|| D::Error::custom("cannot convert to decimal"))
            } else {
                Decimal::from_str(&s).map_err(D::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_item_value() {
        let item = Item::new("apple", dec!(1.25), 100);
        assert_eq!(item.value(), dec!(125));

        let empty = Item::new("carrot", dec!(0.50), 0);
        assert_eq!(empty.value(), Decimal::ZERO);
        assert!(empty.is_out_of_stock());
    }

    #[test]
    fn test_item_from_json_number() {
        let json = r#"{"key": "apple", "price": 1.25, "quantity": 100}"#;
        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.price.to_string(), "1.25");
        assert_eq!(item.quantity, 100);
        assert!(item.metadata.is_empty());
    }

    #[test]
    fn test_item_from_json_string_price() {
        let json = r#"{"key": "banana", "price": "0.75", "quantity": 150}"#;
        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.price, dec!(0.75));
    }

    #[test]
    fn test_item_metadata_roundtrip() {
        let mut metadata = Metadata::new();
        metadata.insert("category".to_string(), serde_json::json!("fruit"));
        let item = Item::new("apple", dec!(1.25), 100).with_metadata(metadata);

        let json = serde_json::to_string(&item).unwrap();
        let parsed: Item = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, item);
        assert_eq!(parsed.metadata["category"], "fruit");
    }

    #[test]
    fn test_empty_metadata_not_serialized() {
        let item = Item::new("apple", dec!(1), 1);
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("metadata"));
    }
}
