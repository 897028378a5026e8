//! Quantity and value sums

use crate::item::Item;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Summed quantity and stock value over a set of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of quantities
    pub quantity: u64,
    /// Sum of `price * quantity`
    pub value: Decimal,
}

impl Totals {
    /// The empty sum
    pub const ZERO: Totals = Totals {
        quantity: 0,
        value: Decimal::ZERO,
    };

    /// Create totals from raw sums
    pub fn new(quantity: u64, value: Decimal) -> Self {
        Self { quantity, value }
    }

    /// Contribution of a single price/quantity pair
    pub fn of(price: Decimal, quantity: u64) -> Self {
        Self {
            quantity,
            value: price * Decimal::from(quantity),
        }
    }

    /// Like [`Totals::of`], but `None` if `price * quantity` overflows
    pub fn checked_of(price: Decimal, quantity: u64) -> Option<Self> {
        let value = price.checked_mul(Decimal::from(quantity))?;
        Some(Self { quantity, value })
    }

    /// Contribution of one item
    pub fn of_item(item: &Item) -> Self {
        Self::of(item.price, item.quantity)
    }

    /// Check if both sums are zero
    pub fn is_zero(&self) -> bool {
        self.quantity == 0 && self.value.is_zero()
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals {
            quantity: self.quantity + rhs.quantity,
            value: self.value + rhs.value,
        }
    }
}

/// Removes a contribution previously added; `rhs` must be part of `self`
impl Sub for Totals {
    type Output = Totals;

    fn sub(self, rhs: Totals) -> Totals {
        Totals {
            quantity: self.quantity - rhs.quantity,
            value: self.value - rhs.value,
        }
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Totals) {
        self.quantity += rhs.quantity;
        self.value += rhs.value;
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Totals {
        iter.fold(Totals::ZERO, |acc, t| acc + t)
    }
}

impl<'a> Sum<&'a Item> for Totals {
    fn sum<I: Iterator<Item = &'a Item>>(iter: I) -> Totals {
        iter.map(Totals::of_item).sum()
    }
}

impl std::fmt::Display for Totals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "qty={} value={}", self.quantity, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_totals_of() {
        let t = Totals::of(dec!(0.75), 150);
        assert_eq!(t.quantity, 150);
        assert_eq!(t.value, dec!(112.5));
    }

    #[test]
    fn test_totals_sum_items() {
        let items = [
            Item::new("apple", dec!(1.25), 100),
            Item::new("banana", dec!(0.75), 150),
        ];
        let total: Totals = items.iter().sum();
        assert_eq!(total, Totals::new(250, dec!(237.5)));
    }

    #[test]
    fn test_checked_of() {
        assert_eq!(Totals::checked_of(dec!(0.75), 150), Some(Totals::of(dec!(0.75), 150)));
        assert_eq!(Totals::checked_of(Decimal::MAX, 2), None);
        assert_eq!(Totals::checked_of(Decimal::MAX, 0), Some(Totals::ZERO));
    }

    #[test]
    fn test_sub_removes_contribution() {
        let a = Totals::of(dec!(1.25), 100);
        let b = Totals::of(dec!(0.75), 150);
        assert_eq!((a + b) - b, a);
    }

    #[test]
    fn test_zero() {
        assert!(Totals::ZERO.is_zero());
        assert_eq!(Totals::default(), Totals::ZERO);
        assert!(!Totals::of(dec!(1), 1).is_zero());
    }
}
