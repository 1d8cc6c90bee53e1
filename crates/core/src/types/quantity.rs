//! Non-negative cart line quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative product quantity within a cart.
///
/// Quantities come from free-form form input, so construction is lenient:
/// [`Quantity::coerce`] maps anything that does not parse as a non-negative
/// integer to zero rather than rejecting the whole form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// The zero quantity.
    pub const ZERO: Self = Self(0);

    /// Create a quantity from a known-good value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Whether this quantity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Coerce free-form input into a quantity.
    ///
    /// Empty, non-numeric, and negative input all coerce to zero.
    ///
    /// ```
    /// use papaya_market_core::Quantity;
    ///
    /// assert_eq!(Quantity::coerce("3").get(), 3);
    /// assert_eq!(Quantity::coerce(" 12 ").get(), 12);
    /// assert_eq!(Quantity::coerce("").get(), 0);
    /// assert_eq!(Quantity::coerce("-1").get(), 0);
    /// assert_eq!(Quantity::coerce("abc").get(), 0);
    /// ```
    #[must_use]
    pub fn coerce(input: &str) -> Self {
        input.trim().parse::<u32>().map_or(Self::ZERO, Self)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_valid() {
        assert_eq!(Quantity::coerce("5"), Quantity::new(5));
        assert_eq!(Quantity::coerce("0"), Quantity::ZERO);
    }

    #[test]
    fn test_coerce_invalid_is_zero() {
        assert_eq!(Quantity::coerce(""), Quantity::ZERO);
        assert_eq!(Quantity::coerce("three"), Quantity::ZERO);
        assert_eq!(Quantity::coerce("-4"), Quantity::ZERO);
        assert_eq!(Quantity::coerce("1.5"), Quantity::ZERO);
    }

    #[test]
    fn test_is_zero() {
        assert!(Quantity::ZERO.is_zero());
        assert!(!Quantity::new(1).is_zero());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Quantity::new(2)).unwrap();
        assert_eq!(json, "2");
        let parsed: Quantity = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Quantity::new(2));
    }
}
