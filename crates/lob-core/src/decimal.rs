//! Precision-safe decimal types for prices and amounts.
//!
//! Every quantity that crosses the connector boundary is a `rust_decimal`
//! value. `Price` and `Size` keep quote-denominated prices and
//! base-denominated amounts from being mixed up.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// Price in quote-asset units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Midpoint between two prices: (a + b) / 2.
    #[inline]
    pub fn midpoint(a: Price, b: Price) -> Self {
        Self((a.0 + b.0) / Decimal::TWO)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Order amount in base-asset units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Quote-denominated value of this amount at `price`.
    #[inline]
    pub fn notional(&self, price: Price) -> Decimal {
        self.0 * price.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Size {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Size {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_midpoint() {
        let mid = Price::midpoint(Price::new(dec!(29990)), Price::new(dec!(30010)));
        assert_eq!(mid, Price::new(dec!(30000)));
    }

    #[test]
    fn test_display_drops_trailing_zeros() {
        assert_eq!(Price::new(dec!(30010.00)).to_string(), "30010");
        assert_eq!(Size::new(dec!(0.0050)).to_string(), "0.005");
    }

    #[test]
    fn test_size_accumulates() {
        let mut filled = Size::ZERO;
        filled += Size::new(dec!(0.002));
        filled += Size::new(dec!(0.003));
        assert_eq!(filled, Size::new(dec!(0.005)));
        assert_eq!(filled - Size::new(dec!(0.001)), Size::new(dec!(0.004)));
    }

    #[test]
    fn test_notional_calculation() {
        let size = Size::new(dec!(0.005));
        assert_eq!(size.notional(Price::new(dec!(30000))), dec!(150));
    }
}
