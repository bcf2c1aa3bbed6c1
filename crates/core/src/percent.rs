//! Percentages rendered with two decimals.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::value_object::ValueObject;

/// A percentage fixed at two decimal places (`"50.00"`).
///
/// Serialized as a string so the two decimals survive JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(Decimal);

impl Percent {
    pub fn zero() -> Self {
        Self::from_decimal(Decimal::ZERO)
    }

    /// `part / whole * 100`, or `None` when `whole` is zero.
    pub fn ratio(part: u64, whole: u64) -> Option<Self> {
        if whole == 0 {
            return None;
        }
        let raw = Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole);
        Some(Self::from_decimal(raw))
    }

    /// Round half away from zero to two decimals.
    pub fn from_decimal(value: Decimal) -> Self {
        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        Self(rounded)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl ValueObject for Percent {}

impl core::fmt::Display for Percent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
