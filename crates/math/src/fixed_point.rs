//! Q64.64 square-root price
//!
//! A raw `u128` can hold values the program would never accept. This type
//! can only be built inside `[MIN_SQRT_PRICE, MAX_SQRT_PRICE]`, so anything
//! holding one has already passed the global bounds check.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tick_math;
use elysium_types::{ElysiumError, ElysiumResult, MAX_SQRT_PRICE, MIN_SQRT_PRICE, Q64};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u128", into = "u128")]
pub struct SqrtPriceX64(u128);

impl SqrtPriceX64 {
    pub const MIN: Self = Self(MIN_SQRT_PRICE);
    pub const MAX: Self = Self(MAX_SQRT_PRICE);
    /// Price 1.0
    pub const ONE: Self = Self(Q64);

    /// Wrap a raw value, failing with `SqrtPriceOutOfBounds` outside the
    /// global bounds
    pub fn try_new(raw: u128) -> ElysiumResult<Self> {
        if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&raw) {
            return Err(ElysiumError::SqrtPriceOutOfBounds);
        }
        Ok(Self(raw))
    }

    pub const fn get(self) -> u128 {
        self.0
    }

    pub fn from_tick_index(tick_index: i32) -> ElysiumResult<Self> {
        tick_math::sqrt_price_from_tick_index(tick_index).map(Self)
    }

    /// Greatest tick whose sqrt price is at or below this one
    pub fn to_tick_index(self) -> i32 {
        tick_math::tick_index_from_sqrt_price_unchecked(self.0)
    }

    /// Decimal price `(sqrt / 2^64)^2`, for display only
    pub fn to_price_f64(self) -> f64 {
        let sqrt = self.0 as f64 / Q64 as f64;
        sqrt * sqrt
    }
}

impl TryFrom<u128> for SqrtPriceX64 {
    type Error = ElysiumError;

    fn try_from(raw: u128) -> Result<Self, Self::Error> {
        Self::try_new(raw)
    }
}

impl From<SqrtPriceX64> for u128 {
    fn from(price: SqrtPriceX64) -> Self {
        price.0
    }
}

impl fmt::Display for SqrtPriceX64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
