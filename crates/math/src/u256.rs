//! 256-bit intermediates for Q64.64 products
//!
//! Products of two `u128` values and word shifts of them need 256 bits.
//! These helpers stay crate-private so no public signature carries a wide
//! integer; callers see `u128`/`u64` results and explicit errors.

use ethnum::U256;

use crate::bit_math::Rounding;
use elysium_types::{ElysiumError, ElysiumResult, Q64_RESOLUTION};

/// Widening product of two `u128` values
pub(crate) fn mul(a: u128, b: u128) -> U256 {
    // (2^128 - 1)^2 < 2^256, the product always fits
    U256::from(a).wrapping_mul(U256::from(b))
}

/// `value << 64`, or `None` if any bit would be shifted out
pub(crate) fn shift_word_left(value: U256) -> Option<U256> {
    if value.leading_zeros() < Q64_RESOLUTION {
        return None;
    }
    Some(value << Q64_RESOLUTION)
}

/// Divide with explicit rounding; a zero divisor is an error
pub(crate) fn div_rounding(
    numerator: U256,
    denominator: U256,
    rounding: Rounding,
) -> ElysiumResult<U256> {
    if denominator == U256::ZERO {
        return Err(ElysiumError::DivideByZero);
    }
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if rounding == Rounding::Up && remainder != U256::ZERO {
        // quotient < numerator here, so the increment cannot wrap
        Ok(quotient + U256::ONE)
    } else {
        Ok(quotient)
    }
}

pub(crate) fn to_u128(value: U256) -> Option<u128> {
    let (hi, lo) = value.into_words();
    if hi == 0 {
        Some(lo)
    } else {
        None
    }
}

pub(crate) fn to_u64(value: U256) -> Option<u64> {
    to_u128(value).and_then(|v| u64::try_from(v).ok())
}
