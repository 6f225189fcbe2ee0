//! # Checked Fixed-Point Primitives
//!
//! Multiply, multiply-divide and multiply-shift-right over Q64.64 values.
//! Each primitive fails with its own error instead of wrapping, and every
//! call site states its rounding direction: amounts the trader owes round
//! up, amounts owed to the trader round down.

use serde::{Deserialize, Serialize};

use crate::u256;
use elysium_types::{ElysiumError, ElysiumResult, Q64_MASK, Q64_RESOLUTION};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

impl Rounding {
    pub const fn up_if(round_up: bool) -> Self {
        if round_up {
            Rounding::Up
        } else {
            Rounding::Down
        }
    }

    pub const fn is_up(self) -> bool {
        matches!(self, Rounding::Up)
    }

    /// The opposite direction
    pub const fn flip(self) -> Self {
        match self {
            Rounding::Down => Rounding::Up,
            Rounding::Up => Rounding::Down,
        }
    }
}

// ============================================================================
// Multiplication
// ============================================================================

pub fn checked_mul(n0: u128, n1: u128) -> ElysiumResult<u128> {
    n0.checked_mul(n1).ok_or(ElysiumError::MultiplicationOverflow)
}

// ============================================================================
// Multiply-Divide
// ============================================================================

/// `n0 * n1 / d`, rounded down
pub fn checked_mul_div(n0: u128, n1: u128, d: u128) -> ElysiumResult<u128> {
    checked_mul_div_round_up_if(n0, n1, d, Rounding::Down)
}

/// `n0 * n1 / d`, rounded up
pub fn checked_mul_div_round_up(n0: u128, n1: u128, d: u128) -> ElysiumResult<u128> {
    checked_mul_div_round_up_if(n0, n1, d, Rounding::Up)
}

/// `n0 * n1 / d` with the product held in 256 bits
///
/// Fails with `DivideByZero` for a zero divisor and `MulDivOverflow` when the
/// quotient does not fit in 128 bits.
pub fn checked_mul_div_round_up_if(
    n0: u128,
    n1: u128,
    d: u128,
    rounding: Rounding,
) -> ElysiumResult<u128> {
    if d == 0 {
        return Err(ElysiumError::DivideByZero);
    }
    let product = u256::mul(n0, n1);
    let quotient = u256::div_rounding(product, d.into(), rounding)?;
    u256::to_u128(quotient).ok_or(ElysiumError::MulDivOverflow)
}

// ============================================================================
// Multiply-Shift-Right
// ============================================================================

/// `(n0 * n1) >> 64`, rounded down
pub fn checked_mul_shift_right(n0: u128, n1: u128) -> ElysiumResult<u64> {
    checked_mul_shift_right_round_up_if(n0, n1, Rounding::Down)
}

/// `(n0 * n1) >> 64`, converting a Q64.64 product back to an integer amount
///
/// The product must fit in 128 bits (`MultiplicationShiftRightOverflow`
/// otherwise). Rounding up a result already at `u64::MAX` fails with
/// `MultiplicationOverflow`.
pub fn checked_mul_shift_right_round_up_if(
    n0: u128,
    n1: u128,
    rounding: Rounding,
) -> ElysiumResult<u64> {
    if n0 == 0 || n1 == 0 {
        return Ok(0);
    }

    let product = n0
        .checked_mul(n1)
        .ok_or(ElysiumError::MultiplicationShiftRightOverflow)?;
    let result = (product >> Q64_RESOLUTION) as u64;

    let should_round = rounding.is_up() && (product & Q64_MASK) > 0;
    if should_round && result == u64::MAX {
        return Err(ElysiumError::MultiplicationOverflow);
    }

    Ok(if should_round { result + 1 } else { result })
}

// ============================================================================
// Division
// ============================================================================

pub fn checked_div_round_up_if(n: u128, d: u128, rounding: Rounding) -> ElysiumResult<u128> {
    if d == 0 {
        return Err(ElysiumError::DivideByZero);
    }
    let quotient = n / d;
    if rounding.is_up() && n % d > 0 {
        Ok(quotient + 1)
    } else {
        Ok(quotient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elysium_types::Q64;

    #[test]
    fn test_checked_mul() {
        assert_eq!(checked_mul(1 << 64, 1 << 63), Ok(1 << 127));
        assert_eq!(
            checked_mul(1 << 64, 1 << 64),
            Err(ElysiumError::MultiplicationOverflow)
        );
    }

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(checked_mul_div(10, 10, 3), Ok(33));
        assert_eq!(checked_mul_div_round_up(10, 10, 3), Ok(34));
        assert_eq!(checked_mul_div_round_up(10, 10, 5), Ok(20));
        assert_eq!(checked_mul_div(0, 10, 3), Ok(0));
    }

    #[test]
    fn test_mul_div_wide_product() {
        // product exceeds u128 but the quotient fits
        assert_eq!(checked_mul_div(u128::MAX, 4, 8), Ok(u128::MAX / 2));
        assert_eq!(
            checked_mul_div(u128::MAX, 2, 1),
            Err(ElysiumError::MulDivOverflow)
        );
        assert_eq!(checked_mul_div(1, 1, 0), Err(ElysiumError::DivideByZero));
    }

    #[test]
    fn test_mul_shift_right() {
        assert_eq!(checked_mul_shift_right(Q64, 5), Ok(5));
        assert_eq!(checked_mul_shift_right(Q64 + 1, 5), Ok(5));
        assert_eq!(checked_mul_shift_right_round_up_if(Q64 + 1, 5, Rounding::Up), Ok(6));
        assert_eq!(checked_mul_shift_right_round_up_if(Q64, 5, Rounding::Up), Ok(5));
        assert_eq!(checked_mul_shift_right_round_up_if(0, u128::MAX, Rounding::Up), Ok(0));
    }

    #[test]
    fn test_mul_shift_right_overflow() {
        assert_eq!(
            checked_mul_shift_right(u128::MAX, 2),
            Err(ElysiumError::MultiplicationShiftRightOverflow)
        );
        // (2^64 - 1) * 2^64 + 1 has its low word set and its high word at u64::MAX
        let n0 = (u64::MAX as u128) << 64 | 1;
        assert_eq!(checked_mul_shift_right(n0, 1), Ok(u64::MAX));
        assert_eq!(
            checked_mul_shift_right_round_up_if(n0, 1, Rounding::Up),
            Err(ElysiumError::MultiplicationOverflow)
        );
    }

    #[test]
    fn test_div_round_up_if() {
        assert_eq!(checked_div_round_up_if(7, 2, Rounding::Down), Ok(3));
        assert_eq!(checked_div_round_up_if(7, 2, Rounding::Up), Ok(4));
        assert_eq!(checked_div_round_up_if(8, 2, Rounding::Up), Ok(4));
        assert_eq!(
            checked_div_round_up_if(8, 0, Rounding::Up),
            Err(ElysiumError::DivideByZero)
        );
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(Rounding::up_if(true), Rounding::Up);
        assert_eq!(Rounding::up_if(false).flip(), Rounding::Up);
        assert!(!Rounding::Down.is_up());
    }
}
