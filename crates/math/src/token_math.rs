//! # Token Amount Math
//!
//! Token deltas across a sqrt-price range and the inverse: the price reached
//! after adding or removing an amount of one token at constant liquidity.
//!
//! ```text
//! delta_a = L * (sqrt_upper - sqrt_lower) / (sqrt_upper * sqrt_lower)
//! delta_b = L * (sqrt_upper - sqrt_lower)
//! ```

use ethnum::U256;

use crate::bit_math::{checked_div_round_up_if, checked_mul_shift_right_round_up_if, Rounding};
use crate::u256;
use elysium_types::{
    ElysiumError, ElysiumResult, Percentage, MAX_SQRT_PRICE, MIN_SQRT_PRICE, Q64_RESOLUTION,
};

/// A token delta that may not fit in `u64`
///
/// The swap step asks "does the whole range fit in what is left?" before it
/// needs an exact figure, so an oversized delta is a value here rather than
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountDeltaU64 {
    Valid(u64),
    ExceedsMax(ElysiumError),
}

impl AmountDeltaU64 {
    pub fn lte(&self, other: u64) -> bool {
        match self {
            AmountDeltaU64::Valid(value) => *value <= other,
            AmountDeltaU64::ExceedsMax(_) => false,
        }
    }

    pub fn exceeds_max(&self) -> bool {
        matches!(self, AmountDeltaU64::ExceedsMax(_))
    }

    /// The delta, saturated to `u64::MAX`
    pub fn value(&self) -> u64 {
        match self {
            AmountDeltaU64::Valid(value) => *value,
            AmountDeltaU64::ExceedsMax(_) => u64::MAX,
        }
    }

    pub fn into_result(self) -> ElysiumResult<u64> {
        match self {
            AmountDeltaU64::Valid(value) => Ok(value),
            AmountDeltaU64::ExceedsMax(err) => Err(err),
        }
    }
}

fn ordered(sqrt_price_0: u128, sqrt_price_1: u128) -> (u128, u128) {
    if sqrt_price_0 > sqrt_price_1 {
        (sqrt_price_1, sqrt_price_0)
    } else {
        (sqrt_price_0, sqrt_price_1)
    }
}

// ============================================================================
// Amount Deltas
// ============================================================================

/// Token A between two prices; endpoints may be given in either order
pub fn try_get_amount_delta_a(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    rounding: Rounding,
) -> ElysiumResult<AmountDeltaU64> {
    let (lower, upper) = ordered(sqrt_price_0, sqrt_price_1);
    let numerator = u256::shift_word_left(u256::mul(liquidity, upper - lower))
        .ok_or(ElysiumError::MultiplicationOverflow)?;
    let denominator = u256::mul(upper, lower);
    let quotient = u256::div_rounding(numerator, denominator, rounding)?;

    Ok(match u256::to_u64(quotient) {
        Some(amount) => AmountDeltaU64::Valid(amount),
        None => AmountDeltaU64::ExceedsMax(ElysiumError::TokenMaxExceeded),
    })
}

/// Token B between two prices; endpoints may be given in either order
pub fn try_get_amount_delta_b(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    rounding: Rounding,
) -> ElysiumResult<AmountDeltaU64> {
    let (lower, upper) = ordered(sqrt_price_0, sqrt_price_1);
    Ok(
        match checked_mul_shift_right_round_up_if(liquidity, upper - lower, rounding) {
            Ok(amount) => AmountDeltaU64::Valid(amount),
            Err(err) => AmountDeltaU64::ExceedsMax(err),
        },
    )
}

pub fn get_amount_delta_a(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    rounding: Rounding,
) -> ElysiumResult<u64> {
    try_get_amount_delta_a(sqrt_price_0, sqrt_price_1, liquidity, rounding)?.into_result()
}

pub fn get_amount_delta_b(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    rounding: Rounding,
) -> ElysiumResult<u64> {
    try_get_amount_delta_b(sqrt_price_0, sqrt_price_1, liquidity, rounding)?.into_result()
}

// ============================================================================
// Next Sqrt Price
// ============================================================================

/// Price after moving `amount` of the specified token through `liquidity`
///
/// Token A moves the price with the A formula and rounds the result up;
/// token B uses the B formula and rounds down. Both round in the pool's
/// favour.
pub fn get_next_sqrt_price(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> ElysiumResult<u128> {
    if amount_specified_is_input == a_to_b {
        get_next_sqrt_price_from_a_round_up(
            sqrt_price,
            liquidity,
            amount,
            amount_specified_is_input,
        )
    } else {
        get_next_sqrt_price_from_b_round_down(
            sqrt_price,
            liquidity,
            amount,
            amount_specified_is_input,
        )
    }
}

/// `sqrt' = L * sqrt / (L ± amount * sqrt)`, rounded up
pub fn get_next_sqrt_price_from_a_round_up(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
) -> ElysiumResult<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }

    let product = u256::mul(sqrt_price, u128::from(amount));
    let numerator = u256::shift_word_left(u256::mul(liquidity, sqrt_price))
        .ok_or(ElysiumError::MultiplicationOverflow)?;
    let liquidity_shift_left = U256::from(liquidity) << Q64_RESOLUTION;

    if !amount_specified_is_input && liquidity_shift_left <= product {
        return Err(ElysiumError::DivideByZero);
    }

    let denominator = if amount_specified_is_input {
        liquidity_shift_left + product
    } else {
        liquidity_shift_left - product
    };

    let price = u256::div_rounding(numerator, denominator, Rounding::Up)?;
    let price = u256::to_u128(price).ok_or(ElysiumError::NumberDownCastError)?;
    check_price_bounds(price)
}

/// `sqrt' = sqrt ± amount / L`; the delta rounds up when removing output
pub fn get_next_sqrt_price_from_b_round_down(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    amount_specified_is_input: bool,
) -> ElysiumResult<u128> {
    let amount_x64 = u128::from(amount) << Q64_RESOLUTION;
    let delta = checked_div_round_up_if(
        amount_x64,
        liquidity,
        Rounding::up_if(!amount_specified_is_input),
    )?;

    let price = if amount_specified_is_input {
        sqrt_price
            .checked_add(delta)
            .ok_or(ElysiumError::TokenMaxExceeded)?
    } else {
        sqrt_price
            .checked_sub(delta)
            .ok_or(ElysiumError::TokenMinSubceeded)?
    };
    check_price_bounds(price)
}

fn check_price_bounds(price: u128) -> ElysiumResult<u128> {
    if price < MIN_SQRT_PRICE {
        Err(ElysiumError::TokenMinSubceeded)
    } else if price > MAX_SQRT_PRICE {
        Err(ElysiumError::TokenMaxExceeded)
    } else {
        Ok(price)
    }
}

// ============================================================================
// Slippage
// ============================================================================

/// Widen an estimate by a slippage tolerance
///
/// Up: `n * (1 + s)`, saturating at `u64::MAX`. Down: `n / (1 + s)`.
pub fn adjust_for_slippage(
    amount: u64,
    slippage: &Percentage,
    adjust_up: bool,
) -> ElysiumResult<u64> {
    slippage.validate()?;
    let amount = u128::from(amount);
    let numerator = u128::from(slippage.numerator);
    let denominator = u128::from(slippage.denominator);

    if adjust_up {
        let adjusted = amount * (denominator + numerator) / denominator;
        Ok(u64::try_from(adjusted).unwrap_or(u64::MAX))
    } else {
        let adjusted = amount * denominator / (denominator + numerator);
        u64::try_from(adjusted).map_err(|_| ElysiumError::NumberDownCastError)
    }
}
