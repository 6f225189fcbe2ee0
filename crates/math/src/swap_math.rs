//! # Swap Step
//!
//! One step of a swap moves the price from the current sqrt price toward a
//! target (the next initialized tick or the price limit) at constant
//! liquidity. The step stops early when the remaining amount runs out.
//!
//! The "fixed" token is the one the trader specified; the "unfixed" token is
//! the one being computed. Input amounts have the fee taken out before the
//! step is sized.

use crate::bit_math::{checked_mul_div, checked_mul_div_round_up, Rounding};
use crate::token_math::{
    get_amount_delta_a, get_amount_delta_b, get_next_sqrt_price, try_get_amount_delta_a,
    try_get_amount_delta_b, AmountDeltaU64,
};
use elysium_types::{ElysiumError, ElysiumResult, FEE_RATE_MUL_VALUE};

/// Outcome of a single swap step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapStepComputation {
    pub amount_in: u64,
    pub amount_out: u64,
    pub next_sqrt_price: u128,
    pub fee_amount: u64,
}

/// Compute one swap step between `sqrt_price_current` and `sqrt_price_target`
///
/// `fee_rate` is in hundredths of a basis point. The returned `amount_in`
/// excludes the fee; `amount_in + fee_amount` is what the step consumes
/// from an input-specified remainder.
pub fn compute_swap_step(
    amount_remaining: u64,
    fee_rate: u16,
    liquidity: u128,
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> ElysiumResult<SwapStepComputation> {
    let fee_rate = u128::from(fee_rate);
    let initial_amount_fixed_delta = try_get_amount_fixed_delta(
        sqrt_price_current,
        sqrt_price_target,
        liquidity,
        amount_specified_is_input,
        a_to_b,
    )?;

    let amount_calc = if amount_specified_is_input {
        let net = checked_mul_div(
            u128::from(amount_remaining),
            FEE_RATE_MUL_VALUE - fee_rate,
            FEE_RATE_MUL_VALUE,
        )?;
        u64::try_from(net).map_err(|_| ElysiumError::NumberDownCastError)?
    } else {
        amount_remaining
    };

    let next_sqrt_price = if initial_amount_fixed_delta.lte(amount_calc) {
        sqrt_price_target
    } else {
        get_next_sqrt_price(
            sqrt_price_current,
            liquidity,
            amount_calc,
            amount_specified_is_input,
            a_to_b,
        )?
    };

    let is_max_swap = next_sqrt_price == sqrt_price_target;

    let amount_unfixed_delta = get_amount_unfixed_delta(
        sqrt_price_current,
        next_sqrt_price,
        liquidity,
        amount_specified_is_input,
        a_to_b,
    )?;

    // The delta over the full range is reusable only when the step reached
    // the target and the delta fit
    let amount_fixed_delta = if !is_max_swap || initial_amount_fixed_delta.exceeds_max() {
        get_amount_fixed_delta(
            sqrt_price_current,
            next_sqrt_price,
            liquidity,
            amount_specified_is_input,
            a_to_b,
        )?
    } else {
        initial_amount_fixed_delta.value()
    };

    let (amount_in, mut amount_out) = if amount_specified_is_input {
        (amount_fixed_delta, amount_unfixed_delta)
    } else {
        (amount_unfixed_delta, amount_fixed_delta)
    };

    if !amount_specified_is_input && amount_out > amount_remaining {
        amount_out = amount_remaining;
    }

    let fee_amount = if amount_specified_is_input && !is_max_swap {
        amount_remaining
            .checked_sub(amount_in)
            .ok_or(ElysiumError::AmountRemainingOverflow)?
    } else {
        let fee = checked_mul_div_round_up(
            u128::from(amount_in),
            fee_rate,
            FEE_RATE_MUL_VALUE - fee_rate,
        )?;
        u64::try_from(fee).map_err(|_| ElysiumError::NumberDownCastError)?
    };

    Ok(SwapStepComputation {
        amount_in,
        amount_out,
        next_sqrt_price,
        fee_amount,
    })
}

fn try_get_amount_fixed_delta(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> ElysiumResult<AmountDeltaU64> {
    let rounding = Rounding::up_if(amount_specified_is_input);
    if a_to_b == amount_specified_is_input {
        try_get_amount_delta_a(sqrt_price_current, sqrt_price_target, liquidity, rounding)
    } else {
        try_get_amount_delta_b(sqrt_price_current, sqrt_price_target, liquidity, rounding)
    }
}

fn get_amount_fixed_delta(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> ElysiumResult<u64> {
    try_get_amount_fixed_delta(
        sqrt_price_current,
        sqrt_price_target,
        liquidity,
        amount_specified_is_input,
        a_to_b,
    )?
    .into_result()
}

fn get_amount_unfixed_delta(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_specified_is_input: bool,
    a_to_b: bool,
) -> ElysiumResult<u64> {
    let rounding = Rounding::up_if(!amount_specified_is_input);
    if a_to_b == amount_specified_is_input {
        get_amount_delta_b(sqrt_price_current, sqrt_price_target, liquidity, rounding)
    } else {
        get_amount_delta_a(sqrt_price_current, sqrt_price_target, liquidity, rounding)
    }
}
