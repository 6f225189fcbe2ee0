//! # Swap Quotes
//!
//! Validates a quote request, runs the swap engine and assembles the
//! result into what a swap instruction needs: expected amounts, fee, end
//! price, slippage threshold and the three tick array accounts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::pda::PdaBuilder;
use crate::swap_manager::compute_swap;
use crate::swap_utils::{
    calculate_swap_amounts_from_quote, default_other_amount_threshold, default_sqrt_price_limit,
    swap_direction, tick_array_addresses,
};
use crate::tick_array_sequence::TickArraySequence;
use elysium_math::SqrtPriceX64;
use elysium_types::{
    pubkey_serde, ElysiumError, ElysiumResult, Percentage, Pool, Pubkey, TickArray, TickArraySlot,
    MAX_SWAP_TICK_ARRAYS,
};

/// Everything needed to simulate one swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuoteParam {
    pub pool: Pool,
    /// Up to three arrays in trade direction, starting at the current tick
    pub tick_arrays: Vec<TickArraySlot>,
    pub token_amount: u64,
    pub sqrt_price_limit: u128,
    pub other_amount_threshold: u64,
    pub a_to_b: bool,
    pub amount_specified_is_input: bool,
    /// Time to accrue rewards to; `None` leaves them as of the last update
    #[serde(default)]
    pub timestamp: Option<u64>,
}

/// Estimated outcome of a swap plus the parameters to submit it with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub estimated_amount_in: u64,
    pub estimated_amount_out: u64,
    pub estimated_end_tick_index: i32,
    pub estimated_end_sqrt_price: u128,
    pub estimated_fee_amount: u64,
    pub amount: u64,
    pub amount_specified_is_input: bool,
    pub a_to_b: bool,
    pub other_amount_threshold: u64,
    pub sqrt_price_limit: u128,
    #[serde(with = "pubkey_serde")]
    pub tick_array_0: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub tick_array_1: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub tick_array_2: Pubkey,
}

/// Where tick array accounts come from
///
/// Returning `None` means the account does not exist on the ledger.
pub trait TickArraySource {
    fn tick_array(&self, address: &Pubkey) -> Option<TickArray>;
}

impl TickArraySource for HashMap<Pubkey, TickArray> {
    fn tick_array(&self, address: &Pubkey) -> Option<TickArray> {
        self.get(address).cloned()
    }
}

/// Simulate a swap and check the result against the caller's threshold
pub fn simulate_swap(param: &SwapQuoteParam) -> ElysiumResult<SwapQuote> {
    let SwapQuoteParam {
        pool,
        tick_arrays,
        token_amount,
        sqrt_price_limit,
        other_amount_threshold,
        a_to_b,
        amount_specified_is_input,
        timestamp,
    } = param;
    let (a_to_b, is_input) = (*a_to_b, *amount_specified_is_input);

    debug!(
        amount = token_amount,
        a_to_b,
        amount_specified_is_input = is_input,
        "simulating swap"
    );

    let limit = SqrtPriceX64::try_new(*sqrt_price_limit)?;
    if (a_to_b && limit.get() > pool.sqrt_price) || (!a_to_b && limit.get() < pool.sqrt_price) {
        return Err(ElysiumError::InvalidSqrtPriceLimitDirection);
    }

    if *token_amount == 0 {
        return Err(ElysiumError::ZeroTradableAmount);
    }

    let mut sequence = TickArraySequence::new(tick_arrays.clone(), pool.tick_spacing, a_to_b)?;

    if !sequence.is_valid_first_array(pool.tick_current_index) {
        return Err(ElysiumError::sequence_invalid(
            "TickArray at index 0 does not contain the pool current tick index.",
        ));
    }

    let timestamp = timestamp.unwrap_or(pool.reward_last_updated_timestamp);
    let result = compute_swap(
        pool,
        &mut sequence,
        *token_amount,
        limit,
        is_input,
        a_to_b,
        timestamp,
    )?;

    let (amount_in, amount_out) = if a_to_b {
        (result.amount_a, result.amount_b)
    } else {
        (result.amount_b, result.amount_a)
    };

    if is_input && *other_amount_threshold > amount_out {
        warn!(threshold = other_amount_threshold, amount_out, "quote below minimum output");
        return Err(ElysiumError::AmountOutBelowMinimum {
            threshold: *other_amount_threshold,
            actual: amount_out,
        });
    }
    if !is_input && *other_amount_threshold < amount_in {
        warn!(threshold = other_amount_threshold, amount_in, "quote above maximum input");
        return Err(ElysiumError::AmountInAboveMaximum {
            threshold: *other_amount_threshold,
            actual: amount_in,
        });
    }

    let touched_count = sequence.touched_count();
    if touched_count > MAX_SWAP_TICK_ARRAYS {
        return Err(ElysiumError::TickArrayCrossingAboveMax {
            count: touched_count,
        });
    }

    let addresses: [Pubkey; MAX_SWAP_TICK_ARRAYS] = sequence
        .tick_array_addresses(MAX_SWAP_TICK_ARRAYS)
        .try_into()
        .map_err(|addresses: Vec<Pubkey>| {
            ElysiumError::sequence_invalid(format!(
                "Sequence yields {} tick array addresses, expected {}.",
                addresses.len(),
                MAX_SWAP_TICK_ARRAYS
            ))
        })?;
    let [tick_array_0, tick_array_1, tick_array_2] = addresses;

    let quote = SwapQuote {
        estimated_amount_in: amount_in,
        estimated_amount_out: amount_out,
        estimated_end_tick_index: result.next_tick_index,
        estimated_end_sqrt_price: result.next_sqrt_price,
        estimated_fee_amount: result.total_fee_amount,
        amount: *token_amount,
        amount_specified_is_input: is_input,
        a_to_b,
        other_amount_threshold: *other_amount_threshold,
        sqrt_price_limit: *sqrt_price_limit,
        tick_array_0,
        tick_array_1,
        tick_array_2,
    };

    debug!(
        amount_in,
        amount_out,
        fee = result.total_fee_amount,
        end_tick = result.next_tick_index,
        crossings = result.crossing_count,
        "swap simulated"
    );
    Ok(quote)
}

/// Simulate a swap and set the threshold from a slippage tolerance
pub fn swap_quote_with_params(
    param: &SwapQuoteParam,
    slippage_tolerance: &Percentage,
) -> ElysiumResult<SwapQuote> {
    let quote = simulate_swap(param)?;
    let amounts = calculate_swap_amounts_from_quote(
        quote.amount,
        quote.estimated_amount_in,
        quote.estimated_amount_out,
        slippage_tolerance,
        quote.amount_specified_is_input,
    )?;
    Ok(SwapQuote {
        amount: amounts.amount,
        other_amount_threshold: amounts.other_amount_threshold,
        ..quote
    })
}

/// Quote spending exactly `amount` of `input_mint`
pub fn swap_quote_by_input_token(
    pool_address: &Pubkey,
    pool: &Pool,
    input_mint: &Pubkey,
    amount: u64,
    slippage_tolerance: &Percentage,
    pda: &PdaBuilder,
    source: &impl TickArraySource,
) -> ElysiumResult<SwapQuote> {
    let param =
        swap_quote_param_by_token(pool_address, pool, input_mint, amount, true, pda, source)?;
    swap_quote_with_params(&param, slippage_tolerance)
}

/// Quote receiving exactly `amount` of `output_mint`
pub fn swap_quote_by_output_token(
    pool_address: &Pubkey,
    pool: &Pool,
    output_mint: &Pubkey,
    amount: u64,
    slippage_tolerance: &Percentage,
    pda: &PdaBuilder,
    source: &impl TickArraySource,
) -> ElysiumResult<SwapQuote> {
    let param =
        swap_quote_param_by_token(pool_address, pool, output_mint, amount, false, pda, source)?;
    swap_quote_with_params(&param, slippage_tolerance)
}

/// Build a quote request for trading `mint` on `pool`
///
/// Derives the direction from the mint and the tick array addresses from
/// the current tick through `pda`, then looks each address up in `source`.
/// Addresses the source does not know become absent slots.
pub fn swap_quote_param_by_token(
    pool_address: &Pubkey,
    pool: &Pool,
    mint: &Pubkey,
    amount: u64,
    mint_is_input: bool,
    pda: &PdaBuilder,
    source: &impl TickArraySource,
) -> ElysiumResult<SwapQuoteParam> {
    let direction =
        swap_direction(pool, mint, mint_is_input).ok_or_else(|| ElysiumError::InvalidTokenMint {
            mint: mint.to_string(),
        })?;
    let a_to_b = direction.is_a_to_b();

    let tick_arrays = tick_array_addresses(
        pda,
        pool_address,
        pool.tick_current_index,
        pool.tick_spacing,
        a_to_b,
    )
    .into_iter()
    .map(|address| match source.tick_array(&address) {
        Some(data) => TickArraySlot::initialized(address, data),
        None => TickArraySlot::uninitialized(address),
    })
    .collect();

    Ok(SwapQuoteParam {
        pool: pool.clone(),
        tick_arrays,
        token_amount: amount,
        sqrt_price_limit: default_sqrt_price_limit(a_to_b),
        other_amount_threshold: default_other_amount_threshold(mint_is_input),
        a_to_b,
        amount_specified_is_input: mint_is_input,
        timestamp: None,
    })
}
