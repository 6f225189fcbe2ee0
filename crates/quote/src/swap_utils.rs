//! Swap parameter helpers: defaults, direction and tick array addresses

use serde::{Deserialize, Serialize};

use crate::pda::PdaBuilder;
use elysium_math::{adjust_for_slippage, tick_array_start_index};
use elysium_types::{
    ElysiumResult, Percentage, Pool, Pubkey, TokenType, MAX_SQRT_PRICE, MAX_SWAP_TICK_ARRAYS,
    MIN_SQRT_PRICE,
};

/// Direction of the swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Token A in, token B out (price decreases)
    AtoB,
    /// Token B in, token A out (price increases)
    BtoA,
}

impl SwapDirection {
    pub fn is_a_to_b(self) -> bool {
        matches!(self, SwapDirection::AtoB)
    }
}

/// Price limit that lets the swap run to the global bound
pub fn default_sqrt_price_limit(a_to_b: bool) -> u128 {
    if a_to_b {
        MIN_SQRT_PRICE
    } else {
        MAX_SQRT_PRICE
    }
}

/// Threshold that accepts any realized amount
pub fn default_other_amount_threshold(amount_specified_is_input: bool) -> u64 {
    if amount_specified_is_input {
        0
    } else {
        u64::MAX
    }
}

/// Direction implied by trading `mint` on `pool`; `None` if the pool does
/// not hold the mint
pub fn swap_direction(pool: &Pool, mint: &Pubkey, mint_is_input: bool) -> Option<SwapDirection> {
    let token_type = pool.token_type(mint)?;
    if (token_type == TokenType::TokenA) == mint_is_input {
        Some(SwapDirection::AtoB)
    } else {
        Some(SwapDirection::BtoA)
    }
}

/// Start indices of the arrays a swap from `tick_current_index` may touch
///
/// B to A starts one spacing up, matching where the tick search begins.
/// Stops early, returning fewer than three, at the edge of the tick range.
pub fn tick_array_start_indices(
    tick_current_index: i32,
    tick_spacing: u16,
    a_to_b: bool,
) -> Vec<i32> {
    let shift = if a_to_b { 0 } else { i32::from(tick_spacing) };
    let Some(search_index) = tick_current_index.checked_add(shift) else {
        return Vec::new();
    };

    let mut start_indices = Vec::with_capacity(MAX_SWAP_TICK_ARRAYS);
    let mut offset = 0i32;
    for _ in 0..MAX_SWAP_TICK_ARRAYS {
        match tick_array_start_index(search_index, tick_spacing, offset) {
            Ok(start) => start_indices.push(start),
            Err(_) => break,
        }
        offset += if a_to_b { -1 } else { 1 };
    }
    start_indices
}

/// Addresses of the arrays a swap may touch, derived through `pda`
///
/// Pass the same builder across quotes so repeated derivations hit its
/// cache.
pub fn tick_array_addresses(
    pda: &PdaBuilder,
    pool_address: &Pubkey,
    tick_current_index: i32,
    tick_spacing: u16,
    a_to_b: bool,
) -> Vec<Pubkey> {
    tick_array_start_indices(tick_current_index, tick_spacing, a_to_b)
        .into_iter()
        .map(|start| pda.tick_array(pool_address, start).0)
        .collect()
}

/// Swap instruction amounts derived from a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAmounts {
    pub amount: u64,
    pub other_amount_threshold: u64,
}

/// Amount and slippage-adjusted threshold to submit for a quoted swap
pub fn calculate_swap_amounts_from_quote(
    amount: u64,
    estimated_amount_in: u64,
    estimated_amount_out: u64,
    slippage_tolerance: &Percentage,
    amount_specified_is_input: bool,
) -> ElysiumResult<SwapAmounts> {
    let other_amount_threshold = if amount_specified_is_input {
        adjust_for_slippage(estimated_amount_out, slippage_tolerance, false)?
    } else {
        adjust_for_slippage(estimated_amount_in, slippage_tolerance, true)?
    };
    Ok(SwapAmounts {
        amount,
        other_amount_threshold,
    })
}
