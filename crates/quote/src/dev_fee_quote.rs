//! Quotes that carve a developer fee out of the input amount
//!
//! The fee is taken before the swap, so the pool only ever sees the
//! remainder. Estimated input and fee include the developer share; the
//! pool's own fee is reported separately.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pda::PdaBuilder;
use crate::swap_quote::{
    swap_quote_param_by_token, swap_quote_with_params, SwapQuote, SwapQuoteParam, TickArraySource,
};
use elysium_types::{ElysiumError, ElysiumResult, Percentage, Pool, Pubkey};

/// A swap quote with the developer fee folded in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevFeeSwapQuote {
    /// Quote for the post-fee amount, with input and fee raised by the dev fee
    pub quote: SwapQuote,
    /// Fee charged by the pool alone
    pub estimated_swap_fee_amount: u64,
    /// Amount diverted to the developer wallet
    pub dev_fee_amount: u64,
}

/// Developer share of `amount`, rounded down
pub fn dev_fee_amount(amount: u64, dev_fee_percentage: &Percentage) -> ElysiumResult<u64> {
    if !dev_fee_percentage.is_below_one() {
        return Err(ElysiumError::InvalidDevFeePercentage);
    }
    let fee = u128::from(amount) * u128::from(dev_fee_percentage.numerator)
        / u128::from(dev_fee_percentage.denominator);
    // numerator < denominator keeps the fee below amount
    u64::try_from(fee).map_err(|_| ElysiumError::InvalidDevFeePercentage)
}

/// Quote an exact-input swap after taking the developer fee from the input
pub fn swap_quote_with_dev_fees(
    param: &SwapQuoteParam,
    dev_fee_percentage: &Percentage,
    slippage_tolerance: &Percentage,
) -> ElysiumResult<DevFeeSwapQuote> {
    let dev_fee = dev_fee_amount(param.token_amount, dev_fee_percentage)?;
    if !param.amount_specified_is_input {
        return Err(ElysiumError::DevFeeRequiresExactInput);
    }

    let swap_param = SwapQuoteParam {
        token_amount: param.token_amount - dev_fee,
        ..param.clone()
    };
    let quote = swap_quote_with_params(&swap_param, slippage_tolerance)?;
    debug!(dev_fee, swap_amount = swap_param.token_amount, "applied developer fee");

    let estimated_swap_fee_amount = quote.estimated_fee_amount;
    Ok(DevFeeSwapQuote {
        quote: SwapQuote {
            estimated_amount_in: quote.estimated_amount_in.saturating_add(dev_fee),
            estimated_fee_amount: quote.estimated_fee_amount.saturating_add(dev_fee),
            ..quote
        },
        estimated_swap_fee_amount,
        dev_fee_amount: dev_fee,
    })
}

/// Quote spending exactly `amount` of `input_mint`, developer fee included
#[allow(clippy::too_many_arguments)]
pub fn swap_quote_by_input_token_with_dev_fees(
    pool_address: &Pubkey,
    pool: &Pool,
    input_mint: &Pubkey,
    amount: u64,
    slippage_tolerance: &Percentage,
    pda: &PdaBuilder,
    source: &impl TickArraySource,
    dev_fee_percentage: &Percentage,
) -> ElysiumResult<DevFeeSwapQuote> {
    if !dev_fee_percentage.is_below_one() {
        return Err(ElysiumError::InvalidDevFeePercentage);
    }
    let param =
        swap_quote_param_by_token(pool_address, pool, input_mint, amount, true, pda, source)?;
    swap_quote_with_dev_fees(&param, dev_fee_percentage, slippage_tolerance)
}
