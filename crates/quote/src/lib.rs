//! Swap quoting engine for Elysium concentrated-liquidity pools
//!
//! Given a pool snapshot and up to three tick arrays, this crate simulates
//! a swap off-chain exactly as the pool program would execute it and turns
//! the result into a quote: estimated amounts, fees, end price and the tick
//! arrays the transaction must carry. Nothing here performs I/O besides
//! loading configuration; account retrieval is the caller's job.

pub mod config;
pub mod dev_fee_quote;
pub mod pda;
pub mod rewards;
pub mod swap_manager;
pub mod swap_quote;
pub mod swap_utils;
pub mod tick_array_sequence;

// Re-export main types
pub use config::{DevFeeConfig, QuoteConfig};
pub use dev_fee_quote::{
    swap_quote_by_input_token_with_dev_fees, swap_quote_with_dev_fees, DevFeeSwapQuote,
};
pub use pda::PdaBuilder;
pub use rewards::next_reward_infos;
pub use swap_manager::{compute_swap, SwapResult, TickUpdate};
pub use swap_quote::{
    simulate_swap, swap_quote_by_input_token, swap_quote_by_output_token, swap_quote_with_params,
    SwapQuote, SwapQuoteParam, TickArraySource,
};
pub use swap_utils::SwapDirection;
pub use tick_array_sequence::{TickArrayIndex, TickArraySequence};

pub use elysium_types::{ElysiumError, ElysiumResult};
