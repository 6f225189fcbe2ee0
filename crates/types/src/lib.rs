//! Shared types for the Elysium pool quoting engine
//!
//! This crate provides the protocol constants, the error taxonomy, the
//! ledger record snapshots (pool, tick arrays, fee tiers) and their binary
//! decoders. Everything here is plain data; the math and the swap engine
//! live in `elysium-math` and `elysium-quote`.

pub mod accounts;
pub mod constants;
pub mod errors;
pub mod percentage;
pub mod pubkey_serde;
pub mod state;

// Re-export all public types
pub use accounts::*;
pub use constants::*;
pub use errors::*;
pub use percentage::*;
pub use state::*;

pub use solana_program::pubkey::Pubkey;

/// Result type alias using the shared error type
pub type ElysiumResult<T> = std::result::Result<T, ElysiumError>;
