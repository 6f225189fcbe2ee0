//! Shared fixtures for the quote integration tests

#![allow(dead_code)]

pub mod builders;
pub mod tracing;

pub use builders::{PoolBuilder, TickArrayBuilder};
pub use tracing::init_test_tracing;

pub const SPACING: u16 = 64;
pub const SPAN: i32 = elysium_types::TICK_ARRAY_SIZE * SPACING as i32;
