//! Mathematical core of the Elysium pool quoting engine
//!
//! This crate provides the checked Q64.64 primitives, the sqrt-price
//! fixed-point type, tick/price conversion and the token amount formulas
//! that one swap step is built from. Every operation that can overflow or
//! divide by zero returns a distinct `ElysiumError` instead of wrapping.

pub mod bit_math;
pub mod fixed_point;
pub mod swap_math;
pub mod tick_math;
pub mod token_math;

mod u256;

// Re-export commonly used functions
pub use bit_math::*;
pub use fixed_point::*;
pub use swap_math::*;
pub use tick_math::*;
pub use token_math::*;
