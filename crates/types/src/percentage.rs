use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ElysiumError, ElysiumResult};

/// Basis points denominator (10,000 = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// An exact fraction used for slippage tolerances and developer fees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentage {
    pub numerator: u64,
    pub denominator: u64,
}

impl Percentage {
    /// Build a percentage from a fraction; the denominator must be non-zero
    pub fn from_fraction(numerator: u64, denominator: u64) -> ElysiumResult<Self> {
        if denominator == 0 {
            return Err(ElysiumError::InvalidPercentage {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Build a percentage from basis points
    pub const fn from_bps(bps: u64) -> Self {
        Self {
            numerator: bps,
            denominator: BPS_DENOMINATOR,
        }
    }

    pub const fn zero() -> Self {
        Self::from_bps(0)
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    /// Strictly less than 100%, with a usable denominator
    pub fn is_below_one(&self) -> bool {
        self.denominator != 0 && self.numerator < self.denominator
    }

    /// Re-check invariants on a value that came from untrusted input
    pub fn validate(&self) -> ElysiumResult<()> {
        if self.denominator == 0 {
            return Err(ElysiumError::InvalidPercentage {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
