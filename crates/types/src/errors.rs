use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Main Error Enum
// ============================================================================

/// Every failure the quoting engine can report
///
/// Nothing in the engine retries; each variant aborts the quote and is
/// returned to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElysiumError {
    // ========================================================================
    // Math Errors
    // ========================================================================
    #[error("Multiplication overflow")]
    MultiplicationOverflow,

    #[error("Multiplication with division overflow")]
    MulDivOverflow,

    #[error("Multiplication with shift right overflow")]
    MultiplicationShiftRightOverflow,

    #[error("Division by zero")]
    DivideByZero,

    #[error("Unable to down cast number")]
    NumberDownCastError,

    // ========================================================================
    // Token and Liquidity Errors
    // ========================================================================
    #[error("Exceeded token max")]
    TokenMaxExceeded,

    #[error("Did not meet token min")]
    TokenMinSubceeded,

    #[error("Amount remaining overflows")]
    AmountRemainingOverflow,

    #[error("Amount calculated overflows")]
    AmountCalcOverflow,

    #[error("Liquidity overflow")]
    LiquidityOverflow,

    #[error("Liquidity underflow")]
    LiquidityUnderflow,

    // ========================================================================
    // Tick and Sequence Errors
    // ========================================================================
    #[error("Tick index {tick_index} is out of bounds")]
    InvalidTickIndex { tick_index: i32 },

    #[error("Tick spacing {tick_spacing} is invalid")]
    InvalidTickSpacing { tick_spacing: u16 },

    #[error("Tick {tick_index} is not an initializable tick for spacing {tick_spacing}")]
    TickNotFound { tick_index: i32, tick_spacing: u16 },

    #[error("Tick array must hold {expected} ticks, got {actual}")]
    InvalidTickArrayLength { expected: usize, actual: usize },

    #[error("TickArray at index {index} is not initialized.")]
    TickArrayIndexNotInitialized { index: usize },

    #[error("{0}")]
    TickArraySequenceInvalid(String),

    // ========================================================================
    // Swap Quote Errors
    // ========================================================================
    #[error("Provided devFeePercentage must be less than 100%")]
    InvalidDevFeePercentage,

    #[error("Dev fee quotes only support input-specified swaps")]
    DevFeeRequiresExactInput,

    #[error("Provided SqrtPriceLimit is in the opposite direction of the trade.")]
    InvalidSqrtPriceLimitDirection,

    #[error("Provided SqrtPriceLimit is out of bounds.")]
    SqrtPriceOutOfBounds,

    #[error("Provided tokenAmount is zero.")]
    ZeroTradableAmount,

    #[error(
        "Quoted amount for the other token is below the otherAmountThreshold \
         ({actual} < {threshold})."
    )]
    AmountOutBelowMinimum { threshold: u64, actual: u64 },

    #[error(
        "Quoted amount for the other token is above the otherAmountThreshold \
         ({actual} > {threshold})."
    )]
    AmountInAboveMaximum { threshold: u64, actual: u64 },

    #[error(
        "Input amount causes the quote to traverse more than the allowable amount of \
         tick-arrays {count}"
    )]
    TickArrayCrossingAboveMax { count: usize },

    #[error("Token mint {mint} does not match any tokens on this pool")]
    InvalidTokenMint { mint: String },

    #[error("Percentage {numerator}/{denominator} is invalid")]
    InvalidPercentage { numerator: u64, denominator: u64 },

    #[error("Timestamp {timestamp} is earlier than the last reward update {last_updated}")]
    InvalidTimestamp { timestamp: u64, last_updated: u64 },

    // ========================================================================
    // Account Decoding Errors
    // ========================================================================
    #[error("Account data too small: {len} bytes")]
    AccountDataTooSmall { len: usize },

    #[error("Account discriminator does not match {account}")]
    AccountDiscriminatorMismatch { account: &'static str },

    #[error("Unknown account discriminator {discriminator:?}")]
    UnknownAccountDiscriminator { discriminator: [u8; 8] },

    #[error("Failed to deserialize {account}: {reason}")]
    AccountDeserialize { account: &'static str, reason: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Invalid config '{field}': got {value}, expected {expected}")]
    InvalidConfig {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Config I/O error: {0}")]
    ConfigIo(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

// ============================================================================
// Error Codes
// ============================================================================

/// Coarse grouping of errors, stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    MathError,
    TokenError,
    SwapError,
    DecodeError,
    ConfigError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::MathError => "MathError",
            ErrorCode::TokenError => "TokenError",
            ErrorCode::SwapError => "SwapError",
            ErrorCode::DecodeError => "DecodeError",
            ErrorCode::ConfigError => "ConfigError",
        };
        f.write_str(name)
    }
}

impl ElysiumError {
    /// Group this error belongs to
    pub fn code(&self) -> ErrorCode {
        use ElysiumError::*;
        match self {
            MultiplicationOverflow
            | MulDivOverflow
            | MultiplicationShiftRightOverflow
            | DivideByZero
            | NumberDownCastError => ErrorCode::MathError,

            TokenMaxExceeded
            | TokenMinSubceeded
            | AmountRemainingOverflow
            | AmountCalcOverflow
            | LiquidityOverflow
            | LiquidityUnderflow => ErrorCode::TokenError,

            InvalidTickIndex { .. }
            | InvalidTickSpacing { .. }
            | TickNotFound { .. }
            | InvalidTickArrayLength { .. }
            | TickArrayIndexNotInitialized { .. }
            | TickArraySequenceInvalid(_)
            | InvalidDevFeePercentage
            | DevFeeRequiresExactInput
            | InvalidSqrtPriceLimitDirection
            | SqrtPriceOutOfBounds
            | ZeroTradableAmount
            | AmountOutBelowMinimum { .. }
            | AmountInAboveMaximum { .. }
            | TickArrayCrossingAboveMax { .. }
            | InvalidTokenMint { .. }
            | InvalidPercentage { .. }
            | InvalidTimestamp { .. } => ErrorCode::SwapError,

            AccountDataTooSmall { .. }
            | AccountDiscriminatorMismatch { .. }
            | UnknownAccountDiscriminator { .. }
            | AccountDeserialize { .. } => ErrorCode::DecodeError,

            InvalidConfig { .. } | ConfigIo(_) | ConfigParse(_) => ErrorCode::ConfigError,
        }
    }

    /// Whether the caller handed in stale or mismatched ledger data
    pub fn is_sequence_error(&self) -> bool {
        matches!(
            self,
            ElysiumError::TickArraySequenceInvalid(_)
                | ElysiumError::TickArrayIndexNotInitialized { .. }
                | ElysiumError::TickArrayCrossingAboveMax { .. }
        )
    }

    /// Whether the realized quote fell outside the caller's threshold
    pub fn is_slippage_error(&self) -> bool {
        matches!(
            self,
            ElysiumError::AmountOutBelowMinimum { .. } | ElysiumError::AmountInAboveMaximum { .. }
        )
    }
}

// ============================================================================
// Helper Constructors
// ============================================================================

impl ElysiumError {
    /// Create a sequence integrity error with a message
    pub fn sequence_invalid(message: impl Into<String>) -> Self {
        Self::TickArraySequenceInvalid(message.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: &str, value: &str, expected: &str) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Create a decoding error for a named account
    pub fn deserialize(account: &'static str, reason: impl fmt::Display) -> Self {
        Self::AccountDeserialize {
            account,
            reason: reason.to_string(),
        }
    }
}
