/// Protocol constants for the Elysium pool program
///
/// These are fixed by the on-ledger program. None of them are runtime
/// configuration; a quote computed with different values would not settle.

// ============================================================================
// Fixed-Point Constants
// ============================================================================

/// Number of fractional bits in a Q64.64 value
pub const Q64_RESOLUTION: u32 = 64;

/// Q64 fixed-point scale factor: 2^64
pub const Q64: u128 = 1u128 << Q64_RESOLUTION;

/// Mask selecting the fractional half of a Q64.64 value
pub const Q64_MASK: u128 = 0xFFFF_FFFF_FFFF_FFFF;

// ============================================================================
// Tick and Price Constants
// ============================================================================

/// Minimum tick index supported by the program
pub const MIN_TICK_INDEX: i32 = -443_636;

/// Maximum tick index supported by the program
pub const MAX_TICK_INDEX: i32 = 443_636;

/// sqrt(1.0001^MIN_TICK_INDEX) * 2^64
pub const MIN_SQRT_PRICE: u128 = 4_295_048_016;

/// sqrt(1.0001^MAX_TICK_INDEX) * 2^64
pub const MAX_SQRT_PRICE: u128 = 79_226_673_515_401_279_992_447_579_055;

/// Number of ticks stored in one tick array account
pub const TICK_ARRAY_SIZE: i32 = 88;

/// `TICK_ARRAY_SIZE` as a slice length
pub const TICK_ARRAY_SIZE_USIZE: usize = TICK_ARRAY_SIZE as usize;

/// Maximum number of tick arrays a single swap may traverse
pub const MAX_SWAP_TICK_ARRAYS: usize = 3;

// ============================================================================
// Fee Constants
// ============================================================================

/// Fee rates are expressed in hundredths of a basis point
pub const FEE_RATE_MUL_VALUE: u128 = 1_000_000;

/// Protocol fee rates are expressed in basis points of the swap fee
pub const PROTOCOL_FEE_RATE_MUL_VALUE: u128 = 10_000;

/// Maximum swap fee rate (3%)
pub const MAX_FEE_RATE: u16 = 30_000;

/// Maximum protocol share of the swap fee (25%)
pub const MAX_PROTOCOL_FEE_RATE: u16 = 2_500;

// ============================================================================
// Reward Constants
// ============================================================================

/// Number of reward slots per pool
pub const NUM_REWARDS: usize = 3;

// ============================================================================
// PDA Seeds
// ============================================================================

pub mod seeds {
    pub const POOL: &[u8] = b"pool";
    pub const TICK_ARRAY: &[u8] = b"tick_array";
    pub const ORACLE: &[u8] = b"oracle";
    pub const FEE_TIER: &[u8] = b"fee_tier";
}

// ============================================================================
// Well-Known Addresses
// ============================================================================

/// Program id of the Elysium pool program
/// (`aqrgkVWeHAGzfgRnhGrPoJumo4QVimZTtoRwNv2uFFo`)
pub const ELYSIUM_PROGRAM_ID: solana_program::pubkey::Pubkey =
    solana_program::pubkey::Pubkey::new_from_array([
        8, 171, 104, 185, 166, 16, 3, 173, 225, 58, 19, 147, 58, 47, 250, 188, 143, 194, 80, 107,
        50, 121, 133, 38, 59, 69, 15, 155, 183, 4, 236, 226,
    ]);
