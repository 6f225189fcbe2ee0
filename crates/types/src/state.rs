//! Read-only snapshots of the ledger records the quoting engine consumes
//!
//! Field order mirrors the on-ledger account layout so the binary
//! decoders in `accounts` map one-to-one onto these records.

use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::constants::*;
use crate::pubkey_serde;
use crate::{ElysiumError, ElysiumResult};

// ============================================================================
// Tick
// ============================================================================

/// One boundary on the discretized price axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub initialized: bool,
    /// Liquidity added when the price crosses this tick moving up
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_a: u128,
    pub fee_growth_outside_b: u128,
    pub reward_growths_outside: [u128; NUM_REWARDS],
}

// ============================================================================
// Tick Array
// ============================================================================

/// A fixed block of `TICK_ARRAY_SIZE` ticks anchored at `start_tick_index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickArray {
    pub start_tick_index: i32,
    pub ticks: Vec<Tick>,
    #[serde(with = "pubkey_serde")]
    pub pool: Pubkey,
}

impl TickArray {
    /// Build a tick array, checking that it holds exactly one array of ticks
    pub fn new(pool: Pubkey, start_tick_index: i32, ticks: Vec<Tick>) -> ElysiumResult<Self> {
        if ticks.len() != TICK_ARRAY_SIZE_USIZE {
            return Err(ElysiumError::InvalidTickArrayLength {
                expected: TICK_ARRAY_SIZE_USIZE,
                actual: ticks.len(),
            });
        }
        Ok(Self {
            start_tick_index,
            ticks,
            pool,
        })
    }

    /// A freshly created array: every tick uninitialized
    pub fn empty(pool: Pubkey, start_tick_index: i32) -> Self {
        Self {
            start_tick_index,
            ticks: vec![Tick::default(); TICK_ARRAY_SIZE_USIZE],
            pool,
        }
    }

    pub fn tick(&self, offset: usize) -> Option<&Tick> {
        self.ticks.get(offset)
    }

    pub fn tick_mut(&mut self, offset: usize) -> Option<&mut Tick> {
        self.ticks.get_mut(offset)
    }

    /// Whether `tick_index` falls inside this array's span
    pub fn contains_tick_index(&self, tick_index: i32, tick_spacing: u16) -> bool {
        let span = i64::from(tick_spacing) * i64::from(TICK_ARRAY_SIZE);
        let start = i64::from(self.start_tick_index);
        let tick_index = i64::from(tick_index);
        tick_index >= start && tick_index < start + span
    }
}

/// A tick array position handed to the engine: the derived address, and the
/// decoded account if it exists on the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickArraySlot {
    #[serde(with = "pubkey_serde")]
    pub address: Pubkey,
    pub data: Option<TickArray>,
}

impl TickArraySlot {
    pub fn initialized(address: Pubkey, data: TickArray) -> Self {
        Self {
            address,
            data: Some(data),
        }
    }

    pub fn uninitialized(address: Pubkey) -> Self {
        Self {
            address,
            data: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.data.is_some()
    }
}

// ============================================================================
// Pool
// ============================================================================

/// Emission state for one reward slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRewardInfo {
    #[serde(with = "pubkey_serde")]
    pub mint: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub vault: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub authority: Pubkey,
    /// Q64.64 tokens emitted per second
    pub emissions_per_second_x64: u128,
    /// Q64.64 reward growth per unit of liquidity
    pub growth_global_x64: u128,
}

impl PoolRewardInfo {
    /// A slot is live once a mint has been assigned to it
    pub fn initialized(&self) -> bool {
        self.mint != Pubkey::default()
    }
}

/// Which side of the pair a mint is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    TokenA,
    TokenB,
}

/// Snapshot of a pool account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    #[serde(with = "pubkey_serde")]
    pub pools_config: Pubkey,
    pub pool_bump: [u8; 1],
    pub tick_spacing: u16,
    pub tick_spacing_seed: [u8; 2],
    /// Swap fee in hundredths of a basis point
    pub fee_rate: u16,
    /// Share of the swap fee kept by the protocol, in basis points
    pub protocol_fee_rate: u16,
    pub liquidity: u128,
    pub sqrt_price: u128,
    pub tick_current_index: i32,
    pub protocol_fee_owed_a: u64,
    pub protocol_fee_owed_b: u64,
    #[serde(with = "pubkey_serde")]
    pub token_mint_a: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub token_vault_a: Pubkey,
    pub fee_growth_global_a: u128,
    #[serde(with = "pubkey_serde")]
    pub token_mint_b: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub token_vault_b: Pubkey,
    pub fee_growth_global_b: u128,
    pub reward_last_updated_timestamp: u64,
    pub reward_infos: [PoolRewardInfo; NUM_REWARDS],
}

impl Pool {
    /// Global fee growth of the side fees are charged on for this direction
    pub fn input_fee_growth(&self, a_to_b: bool) -> u128 {
        if a_to_b {
            self.fee_growth_global_a
        } else {
            self.fee_growth_global_b
        }
    }

    pub fn reward_initialized(&self, index: usize) -> bool {
        self.reward_infos
            .get(index)
            .map(PoolRewardInfo::initialized)
            .unwrap_or(false)
    }

    pub fn token_type(&self, mint: &Pubkey) -> Option<TokenType> {
        if *mint == self.token_mint_a {
            Some(TokenType::TokenA)
        } else if *mint == self.token_mint_b {
            Some(TokenType::TokenB)
        } else {
            None
        }
    }
}

// ============================================================================
// Fee Tier and Config
// ============================================================================

/// Default fee rate suggested for pools of one tick spacing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    #[serde(with = "pubkey_serde")]
    pub pools_config: Pubkey,
    pub tick_spacing: u16,
    pub default_fee_rate: u16,
}

/// Protocol-wide authorities and defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolsConfig {
    #[serde(with = "pubkey_serde")]
    pub fee_authority: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub collect_protocol_fees_authority: Pubkey,
    #[serde(with = "pubkey_serde")]
    pub reward_emissions_super_authority: Pubkey,
    pub default_protocol_fee_rate: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_array_length_checked() {
        let err = TickArray::new(Pubkey::default(), 0, vec![Tick::default(); 10]).unwrap_err();
        assert_eq!(
            err,
            ElysiumError::InvalidTickArrayLength {
                expected: 88,
                actual: 10
            }
        );
        let array = TickArray::empty(Pubkey::default(), -5632);
        assert_eq!(array.ticks.len(), TICK_ARRAY_SIZE_USIZE);
        assert!(array.contains_tick_index(-1, 64));
        assert!(array.contains_tick_index(-5632, 64));
        assert!(!array.contains_tick_index(0, 64));
    }

    #[test]
    fn test_pool_token_type() {
        let pool = Pool {
            token_mint_a: Pubkey::new_unique(),
            token_mint_b: Pubkey::new_unique(),
            ..Pool::default()
        };
        assert_eq!(pool.token_type(&pool.token_mint_a), Some(TokenType::TokenA));
        assert_eq!(pool.token_type(&pool.token_mint_b), Some(TokenType::TokenB));
        assert_eq!(pool.token_type(&Pubkey::new_unique()), None);
        assert!(!pool.reward_initialized(0));
        assert!(!pool.reward_initialized(7));
    }

    #[test]
    fn test_snapshot_json_uses_base58_keys() {
        let array = TickArray::empty(Pubkey::new_unique(), 0);
        let json = serde_json::to_string(&array).unwrap();
        assert!(json.contains(&array.pool.to_string()));
        let back: TickArray = serde_json::from_str(&json).unwrap();
        assert_eq!(back, array);
    }
}
