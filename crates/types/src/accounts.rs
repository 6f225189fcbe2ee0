//! Binary decoding of raw account bytes into the record snapshots
//!
//! Each account starts with an 8-byte discriminator,
//! `sha256("account:<Name>")[..8]`, followed by the borsh-encoded struct.
//! Trailing reserved bytes are ignored. The set of record shapes is closed,
//! so each one implements `AnchorAccount` and `DecodedAccount` tags them.

use borsh::BorshDeserialize;
use solana_program::hash::hash;
use solana_program::pubkey::Pubkey;

use crate::constants::*;
use crate::state::*;
use crate::{ElysiumError, ElysiumResult};

const DISCRIMINATOR_LEN: usize = 8;

/// A record with a fixed on-ledger layout behind an account discriminator
pub trait AnchorAccount: Sized {
    /// Struct name the discriminator is derived from
    const ACCOUNT_NAME: &'static str;

    fn discriminator() -> [u8; 8] {
        let digest = hash(format!("account:{}", Self::ACCOUNT_NAME).as_bytes()).to_bytes();
        let mut discriminator = [0u8; DISCRIMINATOR_LEN];
        discriminator.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
        discriminator
    }

    /// Decode from raw account data, discriminator included
    fn decode(data: &[u8]) -> ElysiumResult<Self> {
        let body = strip_discriminator(data, Self::ACCOUNT_NAME, Self::discriminator())?;
        Self::decode_body(body)
    }

    /// Decode the borsh body that follows the discriminator
    fn decode_body(body: &[u8]) -> ElysiumResult<Self>;
}

fn strip_discriminator<'a>(
    data: &'a [u8],
    account: &'static str,
    expected: [u8; 8],
) -> ElysiumResult<&'a [u8]> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(ElysiumError::AccountDataTooSmall { len: data.len() });
    }
    let (discriminator, body) = data.split_at(DISCRIMINATOR_LEN);
    if discriminator != expected {
        return Err(ElysiumError::AccountDiscriminatorMismatch { account });
    }
    Ok(body)
}

fn read<T: BorshDeserialize>(account: &'static str, buf: &mut &[u8]) -> ElysiumResult<T> {
    T::deserialize(buf).map_err(|e| ElysiumError::deserialize(account, e))
}

// ============================================================================
// Raw Layouts
// ============================================================================

#[derive(BorshDeserialize, Debug, Clone, Copy, Default)]
struct RawRewardInfo {
    mint: [u8; 32],
    vault: [u8; 32],
    authority: [u8; 32],
    emissions_per_second_x64: u128,
    growth_global_x64: u128,
}

#[derive(BorshDeserialize, Debug, Clone, Copy, Default)]
struct RawPool {
    pools_config: [u8; 32],
    pool_bump: [u8; 1],
    tick_spacing: u16,
    tick_spacing_seed: [u8; 2],
    fee_rate: u16,
    protocol_fee_rate: u16,
    liquidity: u128,
    sqrt_price: u128,
    tick_current_index: i32,
    protocol_fee_owed_a: u64,
    protocol_fee_owed_b: u64,
    token_mint_a: [u8; 32],
    token_vault_a: [u8; 32],
    fee_growth_global_a: u128,
    token_mint_b: [u8; 32],
    token_vault_b: [u8; 32],
    fee_growth_global_b: u128,
    reward_last_updated_timestamp: u64,
    reward_infos: [RawRewardInfo; NUM_REWARDS],
}

#[derive(BorshDeserialize, Debug, Clone, Copy, Default)]
struct RawTick {
    initialized: bool,
    liquidity_net: i128,
    liquidity_gross: u128,
    fee_growth_outside_a: u128,
    fee_growth_outside_b: u128,
    reward_growths_outside: [u128; NUM_REWARDS],
}

#[derive(BorshDeserialize, Debug, Clone, Copy, Default)]
struct RawFeeTier {
    pools_config: [u8; 32],
    tick_spacing: u16,
    default_fee_rate: u16,
}

#[derive(BorshDeserialize, Debug, Clone, Copy, Default)]
struct RawPoolsConfig {
    fee_authority: [u8; 32],
    collect_protocol_fees_authority: [u8; 32],
    reward_emissions_super_authority: [u8; 32],
    default_protocol_fee_rate: u16,
}

impl From<RawRewardInfo> for PoolRewardInfo {
    fn from(raw: RawRewardInfo) -> Self {
        Self {
            mint: Pubkey::new_from_array(raw.mint),
            vault: Pubkey::new_from_array(raw.vault),
            authority: Pubkey::new_from_array(raw.authority),
            emissions_per_second_x64: raw.emissions_per_second_x64,
            growth_global_x64: raw.growth_global_x64,
        }
    }
}

impl From<RawTick> for Tick {
    fn from(raw: RawTick) -> Self {
        Self {
            initialized: raw.initialized,
            liquidity_net: raw.liquidity_net,
            liquidity_gross: raw.liquidity_gross,
            fee_growth_outside_a: raw.fee_growth_outside_a,
            fee_growth_outside_b: raw.fee_growth_outside_b,
            reward_growths_outside: raw.reward_growths_outside,
        }
    }
}

// ============================================================================
// Record Decoders
// ============================================================================

impl AnchorAccount for Pool {
    const ACCOUNT_NAME: &'static str = "ElysiumPool";

    fn decode_body(mut body: &[u8]) -> ElysiumResult<Self> {
        let raw: RawPool = read(Self::ACCOUNT_NAME, &mut body)?;
        Ok(Self {
            pools_config: Pubkey::new_from_array(raw.pools_config),
            pool_bump: raw.pool_bump,
            tick_spacing: raw.tick_spacing,
            tick_spacing_seed: raw.tick_spacing_seed,
            fee_rate: raw.fee_rate,
            protocol_fee_rate: raw.protocol_fee_rate,
            liquidity: raw.liquidity,
            sqrt_price: raw.sqrt_price,
            tick_current_index: raw.tick_current_index,
            protocol_fee_owed_a: raw.protocol_fee_owed_a,
            protocol_fee_owed_b: raw.protocol_fee_owed_b,
            token_mint_a: Pubkey::new_from_array(raw.token_mint_a),
            token_vault_a: Pubkey::new_from_array(raw.token_vault_a),
            fee_growth_global_a: raw.fee_growth_global_a,
            token_mint_b: Pubkey::new_from_array(raw.token_mint_b),
            token_vault_b: Pubkey::new_from_array(raw.token_vault_b),
            fee_growth_global_b: raw.fee_growth_global_b,
            reward_last_updated_timestamp: raw.reward_last_updated_timestamp,
            reward_infos: raw.reward_infos.map(PoolRewardInfo::from),
        })
    }
}

impl AnchorAccount for TickArray {
    const ACCOUNT_NAME: &'static str = "TickArray";

    fn decode_body(mut body: &[u8]) -> ElysiumResult<Self> {
        let start_tick_index: i32 = read(Self::ACCOUNT_NAME, &mut body)?;
        let mut ticks = Vec::with_capacity(TICK_ARRAY_SIZE_USIZE);
        for _ in 0..TICK_ARRAY_SIZE_USIZE {
            let tick: RawTick = read(Self::ACCOUNT_NAME, &mut body)?;
            ticks.push(Tick::from(tick));
        }
        let pool: [u8; 32] = read(Self::ACCOUNT_NAME, &mut body)?;
        TickArray::new(Pubkey::new_from_array(pool), start_tick_index, ticks)
    }
}

impl AnchorAccount for FeeTier {
    const ACCOUNT_NAME: &'static str = "FeeTier";

    fn decode_body(mut body: &[u8]) -> ElysiumResult<Self> {
        let raw: RawFeeTier = read(Self::ACCOUNT_NAME, &mut body)?;
        Ok(Self {
            pools_config: Pubkey::new_from_array(raw.pools_config),
            tick_spacing: raw.tick_spacing,
            default_fee_rate: raw.default_fee_rate,
        })
    }
}

impl AnchorAccount for PoolsConfig {
    const ACCOUNT_NAME: &'static str = "ElysiumPoolsConfig";

    fn decode_body(mut body: &[u8]) -> ElysiumResult<Self> {
        let raw: RawPoolsConfig = read(Self::ACCOUNT_NAME, &mut body)?;
        Ok(Self {
            fee_authority: Pubkey::new_from_array(raw.fee_authority),
            collect_protocol_fees_authority: Pubkey::new_from_array(
                raw.collect_protocol_fees_authority,
            ),
            reward_emissions_super_authority: Pubkey::new_from_array(
                raw.reward_emissions_super_authority,
            ),
            default_protocol_fee_rate: raw.default_protocol_fee_rate,
        })
    }
}

// ============================================================================
// Tagged Dispatch
// ============================================================================

/// Any account the quoting engine knows how to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedAccount {
    Pool(Pool),
    TickArray(TickArray),
    FeeTier(FeeTier),
    PoolsConfig(PoolsConfig),
}

impl DecodedAccount {
    pub fn account_name(&self) -> &'static str {
        match self {
            DecodedAccount::Pool(_) => Pool::ACCOUNT_NAME,
            DecodedAccount::TickArray(_) => TickArray::ACCOUNT_NAME,
            DecodedAccount::FeeTier(_) => FeeTier::ACCOUNT_NAME,
            DecodedAccount::PoolsConfig(_) => PoolsConfig::ACCOUNT_NAME,
        }
    }
}

/// Decode an account of unknown type by its discriminator
pub fn decode_any(data: &[u8]) -> ElysiumResult<DecodedAccount> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(ElysiumError::AccountDataTooSmall { len: data.len() });
    }
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&data[..DISCRIMINATOR_LEN]);
    let body = &data[DISCRIMINATOR_LEN..];

    if discriminator == Pool::discriminator() {
        Pool::decode_body(body).map(DecodedAccount::Pool)
    } else if discriminator == TickArray::discriminator() {
        TickArray::decode_body(body).map(DecodedAccount::TickArray)
    } else if discriminator == FeeTier::discriminator() {
        FeeTier::decode_body(body).map(DecodedAccount::FeeTier)
    } else if discriminator == PoolsConfig::discriminator() {
        PoolsConfig::decode_body(body).map(DecodedAccount::PoolsConfig)
    } else {
        Err(ElysiumError::UnknownAccountDiscriminator { discriminator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee_tier_bytes(tick_spacing: u16, fee_rate: u16) -> Vec<u8> {
        let mut data = FeeTier::discriminator().to_vec();
        data.extend_from_slice(&[7u8; 32]);
        data.extend_from_slice(&tick_spacing.to_le_bytes());
        data.extend_from_slice(&fee_rate.to_le_bytes());
        data
    }

    fn tick_array_bytes(start: i32, initialized_offset: usize) -> Vec<u8> {
        let mut data = TickArray::discriminator().to_vec();
        data.extend_from_slice(&start.to_le_bytes());
        for offset in 0..TICK_ARRAY_SIZE_USIZE {
            let initialized = offset == initialized_offset;
            data.push(initialized as u8);
            let net: i128 = if initialized { -500 } else { 0 };
            data.extend_from_slice(&net.to_le_bytes());
            let gross: u128 = if initialized { 500 } else { 0 };
            data.extend_from_slice(&gross.to_le_bytes());
            // fee growth a/b and three reward growths
            for _ in 0..5 {
                data.extend_from_slice(&0u128.to_le_bytes());
            }
        }
        data.extend_from_slice(&[3u8; 32]);
        data
    }

    #[test]
    fn test_discriminators_are_distinct() {
        let all = [
            Pool::discriminator(),
            TickArray::discriminator(),
            FeeTier::discriminator(),
            PoolsConfig::discriminator(),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_decode_fee_tier_with_reserved_bytes() {
        let mut data = fee_tier_bytes(64, 3000);
        data.extend_from_slice(&[0u8; 16]);
        let tier = FeeTier::decode(&data).unwrap();
        assert_eq!(tier.tick_spacing, 64);
        assert_eq!(tier.default_fee_rate, 3000);
        assert_eq!(tier.pools_config, Pubkey::new_from_array([7u8; 32]));
    }

    #[test]
    fn test_decode_tick_array() {
        let data = tick_array_bytes(-5632, 5);
        let array = TickArray::decode(&data).unwrap();
        assert_eq!(array.start_tick_index, -5632);
        assert_eq!(array.ticks.len(), TICK_ARRAY_SIZE_USIZE);
        assert!(array.ticks[5].initialized);
        assert_eq!(array.ticks[5].liquidity_net, -500);
        assert!(!array.ticks[6].initialized);
        assert_eq!(array.pool, Pubkey::new_from_array([3u8; 32]));
    }

    #[test]
    fn test_decode_rejects_wrong_discriminator() {
        let data = fee_tier_bytes(64, 3000);
        assert_eq!(
            Pool::decode(&data).unwrap_err(),
            ElysiumError::AccountDiscriminatorMismatch {
                account: "ElysiumPool"
            }
        );
        assert_eq!(
            FeeTier::decode(&data[..4]).unwrap_err(),
            ElysiumError::AccountDataTooSmall { len: 4 }
        );
    }

    #[test]
    fn test_decode_truncated_body() {
        let data = tick_array_bytes(0, 0);
        let err = TickArray::decode(&data[..200]).unwrap_err();
        assert!(matches!(err, ElysiumError::AccountDeserialize { account: "TickArray", .. }));
    }

    #[test]
    fn test_decode_any_dispatches() {
        let decoded = decode_any(&tick_array_bytes(0, 1)).unwrap();
        assert_eq!(decoded.account_name(), "TickArray");
        let decoded = decode_any(&fee_tier_bytes(1, 100)).unwrap();
        assert!(matches!(decoded, DecodedAccount::FeeTier(t) if t.tick_spacing == 1));
        assert!(matches!(
            decode_any(&[9u8; 40]),
            Err(ElysiumError::UnknownAccountDiscriminator { .. })
        ));
    }
}
