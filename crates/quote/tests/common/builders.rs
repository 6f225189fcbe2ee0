//! Builder patterns for pool and tick array snapshots

use std::collections::HashMap;

use elysium_math::sqrt_price_from_tick_index;
use elysium_quote::PdaBuilder;
use elysium_types::{Pool, Pubkey, TickArray, TickArraySlot};

use super::SPACING;

/// Builder for pool snapshots priced at a tick
pub struct PoolBuilder {
    tick_spacing: u16,
    fee_rate: u16,
    protocol_fee_rate: u16,
    liquidity: u128,
    tick_current_index: i32,
    sqrt_price: Option<u128>,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self {
            tick_spacing: SPACING,
            fee_rate: 3000,
            protocol_fee_rate: 300,
            liquidity: 1_000_000_000_000,
            tick_current_index: 0,
            sqrt_price: None,
        }
    }

    pub fn fee_rate(mut self, fee_rate: u16) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    pub fn liquidity(mut self, liquidity: u128) -> Self {
        self.liquidity = liquidity;
        self
    }

    /// Place the pool exactly on `tick`
    pub fn tick(mut self, tick: i32) -> Self {
        self.tick_current_index = tick;
        self
    }

    /// Override the price while keeping the current tick
    pub fn sqrt_price(mut self, sqrt_price: u128) -> Self {
        self.sqrt_price = Some(sqrt_price);
        self
    }

    pub fn build(self) -> Pool {
        let sqrt_price = self
            .sqrt_price
            .unwrap_or_else(|| sqrt_price_from_tick_index(self.tick_current_index).unwrap());
        Pool {
            tick_spacing: self.tick_spacing,
            tick_spacing_seed: self.tick_spacing.to_le_bytes(),
            fee_rate: self.fee_rate,
            protocol_fee_rate: self.protocol_fee_rate,
            liquidity: self.liquidity,
            sqrt_price,
            tick_current_index: self.tick_current_index,
            token_mint_a: Pubkey::new_unique(),
            token_mint_b: Pubkey::new_unique(),
            ..Pool::default()
        }
    }
}

/// Builder for one tick array with a handful of initialized ticks
pub struct TickArrayBuilder {
    array: TickArray,
}

impl TickArrayBuilder {
    pub fn new(start_tick_index: i32) -> Self {
        Self {
            array: TickArray::empty(Pubkey::default(), start_tick_index),
        }
    }

    /// Initialize `tick_index` with the given net liquidity
    pub fn tick(mut self, tick_index: i32, liquidity_net: i128) -> Self {
        let offset = ((tick_index - self.array.start_tick_index) / SPACING as i32) as usize;
        let tick = self.array.tick_mut(offset).unwrap();
        tick.initialized = true;
        tick.liquidity_net = liquidity_net;
        tick.liquidity_gross = liquidity_net.unsigned_abs();
        self
    }

    pub fn build(self) -> TickArray {
        self.array
    }

    pub fn slot(self) -> TickArraySlot {
        TickArraySlot::initialized(Pubkey::new_unique(), self.build())
    }
}

/// Empty arrays starting at each of `starts`
pub fn empty_slots(starts: &[i32]) -> Vec<TickArraySlot> {
    starts
        .iter()
        .map(|start| TickArrayBuilder::new(*start).slot())
        .collect()
}

/// Store `arrays` under their derived addresses for `pool_address`
pub fn account_source(
    pda: &PdaBuilder,
    pool_address: &Pubkey,
    arrays: Vec<TickArray>,
) -> HashMap<Pubkey, TickArray> {
    arrays
        .into_iter()
        .map(|array| (pda.tick_array(pool_address, array.start_tick_index).0, array))
        .collect()
}
