//! # Swap Stepping Engine
//!
//! Replays the pool program's swap loop off-chain:
//!
//! 1. Find the next initialized tick (or the end of the tick array window)
//! 2. Step toward it, stopping early at the price limit or when the amount
//!    runs out
//! 3. Charge the fee on the input side and split off the protocol share
//! 4. When the step lands on an initialized tick, cross it: apply its net
//!    liquidity and flip its outside growth counters
//!
//! The loop ends when the amount is spent or the price limit is reached.
//! Running out of tick arrays first surfaces as a sequence error from the
//! next search.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rewards::next_reward_infos;
use crate::tick_array_sequence::TickArraySequence;
use elysium_math::{compute_swap_step, SqrtPriceX64, SwapStepComputation};
use elysium_types::{
    ElysiumError, ElysiumResult, Pool, PoolRewardInfo, Tick, NUM_REWARDS,
    PROTOCOL_FEE_RATE_MUL_VALUE, Q64_RESOLUTION,
};

/// New state of a crossed tick, as the program would write it back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickUpdate {
    pub initialized: bool,
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_a: u128,
    pub fee_growth_outside_b: u128,
    pub reward_growths_outside: [u128; NUM_REWARDS],
}

/// Outcome of a full swap simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    pub amount_a: u64,
    pub amount_b: u64,
    pub next_liquidity: u128,
    pub next_tick_index: i32,
    pub next_sqrt_price: u128,
    /// Fee growth of the input side after the swap
    pub next_fee_growth_global: u128,
    /// Protocol fee accrued by this swap alone
    pub next_protocol_fee: u64,
    pub next_reward_infos: [PoolRewardInfo; NUM_REWARDS],
    pub total_fee_amount: u64,
    pub tick_updates: Vec<(i32, TickUpdate)>,
    pub crossing_count: usize,
}

/// Swap state tracking during execution
#[derive(Debug)]
struct SwapState {
    amount_remaining: u64,
    amount_calculated: u64,
    sqrt_price: SqrtPriceX64,
    tick_index: i32,
    liquidity: u128,
    fee_growth_global: u128,
    protocol_fee: u64,
    total_fee: u64,
}

impl SwapState {
    fn new(pool: &Pool, amount: u64, a_to_b: bool) -> ElysiumResult<Self> {
        Ok(Self {
            amount_remaining: amount,
            amount_calculated: 0,
            sqrt_price: SqrtPriceX64::try_new(pool.sqrt_price)?,
            tick_index: pool.tick_current_index,
            liquidity: pool.liquidity,
            fee_growth_global: pool.input_fee_growth(a_to_b),
            protocol_fee: 0,
            total_fee: 0,
        })
    }

    fn apply_amounts(
        &mut self,
        step: &SwapStepComputation,
        amount_specified_is_input: bool,
    ) -> ElysiumResult<()> {
        let gross_in = step
            .amount_in
            .checked_add(step.fee_amount)
            .ok_or(ElysiumError::AmountCalcOverflow)?;

        if amount_specified_is_input {
            self.amount_remaining = self
                .amount_remaining
                .checked_sub(gross_in)
                .ok_or(ElysiumError::AmountRemainingOverflow)?;
            self.amount_calculated = self
                .amount_calculated
                .checked_add(step.amount_out)
                .ok_or(ElysiumError::AmountCalcOverflow)?;
        } else {
            self.amount_remaining = self
                .amount_remaining
                .checked_sub(step.amount_out)
                .ok_or(ElysiumError::AmountRemainingOverflow)?;
            self.amount_calculated = self
                .amount_calculated
                .checked_add(gross_in)
                .ok_or(ElysiumError::AmountCalcOverflow)?;
        }
        Ok(())
    }

    /// Split the step fee between the protocol and liquidity providers
    fn apply_fee(&mut self, fee_amount: u64, protocol_fee_rate: u16) -> ElysiumResult<()> {
        self.total_fee = self
            .total_fee
            .checked_add(fee_amount)
            .ok_or(ElysiumError::AmountCalcOverflow)?;

        // rate <= 10_000 so the delta never exceeds the fee
        let protocol_delta = (u128::from(fee_amount) * u128::from(protocol_fee_rate)
            / PROTOCOL_FEE_RATE_MUL_VALUE) as u64;
        self.protocol_fee = self.protocol_fee.wrapping_add(protocol_delta);

        if self.liquidity > 0 {
            let lp_fee = u128::from(fee_amount.saturating_sub(protocol_delta));
            let growth_delta = (lp_fee << Q64_RESOLUTION) / self.liquidity;
            self.fee_growth_global = self.fee_growth_global.wrapping_add(growth_delta);
        }
        Ok(())
    }

    fn apply_liquidity_net(&mut self, liquidity_net: i128, a_to_b: bool) -> ElysiumResult<()> {
        let signed = if a_to_b {
            liquidity_net
                .checked_neg()
                .ok_or(ElysiumError::LiquidityOverflow)?
        } else {
            liquidity_net
        };

        self.liquidity = if signed < 0 {
            self.liquidity
                .checked_sub(signed.unsigned_abs())
                .ok_or(ElysiumError::LiquidityUnderflow)?
        } else {
            self.liquidity
                .checked_add(signed.unsigned_abs())
                .ok_or(ElysiumError::LiquidityOverflow)?
        };
        Ok(())
    }
}

/// Flip the outside growth counters of a crossed tick
fn cross_tick(
    tick: &Tick,
    fee_growth_global_a: u128,
    fee_growth_global_b: u128,
    reward_infos: &[PoolRewardInfo; NUM_REWARDS],
) -> TickUpdate {
    let mut reward_growths_outside = tick.reward_growths_outside;
    for (outside, info) in reward_growths_outside.iter_mut().zip(reward_infos.iter()) {
        if info.initialized() {
            *outside = info.growth_global_x64.wrapping_sub(*outside);
        }
    }

    TickUpdate {
        initialized: tick.initialized,
        liquidity_net: tick.liquidity_net,
        liquidity_gross: tick.liquidity_gross,
        fee_growth_outside_a: fee_growth_global_a.wrapping_sub(tick.fee_growth_outside_a),
        fee_growth_outside_b: fee_growth_global_b.wrapping_sub(tick.fee_growth_outside_b),
        reward_growths_outside,
    }
}

/// Simulate a swap of `amount` against `pool` across `sequence`
///
/// `timestamp` is the time rewards are caught up to before any tick is
/// crossed; pass the pool's last update time to leave rewards untouched.
/// Fails with `SqrtPriceOutOfBounds` if the pool price is outside the
/// global bounds.
pub fn compute_swap(
    pool: &Pool,
    sequence: &mut TickArraySequence,
    amount: u64,
    sqrt_price_limit: SqrtPriceX64,
    amount_specified_is_input: bool,
    a_to_b: bool,
    timestamp: u64,
) -> ElysiumResult<SwapResult> {
    let reward_infos = next_reward_infos(pool, timestamp)?;
    let mut state = SwapState::new(pool, amount, a_to_b)?;
    let mut tick_updates = Vec::new();

    while state.amount_remaining > 0 && state.sqrt_price != sqrt_price_limit {
        let (next_tick_index, next_tick) =
            sequence.find_next_initialized_tick_index(state.tick_index)?;
        let next_tick_sqrt_price = SqrtPriceX64::from_tick_index(next_tick_index)?;
        let target_sqrt_price = if a_to_b {
            next_tick_sqrt_price.max(sqrt_price_limit)
        } else {
            next_tick_sqrt_price.min(sqrt_price_limit)
        };

        let step = compute_swap_step(
            state.amount_remaining,
            pool.fee_rate,
            state.liquidity,
            state.sqrt_price.get(),
            target_sqrt_price.get(),
            amount_specified_is_input,
            a_to_b,
        )?;
        let next_sqrt_price = SqrtPriceX64::try_new(step.next_sqrt_price)?;

        debug!(
            tick_index = state.tick_index,
            next_tick_index,
            liquidity = state.liquidity,
            amount_in = step.amount_in,
            amount_out = step.amount_out,
            fee = step.fee_amount,
            "swap step"
        );

        state.apply_amounts(&step, amount_specified_is_input)?;
        state.apply_fee(step.fee_amount, pool.protocol_fee_rate)?;

        if next_sqrt_price == next_tick_sqrt_price {
            if let Some(tick) = next_tick.filter(|tick| tick.initialized) {
                let (fee_growth_global_a, fee_growth_global_b) = if a_to_b {
                    (state.fee_growth_global, pool.fee_growth_global_b)
                } else {
                    (pool.fee_growth_global_a, state.fee_growth_global)
                };
                let update =
                    cross_tick(&tick, fee_growth_global_a, fee_growth_global_b, &reward_infos);
                state.apply_liquidity_net(tick.liquidity_net, a_to_b)?;
                tick_updates.push((next_tick_index, update));
                sequence.record_crossing();
                debug!(tick_index = next_tick_index, liquidity = state.liquidity, "crossed tick");
            }
            state.tick_index = if a_to_b {
                next_tick_index - 1
            } else {
                next_tick_index
            };
        } else if next_sqrt_price != state.sqrt_price {
            state.tick_index = next_sqrt_price.to_tick_index();
        }

        state.sqrt_price = next_sqrt_price;
    }

    let amount_specified_used = amount - state.amount_remaining;
    let (amount_a, amount_b) = if a_to_b == amount_specified_is_input {
        (amount_specified_used, state.amount_calculated)
    } else {
        (state.amount_calculated, amount_specified_used)
    };

    Ok(SwapResult {
        amount_a,
        amount_b,
        next_liquidity: state.liquidity,
        next_tick_index: state.tick_index,
        next_sqrt_price: state.sqrt_price.get(),
        next_fee_growth_global: state.fee_growth_global,
        next_protocol_fee: state.protocol_fee,
        next_reward_infos: reward_infos,
        total_fee_amount: state.total_fee,
        tick_updates,
        crossing_count: sequence.crossing_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use elysium_types::{Pubkey, TickArray, TickArraySlot, Q64, TICK_ARRAY_SIZE};

    const SPACING: u16 = 64;
    const SPAN: i32 = TICK_ARRAY_SIZE * SPACING as i32;

    fn pool(liquidity: u128) -> Pool {
        Pool {
            tick_spacing: SPACING,
            fee_rate: 3000,
            protocol_fee_rate: 300,
            liquidity,
            sqrt_price: Q64,
            tick_current_index: 0,
            ..Pool::default()
        }
    }

    fn slot_with(start: i32, ticks: &[(i32, i128)]) -> TickArraySlot {
        let mut array = TickArray::empty(Pubkey::default(), start);
        for (tick_index, liquidity_net) in ticks {
            let offset = ((tick_index - start) / SPACING as i32) as usize;
            let tick = array.tick_mut(offset).unwrap();
            tick.initialized = true;
            tick.liquidity_net = *liquidity_net;
            tick.liquidity_gross = liquidity_net.unsigned_abs();
        }
        TickArraySlot::initialized(Pubkey::new_unique(), array)
    }

    #[test]
    fn test_exact_input_within_one_range() {
        let pool = pool(1_000_000_000);
        let mut seq = TickArraySequence::new(vec![slot_with(0, &[])], SPACING, false).unwrap();
        let result =
            compute_swap(&pool, &mut seq, 100_000, SqrtPriceX64::MAX, true, false, 0).unwrap();

        assert_eq!(result.amount_b, 100_000);
        assert!(result.amount_a > 0 && result.amount_a < 100_000);
        assert_eq!(result.total_fee_amount, 300);
        assert_eq!(result.next_protocol_fee, 9);
        assert!(result.next_sqrt_price > Q64);
        assert!(result.next_fee_growth_global > 0);
        assert_eq!(result.crossing_count, 0);
        assert!(result.tick_updates.is_empty());
    }

    #[test]
    fn test_stops_at_price_limit() {
        let pool = pool(1_000_000_000);
        let limit = SqrtPriceX64::from_tick_index(10).unwrap();
        let mut seq = TickArraySequence::new(vec![slot_with(0, &[])], SPACING, false).unwrap();
        let result = compute_swap(&pool, &mut seq, u64::MAX / 2, limit, true, false, 0).unwrap();

        assert_eq!(result.next_sqrt_price, limit.get());
        assert_eq!(result.next_tick_index, 10);
        assert!(result.amount_b < u64::MAX / 2);
    }

    #[test]
    fn test_crosses_initialized_tick_a_to_b() {
        // liquidity enters at -128 going down: liquidity_net is added when
        // crossing upward, so A to B subtracts it
        let pool = pool(1_000_000);
        let slots = vec![slot_with(0, &[]), slot_with(-SPAN, &[(-128, 400_000)])];
        let mut seq = TickArraySequence::new(slots, SPACING, true).unwrap();
        let limit = SqrtPriceX64::from_tick_index(-192).unwrap();
        let result = compute_swap(&pool, &mut seq, u64::MAX / 2, limit, true, true, 0).unwrap();

        assert_eq!(result.next_sqrt_price, limit.get());
        assert_eq!(result.next_liquidity, 600_000);
        assert_eq!(result.crossing_count, 1);
        assert_eq!(result.tick_updates.len(), 1);
        let (tick_index, update) = result.tick_updates[0];
        assert_eq!(tick_index, -128);
        // flipped against the growth at the moment of crossing, before the last step
        assert!(update.fee_growth_outside_a > 0);
        assert!(update.fee_growth_outside_a < result.next_fee_growth_global);
        assert_eq!(update.fee_growth_outside_b, 0);
    }

    #[test]
    fn test_liquidity_underflow_on_cross() {
        let pool = pool(1_000);
        let slots = vec![slot_with(0, &[(64, -5_000)])];
        let mut seq = TickArraySequence::new(slots, SPACING, false).unwrap();
        assert_eq!(
            compute_swap(&pool, &mut seq, u64::MAX / 2, SqrtPriceX64::MAX, true, false, 0),
            Err(ElysiumError::LiquidityUnderflow)
        );
    }

    #[test]
    fn test_window_exhaustion_is_an_error() {
        let pool = pool(1_000);
        let mut seq = TickArraySequence::new(vec![slot_with(0, &[])], SPACING, true).unwrap();
        let err = compute_swap(&pool, &mut seq, u64::MAX / 2, SqrtPriceX64::MIN, true, true, 0)
            .unwrap_err();
        assert!(err.is_sequence_error());
    }

    #[test]
    fn test_rejects_pool_price_out_of_bounds() {
        let mut pool = pool(1_000_000);
        pool.sqrt_price = 0;
        let mut seq = TickArraySequence::new(vec![slot_with(0, &[])], SPACING, true).unwrap();
        assert_eq!(
            compute_swap(&pool, &mut seq, 1_000, SqrtPriceX64::MIN, true, true, 0),
            Err(ElysiumError::SqrtPriceOutOfBounds)
        );
        assert_eq!(seq.touched_count(), 0);
    }

    #[test]
    fn test_exact_output_amounts() {
        let pool = pool(1_000_000_000);
        let slots = vec![slot_with(0, &[]), slot_with(-SPAN, &[])];
        let mut seq = TickArraySequence::new(slots, SPACING, true).unwrap();
        let result =
            compute_swap(&pool, &mut seq, 50_000, SqrtPriceX64::MIN, false, true, 0).unwrap();

        // exact output of B: A is the computed side and includes the fee
        assert_eq!(result.amount_b, 50_000);
        assert!(result.amount_a > 50_000);
        assert!(result.total_fee_amount > 0);
    }

    #[test]
    fn test_rewards_flip_on_cross() {
        let mut pool = pool(1_000_000);
        pool.reward_infos[0].mint = Pubkey::new_unique();
        pool.reward_infos[0].emissions_per_second_x64 = Q64;
        let slots = vec![slot_with(0, &[(64, 1)])];
        let mut seq = TickArraySequence::new(slots, SPACING, false).unwrap();
        let limit = SqrtPriceX64::from_tick_index(100).unwrap();
        let result =
            compute_swap(&pool, &mut seq, u64::MAX / 2, limit, true, false, 1_000_000).unwrap();

        let growth = result.next_reward_infos[0].growth_global_x64;
        assert!(growth > 0);
        assert_eq!(result.tick_updates[0].1.reward_growths_outside[0], growth);
        assert_eq!(result.tick_updates[0].1.reward_growths_outside[1], 0);
    }
}
