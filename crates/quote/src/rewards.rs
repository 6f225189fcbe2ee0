//! Reward growth catch-up
//!
//! Before a swap moves liquidity, the pool program accrues emissions for
//! the time since the last update. A quote that crosses ticks must flip
//! reward growth against the same caught-up globals.

use elysium_math::checked_mul_div;
use elysium_types::{ElysiumError, ElysiumResult, Pool, PoolRewardInfo, NUM_REWARDS};

/// Reward infos as of `timestamp`
///
/// Growth only accrues while liquidity is in range. An emission rate large
/// enough to overflow the per-liquidity delta contributes nothing, the
/// same way the program halts such a reward instead of failing the swap.
pub fn next_reward_infos(
    pool: &Pool,
    timestamp: u64,
) -> ElysiumResult<[PoolRewardInfo; NUM_REWARDS]> {
    let last_updated = pool.reward_last_updated_timestamp;
    if timestamp < last_updated {
        return Err(ElysiumError::InvalidTimestamp {
            timestamp,
            last_updated,
        });
    }

    let mut reward_infos = pool.reward_infos;
    if pool.liquidity == 0 || timestamp == last_updated {
        return Ok(reward_infos);
    }

    let time_delta = u128::from(timestamp - last_updated);
    for reward_info in reward_infos.iter_mut().filter(|info| info.initialized()) {
        let growth_delta =
            checked_mul_div(time_delta, reward_info.emissions_per_second_x64, pool.liquidity)
                .unwrap_or(0);
        reward_info.growth_global_x64 = reward_info.growth_global_x64.wrapping_add(growth_delta);
    }

    Ok(reward_infos)
}
