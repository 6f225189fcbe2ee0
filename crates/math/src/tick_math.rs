//! Tick index and sqrt price conversions
//!
//! The conversions delegate to Orca's Whirlpools core, whose tick math is
//! bit-exact with the ledger program. This module adds the bounds checks
//! and the tick-array start arithmetic used to derive array addresses.

use orca_whirlpools_core::{sqrt_price_to_tick_index, tick_index_to_sqrt_price};

use elysium_types::{
    ElysiumError, ElysiumResult, MAX_SQRT_PRICE, MAX_TICK_INDEX, MIN_SQRT_PRICE, MIN_TICK_INDEX,
    TICK_ARRAY_SIZE,
};

pub fn is_tick_index_in_bounds(tick_index: i32) -> bool {
    (MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_index)
}

/// sqrt(1.0001^tick) as Q64.64
pub fn sqrt_price_from_tick_index(tick_index: i32) -> ElysiumResult<u128> {
    if !is_tick_index_in_bounds(tick_index) {
        return Err(ElysiumError::InvalidTickIndex { tick_index });
    }
    Ok(tick_index_to_sqrt_price(tick_index).into())
}

/// Greatest tick whose sqrt price is at or below `sqrt_price`
pub fn tick_index_from_sqrt_price(sqrt_price: u128) -> ElysiumResult<i32> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return Err(ElysiumError::SqrtPriceOutOfBounds);
    }
    Ok(tick_index_from_sqrt_price_unchecked(sqrt_price))
}

pub(crate) fn tick_index_from_sqrt_price_unchecked(sqrt_price: u128) -> i32 {
    sqrt_price_to_tick_index(sqrt_price.into())
}

/// Start tick of the array holding `tick_index`, moved by `offset` arrays
///
/// Fails with `InvalidTickIndex` if the resulting array would start below
/// the lowest array covering `MIN_TICK_INDEX` or above `MAX_TICK_INDEX`.
pub fn tick_array_start_index(
    tick_index: i32,
    tick_spacing: u16,
    offset: i32,
) -> ElysiumResult<i32> {
    if tick_spacing == 0 {
        return Err(ElysiumError::InvalidTickSpacing { tick_spacing });
    }
    let ticks_in_array = i64::from(TICK_ARRAY_SIZE) * i64::from(tick_spacing);
    let real_index = i64::from(tick_index).div_euclid(ticks_in_array);
    let start_tick_index = (real_index + i64::from(offset)) * ticks_in_array;

    let min_tick_index = i64::from(MIN_TICK_INDEX);
    let min_start = min_tick_index - ((min_tick_index % ticks_in_array) + ticks_in_array);
    if start_tick_index < min_start || start_tick_index > i64::from(MAX_TICK_INDEX) {
        return Err(ElysiumError::InvalidTickIndex {
            tick_index: start_tick_index.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        });
    }
    Ok(start_tick_index as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elysium_types::Q64;

    #[test]
    fn test_bounds_round_trip() {
        assert_eq!(sqrt_price_from_tick_index(MIN_TICK_INDEX), Ok(MIN_SQRT_PRICE));
        assert_eq!(sqrt_price_from_tick_index(MAX_TICK_INDEX), Ok(MAX_SQRT_PRICE));
        assert_eq!(sqrt_price_from_tick_index(0), Ok(Q64));
        assert_eq!(tick_index_from_sqrt_price(MIN_SQRT_PRICE), Ok(MIN_TICK_INDEX));
        assert_eq!(tick_index_from_sqrt_price(MAX_SQRT_PRICE), Ok(MAX_TICK_INDEX));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            sqrt_price_from_tick_index(MAX_TICK_INDEX + 1),
            Err(ElysiumError::InvalidTickIndex {
                tick_index: MAX_TICK_INDEX + 1
            })
        );
        assert_eq!(
            tick_index_from_sqrt_price(MIN_SQRT_PRICE - 1),
            Err(ElysiumError::SqrtPriceOutOfBounds)
        );
    }

    #[test]
    fn test_tick_between_prices_rounds_down() {
        let p10 = sqrt_price_from_tick_index(10).unwrap();
        let p11 = sqrt_price_from_tick_index(11).unwrap();
        assert_eq!(tick_index_from_sqrt_price(p10 + (p11 - p10) / 2), Ok(10));
        let m1 = sqrt_price_from_tick_index(-1).unwrap();
        assert_eq!(tick_index_from_sqrt_price(Q64 - 1), Ok(-1));
        assert!(m1 < Q64);
    }

    #[test]
    fn test_tick_array_start_index() {
        assert_eq!(tick_array_start_index(0, 64, 0), Ok(0));
        assert_eq!(tick_array_start_index(5631, 64, 0), Ok(0));
        assert_eq!(tick_array_start_index(5632, 64, 0), Ok(5632));
        assert_eq!(tick_array_start_index(-1, 64, 0), Ok(-5632));
        assert_eq!(tick_array_start_index(100, 64, -1), Ok(-5632));
        assert_eq!(tick_array_start_index(100, 64, 2), Ok(11264));
        assert_eq!(tick_array_start_index(-5633, 1, 0), Ok(-5720));
    }

    #[test]
    fn test_tick_array_start_index_bounds() {
        // lowest array covering MIN_TICK_INDEX for spacing 64 starts at -79 * 5632
        assert_eq!(tick_array_start_index(MIN_TICK_INDEX, 64, 0), Ok(-444_928));
        assert!(tick_array_start_index(MIN_TICK_INDEX, 64, -1).is_err());
        assert_eq!(tick_array_start_index(MAX_TICK_INDEX, 64, 0), Ok(439_296));
        assert!(tick_array_start_index(MAX_TICK_INDEX, 64, 1).is_err());
        assert_eq!(
            tick_array_start_index(0, 0, 0),
            Err(ElysiumError::InvalidTickSpacing { tick_spacing: 0 })
        );
    }
}
