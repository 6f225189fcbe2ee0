//! # Tick Array Sequence
//!
//! The (at most three) tick arrays a swap may traverse, ordered in the trade
//! direction starting from the array holding the current tick. The sequence
//! resolves tick indices to ticks, searches for the next initialized tick,
//! and records which arrays were read and how many ticks were crossed.
//!
//! Only the leading run of present arrays is searchable. The first absent
//! slot ends the window.

use tracing::trace;

use elysium_types::{
    ElysiumError, ElysiumResult, Pubkey, Tick, TickArray, TickArraySlot, MAX_SWAP_TICK_ARRAYS,
    MAX_TICK_INDEX, MIN_TICK_INDEX, TICK_ARRAY_SIZE, TICK_ARRAY_SIZE_USIZE,
};

// ============================================================================
// Tick Array Index
// ============================================================================

/// Position of a tick expressed as (array, offset within the array)
///
/// Uses floor division, so negative ticks land in the array below zero
/// rather than being truncated toward it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickArrayIndex {
    pub array_index: i32,
    pub offset_index: i32,
    pub tick_spacing: i32,
}

impl TickArrayIndex {
    pub fn from_tick_index(tick_index: i32, tick_spacing: u16) -> Self {
        let tick_spacing = i32::from(tick_spacing);
        let array_index = tick_index
            .div_euclid(tick_spacing)
            .div_euclid(TICK_ARRAY_SIZE);
        let offset_index = tick_index.rem_euclid(tick_spacing * TICK_ARRAY_SIZE) / tick_spacing;
        Self {
            array_index,
            offset_index,
            tick_spacing,
        }
    }

    /// First tick index of this position
    pub fn to_tick_index(&self) -> i32 {
        (self.array_index * TICK_ARRAY_SIZE + self.offset_index) * self.tick_spacing
    }

    pub fn is_in_bounds(&self) -> bool {
        let tick_index = self.to_tick_index();
        (MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_index)
    }

    fn spacing(&self) -> u16 {
        // built from a u16 in from_tick_index
        self.tick_spacing as u16
    }

    fn next_initializable(&self) -> Self {
        Self::from_tick_index(self.to_tick_index() + self.tick_spacing, self.spacing())
    }

    fn prev_initializable(&self) -> Self {
        Self::from_tick_index(self.to_tick_index() - self.tick_spacing, self.spacing())
    }
}

// ============================================================================
// Tick Array Sequence
// ============================================================================

#[derive(Debug, Clone)]
pub struct TickArraySequence {
    slots: Vec<TickArraySlot>,
    /// Number of leading slots that hold an array
    window_len: usize,
    touched: [bool; MAX_SWAP_TICK_ARRAYS],
    crossings: usize,
    start_array_index: i32,
    tick_spacing: u16,
    a_to_b: bool,
}

impl TickArraySequence {
    /// Build a sequence, validating it up front
    ///
    /// The first slot must hold an array, and each following array must
    /// start exactly one array span after its predecessor in the trade
    /// direction. Every array in the window must hold a full set of ticks
    /// and start on an array boundary.
    pub fn new(slots: Vec<TickArraySlot>, tick_spacing: u16, a_to_b: bool) -> ElysiumResult<Self> {
        if tick_spacing == 0 {
            return Err(ElysiumError::InvalidTickSpacing { tick_spacing });
        }
        if slots.len() > MAX_SWAP_TICK_ARRAYS {
            return Err(ElysiumError::sequence_invalid(format!(
                "Sequence holds {} tick arrays, at most {} are allowed.",
                slots.len(),
                MAX_SWAP_TICK_ARRAYS
            )));
        }

        let first = slots
            .first()
            .and_then(|slot| slot.data.as_ref())
            .ok_or(ElysiumError::TickArrayIndexNotInitialized { index: 0 })?;
        let start_array_index =
            TickArrayIndex::from_tick_index(first.start_tick_index, tick_spacing).array_index;

        let window_len = slots.iter().take_while(|slot| slot.is_initialized()).count();

        let span = i64::from(tick_spacing) * i64::from(TICK_ARRAY_SIZE);
        for (index, slot) in slots.iter().take(window_len).enumerate() {
            if let Some(array) = &slot.data {
                check_array_shape(index, array, span)?;
            }
        }

        let step = if a_to_b { -span } else { span };
        for index in 1..window_len {
            let (prev, curr) = (&slots[index - 1].data, &slots[index].data);
            if let (Some(prev), Some(curr)) = (prev, curr) {
                if i64::from(curr.start_tick_index) != i64::from(prev.start_tick_index) + step {
                    return Err(ElysiumError::sequence_invalid(format!(
                        "TickArray at index {} is unexpected for this sequence.",
                        index
                    )));
                }
            }
        }

        Ok(Self {
            slots,
            window_len,
            touched: [false; MAX_SWAP_TICK_ARRAYS],
            crossings: 0,
            start_array_index,
            tick_spacing,
            a_to_b,
        })
    }

    pub fn tick_spacing(&self) -> u16 {
        self.tick_spacing
    }

    pub fn a_to_b(&self) -> bool {
        self.a_to_b
    }

    /// Whether the first array holds the pool's current tick
    ///
    /// For B to A the search begins one spacing above the current tick, so
    /// that shifted index is the one checked.
    pub fn is_valid_first_array(&self, tick_current_index: i32) -> bool {
        let shift = if self.a_to_b { 0 } else { i32::from(self.tick_spacing) };
        let Some(shifted) = tick_current_index.checked_add(shift) else {
            return false;
        };
        self.array_at(0)
            .map(|array| array.contains_tick_index(shifted, self.tick_spacing))
            .unwrap_or(false)
    }

    /// Resolve a tick index to its tick, marking the owning array as read
    pub fn get_tick(&mut self, tick_index: i32) -> ElysiumResult<&Tick> {
        if tick_index.rem_euclid(i32::from(self.tick_spacing)) != 0 {
            return Err(ElysiumError::TickNotFound {
                tick_index,
                tick_spacing: self.tick_spacing,
            });
        }
        let index = TickArrayIndex::from_tick_index(tick_index, self.tick_spacing);
        let local = self.local_array_index(index.array_index).ok_or_else(|| {
            ElysiumError::sequence_invalid(format!(
                "Provided tick index {} is out of bounds for this sequence.",
                tick_index
            ))
        })?;
        if local >= self.window_len {
            return Err(ElysiumError::TickArrayIndexNotInitialized { index: local });
        }
        self.touched[local] = true;
        trace!(tick_index, local, "tick lookup");
        self.tick_at(local, index.offset_index).ok_or(ElysiumError::TickNotFound {
            tick_index,
            tick_spacing: self.tick_spacing,
        })
    }

    /// Next initialized tick in the trade direction, or the window boundary
    ///
    /// Returns the tick index with its tick when one is found. When the
    /// window runs out first, returns the last tick index the window covers
    /// (clamped to the global tick bounds) and `None`.
    pub fn find_next_initialized_tick_index(
        &mut self,
        tick_index: i32,
    ) -> ElysiumResult<(i32, Option<Tick>)> {
        let spacing = i32::from(self.tick_spacing);
        let search_index = if self.a_to_b {
            tick_index
        } else {
            tick_index.saturating_add(spacing)
        };
        let mut index = TickArrayIndex::from_tick_index(search_index, self.tick_spacing);

        let local = self.local_array_index(index.array_index).ok_or_else(|| {
            ElysiumError::sequence_invalid(format!(
                "Swap input value traversed too many arrays. \
                 Out of bounds at attempt to traverse tick index - {}.",
                index.to_tick_index()
            ))
        })?;
        if local >= self.window_len {
            return Err(ElysiumError::TickArrayIndexNotInitialized { index: local });
        }

        while let Some(local) = self.window_slot(index.array_index) {
            self.touched[local] = true;
            if let Some(tick) = self.tick_at(local, index.offset_index) {
                if tick.initialized {
                    let found = index.to_tick_index();
                    trace!(tick_index = found, local, "next initialized tick");
                    return Ok((found, Some(*tick)));
                }
            }
            index = if self.a_to_b {
                index.prev_initializable()
            } else {
                index.next_initializable()
            };
        }

        let boundary = if self.a_to_b {
            index.to_tick_index() + spacing
        } else {
            index.to_tick_index() - 1
        };
        let boundary = boundary.clamp(MIN_TICK_INDEX, MAX_TICK_INDEX);
        trace!(boundary, "tick array window exhausted");
        Ok((boundary, None))
    }

    /// The next initialized tick index, or `None` once the window is exhausted
    pub fn next_initialized_tick_index(&mut self, tick_index: i32) -> ElysiumResult<Option<i32>> {
        let (index, tick) = self.find_next_initialized_tick_index(tick_index)?;
        Ok(tick.map(|_| index))
    }

    pub fn record_crossing(&mut self) {
        self.crossings += 1;
    }

    /// Initialized ticks crossed so far; independent of how many arrays were read
    pub fn crossing_count(&self) -> usize {
        self.crossings
    }

    pub fn touched_count(&self) -> usize {
        self.touched.iter().filter(|touched| **touched).count()
    }

    /// Addresses of the arrays read so far, in sequence order
    pub fn touched_arrays(&self) -> Vec<Pubkey> {
        self.slots
            .iter()
            .zip(self.touched.iter())
            .filter(|(_, touched)| **touched)
            .map(|(slot, _)| slot.address)
            .collect()
    }

    /// Touched addresses padded to `count` with the last touched one
    ///
    /// The swap instruction always takes `count` array accounts; repeating
    /// the last one fills positions the swap never reaches. With nothing
    /// touched the first slot's address fills every position.
    pub fn tick_array_addresses(&self, count: usize) -> Vec<Pubkey> {
        let mut addresses = self.touched_arrays();
        let fill = addresses
            .last()
            .copied()
            .or_else(|| self.slots.first().map(|slot| slot.address));
        if let Some(fill) = fill {
            addresses.resize(count.max(addresses.len()), fill);
        }
        addresses
    }

    fn local_array_index(&self, array_index: i32) -> Option<usize> {
        let local = if self.a_to_b {
            i64::from(self.start_array_index) - i64::from(array_index)
        } else {
            i64::from(array_index) - i64::from(self.start_array_index)
        };
        usize::try_from(local)
            .ok()
            .filter(|local| *local < MAX_SWAP_TICK_ARRAYS)
    }

    fn window_slot(&self, array_index: i32) -> Option<usize> {
        self.local_array_index(array_index)
            .filter(|local| *local < self.window_len)
    }

    fn array_at(&self, local: usize) -> Option<&TickArray> {
        self.slots.get(local).and_then(|slot| slot.data.as_ref())
    }

    fn tick_at(&self, local: usize, offset_index: i32) -> Option<&Tick> {
        let offset = usize::try_from(offset_index).ok()?;
        self.array_at(local).and_then(|array| array.tick(offset))
    }
}

/// An array the window can search: 88 ticks, starting on a span boundary
fn check_array_shape(index: usize, array: &TickArray, span: i64) -> ElysiumResult<()> {
    if array.ticks.len() != TICK_ARRAY_SIZE_USIZE {
        return Err(ElysiumError::sequence_invalid(format!(
            "TickArray at index {} holds {} ticks, expected {}.",
            index,
            array.ticks.len(),
            TICK_ARRAY_SIZE_USIZE
        )));
    }
    if i64::from(array.start_tick_index).rem_euclid(span) != 0 {
        return Err(ElysiumError::sequence_invalid(format!(
            "TickArray at index {} starts at {}, which is not a multiple of {}.",
            index, array.start_tick_index, span
        )));
    }
    Ok(())
}
