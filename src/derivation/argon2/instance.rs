//! Shape of one hashing run and coordinates inside it.
//!
//! Memory is organized as a matrix of 1024-byte blocks:
//! - **Lanes**: independent rows that can be processed in parallel.
//! - **Slices**: each lane is divided into 4 slices (sync points).
//! - **Segments**: the blocks of one lane within one slice.

use super::consts::{MIN_MEMORY_PER_LANE, SYNC_POINTS};
use super::params::{Algorithm, Version};

/// Immutable description of a hashing run.
///
/// The block arena itself is held by the memory guard; an `Instance` only
/// says how that arena is carved up and which policy fills it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Instance {
    pub passes: u32,
    pub memory_blocks: u32,
    pub segment_length: u32,
    pub lane_length: u32,
    pub lanes: u32,
    pub threads: u32,
    pub algorithm: Algorithm,
    pub version: Version,
    pub print_internals: bool,
}

impl Instance {
    /// Derives the memory layout from already validated costs.
    ///
    /// The block count is raised to the two-blocks-per-slice minimum and
    /// then rounded down to a multiple of `4 × lanes`. Threads beyond the
    /// number of lanes would have nothing to do and are clamped.
    pub(crate) fn new(
        mem_kib: u32,
        passes: u32,
        lanes: u32,
        threads: u32,
        algorithm: Algorithm,
        version: Version,
    ) -> Self {
        let min_blocks = MIN_MEMORY_PER_LANE * lanes;
        let requested = mem_kib.max(min_blocks);
        let segment_length = requested / (lanes * SYNC_POINTS);
        let lane_length = segment_length * SYNC_POINTS;

        Self {
            passes,
            memory_blocks: lane_length * lanes,
            segment_length,
            lane_length,
            lanes,
            threads: threads.min(lanes),
            algorithm,
            version,
            print_internals: false,
        }
    }

    pub(crate) fn with_print_internals(mut self, print_internals: bool) -> Self {
        self.print_internals = print_internals;
        self
    }

    /// Absolute arena index of block `index_in_lane` of `lane`.
    #[inline]
    pub(crate) fn index(&self, lane: u32, index_in_lane: u32) -> usize {
        lane as usize * self.lane_length as usize + index_in_lane as usize
    }

    /// Absolute arena index of the last block of `lane`.
    #[inline]
    pub(crate) fn last_block(&self, lane: u32) -> usize {
        self.index(lane, self.lane_length - 1)
    }
}

/// The block being produced right now.
///
/// `index` counts blocks within the current segment, not within the lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub pass: u32,
    pub lane: u32,
    pub slice: u32,
    pub index: u32,
}

impl Position {
    pub(crate) fn new(pass: u32, lane: u32, slice: u32) -> Self {
        debug_assert!(slice < SYNC_POINTS);
        Self {
            pass,
            lane,
            slice,
            index: 0,
        }
    }

    pub(crate) fn at(self, index: u32) -> Self {
        Self { index, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(mem_kib: u32, lanes: u32) -> Instance {
        Instance::new(mem_kib, 1, lanes, 1, Algorithm::Argon2id, Version::V0x13)
    }

    #[test]
    fn memory_is_rounded_down_to_whole_segments() {
        let layout = instance(33, 2);
        assert_eq!(layout.segment_length, 4);
        assert_eq!(layout.lane_length, 16);
        assert_eq!(layout.memory_blocks, 32);
    }

    #[test]
    fn memory_is_raised_to_two_blocks_per_slice() {
        let layout = instance(1, 3);
        assert_eq!(layout.segment_length, 2);
        assert_eq!(layout.memory_blocks, 24);
    }

    #[test]
    fn accounting_holds_across_shapes() {
        for lanes in 1..=9 {
            for mem_kib in (8 * lanes)..(8 * lanes + 70) {
                let layout = instance(mem_kib, lanes);
                assert_eq!(layout.memory_blocks, layout.lanes * layout.lane_length);
                assert_eq!(layout.lane_length, 4 * layout.segment_length);
                assert_eq!(layout.memory_blocks % (4 * lanes), 0);
                assert!(layout.memory_blocks <= mem_kib);
            }
        }
    }

    #[test]
    fn threads_are_clamped_to_lanes() {
        let layout = Instance::new(64, 1, 2, 16, Algorithm::Argon2d, Version::V0x13);
        assert_eq!(layout.threads, 2);
    }

    #[test]
    fn indices_are_lane_major() {
        let layout = instance(32, 4);
        assert_eq!(layout.index(0, 0), 0);
        assert_eq!(layout.index(2, 3), 2 * 8 + 3);
        assert_eq!(layout.last_block(3), 31);
    }
}
