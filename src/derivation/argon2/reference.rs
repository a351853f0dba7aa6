//! Reference block position computation for Argon2.
//!
//! When filling a block at position (lane, index), Argon2 needs to select
//! a reference block to mix with the previous block. The selection uses a
//! 64-bit pseudo-random value: the high half picks the lane, the low half
//! picks a block inside the area of that lane known to be complete.

use super::consts::SYNC_POINTS;
use super::instance::{Instance, Position};

/// Computes the offset of the reference block inside its lane
/// (RFC 9106 §3.4.1.3).
///
/// `same_lane` states whether the reference lane is the lane being filled.
/// The eligible area is:
/// - pass 0, slice 0: every earlier block of this lane but the previous one
/// - pass 0, later slices: the finished slices of the reference lane, plus
///   the finished part of the current segment when `same_lane`
/// - later passes: the whole lane except the segment in progress, which
///   starts right after it and wraps around
///
/// A cross-lane reference drops the last finished block when the current
/// block is the first of its segment.
///
/// The mapping from `pseudo_rand` is quadratic, biasing selection towards
/// recently written blocks.
pub(crate) fn index_alpha(
    instance: &Instance,
    position: &Position,
    pseudo_rand: u32,
    same_lane: bool,
) -> u32 {
    let segment_length = instance.segment_length;
    let lane_length = instance.lane_length;
    let first_in_segment = position.index == 0;

    let reference_area_size = if position.pass == 0 {
        if position.slice == 0 {
            position.index - 1
        } else if same_lane {
            position.slice * segment_length + position.index - 1
        } else if first_in_segment {
            position.slice * segment_length - 1
        } else {
            position.slice * segment_length
        }
    } else if same_lane {
        lane_length - segment_length + position.index - 1
    } else if first_in_segment {
        lane_length - segment_length - 1
    } else {
        lane_length - segment_length
    };
    debug_assert!(reference_area_size > 0, "empty reference area at {position:?}");

    let area = reference_area_size as u64;
    let x = (pseudo_rand as u64 * pseudo_rand as u64) >> 32;
    let relative_position = area - 1 - ((area * x) >> 32);

    let start_position = if position.pass == 0 || position.slice == SYNC_POINTS - 1 {
        0
    } else {
        (position.slice + 1) * segment_length
    };

    ((start_position as u64 + relative_position) % lane_length as u64) as u32
}

/// Resolves the absolute arena index of the reference block.
///
/// The lane comes from the high 32 bits of `pseudo_rand`, except during
/// the first slice of the first pass, when other lanes hold nothing yet.
pub(crate) fn reference_block(instance: &Instance, position: &Position, pseudo_rand: u64) -> usize {
    let ref_lane = if position.pass == 0 && position.slice == 0 {
        position.lane
    } else {
        ((pseudo_rand >> 32) % instance.lanes as u64) as u32
    };

    let offset = index_alpha(
        instance,
        position,
        pseudo_rand as u32,
        ref_lane == position.lane,
    );

    instance.index(ref_lane, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::argon2::params::{Algorithm, Version};

    fn instance(mem_kib: u32, passes: u32, lanes: u32) -> Instance {
        Instance::new(mem_kib, passes, lanes, lanes, Algorithm::Argon2d, Version::V0x13)
    }

    fn position(pass: u32, lane: u32, slice: u32, index: u32) -> Position {
        Position::new(pass, lane, slice).at(index)
    }

    #[test]
    fn zero_rand_picks_most_recent_eligible_block() {
        let inst = instance(64, 1, 1); // segment 16, lane 64
        // pass 0, slice 0, index 5: area 4 -> offsets 0..=3
        assert_eq!(index_alpha(&inst, &position(0, 0, 0, 5), 0, true), 3);
        // pass 0, slice 2, index 3, same lane: area 2*16+3-1 = 34
        assert_eq!(index_alpha(&inst, &position(0, 0, 2, 3), 0, true), 33);
    }

    #[test]
    fn max_rand_picks_oldest_eligible_block() {
        let inst = instance(64, 2, 1);
        assert_eq!(index_alpha(&inst, &position(0, 0, 0, 5), u32::MAX, true), 0);
        // pass 1, slice 1: area starts right after the current segment
        assert_eq!(
            index_alpha(&inst, &position(1, 0, 1, 4), u32::MAX, true),
            2 * 16
        );
        // pass 1, slice 3: the area starts at the lane origin
        assert_eq!(index_alpha(&inst, &position(1, 0, 3, 4), u32::MAX, true), 0);
    }

    #[test]
    fn later_passes_wrap_around_the_lane() {
        let inst = instance(64, 2, 1);
        // pass 1, slice 1, index 4, same lane: area 64-16+4-1 = 51 starting
        // at 32, so the most recent block is (32 + 50) % 64 = 18.
        assert_eq!(index_alpha(&inst, &position(1, 0, 1, 4), 0, true), 18);
    }

    #[test]
    fn cross_lane_first_block_skips_last_finished_block() {
        let inst = instance(64, 1, 2); // segment 8, lane 32
        assert_eq!(index_alpha(&inst, &position(0, 0, 1, 0), 0, false), 6);
        assert_eq!(index_alpha(&inst, &position(0, 0, 1, 1), 0, false), 7);
    }

    #[test]
    fn first_slice_stays_in_own_lane() {
        let inst = instance(64, 1, 4);
        let pos = position(0, 2, 0, 3);
        let idx = reference_block(&inst, &pos, 0xFFFF_FFFF_0000_0000);
        assert_eq!(idx / inst.lane_length as usize, 2);
    }

    #[test]
    fn lane_comes_from_high_bits() {
        let inst = instance(64, 1, 4);
        let pos = position(0, 0, 2, 3);
        let idx = reference_block(&inst, &pos, (7u64 << 32) | 12345);
        assert_eq!(idx / inst.lane_length as usize, 3);
    }
}

#[cfg(all(test, not(miri)))]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::derivation::argon2::params::{Algorithm, Version};

    /// Whether block `offset` of `ref_lane` is complete and outside any
    /// segment being written while `position` is produced.
    fn visible(inst: &Instance, position: &Position, ref_lane: u32, offset: u32) -> bool {
        let seg = inst.segment_length;
        let segment_start = position.slice * seg;
        let cur = segment_start + position.index;

        if ref_lane == position.lane {
            if position.pass == 0 {
                // strictly older than the previous block
                offset + 1 < cur
            } else {
                // neither the previous block nor the rest of this segment
                !(cur.saturating_sub(1)..segment_start + seg).contains(&offset)
                    && !(cur == 0 && offset == inst.lane_length - 1)
            }
        } else if position.pass == 0 {
            offset < segment_start
        } else {
            !(segment_start..segment_start + seg).contains(&offset)
        }
    }

    fn arb_case() -> impl Strategy<Value = (Instance, Position, u64)> {
        (1u32..=4, 3u32..=40, 1u32..=3)
            .prop_flat_map(|(lanes, seg, passes)| {
                let inst = Instance::new(
                    seg * 4 * lanes,
                    passes,
                    lanes,
                    1,
                    Algorithm::Argon2d,
                    Version::V0x13,
                );
                (Just(inst), 0..passes, 0..lanes, 0u32..4)
            })
            .prop_flat_map(|(inst, pass, lane, slice)| {
                let first = if pass == 0 && slice == 0 { 2 } else { 0 };
                let seg = inst.segment_length;
                (Just(inst), Just(Position::new(pass, lane, slice)), first..seg, any::<u64>())
            })
            .prop_map(|(inst, pos, index, rand)| (inst, pos.at(index), rand))
    }

    proptest! {
        #[test]
        fn reference_is_always_visible((inst, pos, rand) in arb_case()) {
            let idx = reference_block(&inst, &pos, rand);
            prop_assert!(idx < inst.memory_blocks as usize);

            let ref_lane = (idx / inst.lane_length as usize) as u32;
            let offset = (idx % inst.lane_length as usize) as u32;
            prop_assert!(
                visible(&inst, &pos, ref_lane, offset),
                "lane {} offset {} not visible from {:?}", ref_lane, offset, pos
            );
        }

        #[test]
        fn index_alpha_stays_inside_the_lane((inst, pos, rand) in arb_case(), same_lane in any::<bool>()) {
            let same_lane = same_lane || (pos.pass == 0 && pos.slice == 0);
            prop_assert!(index_alpha(&inst, &pos, rand as u32, same_lane) < inst.lane_length);
        }
    }
}
