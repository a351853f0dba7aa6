//! Segment filling for Argon2.
//!
//! A segment is the part of one lane that belongs to one slice. It is the
//! unit of parallel work: within a segment every block depends on the one
//! before it, so a segment is always filled sequentially by one worker.

use super::block::Block;
use super::consts::ADDRESSES_IN_BLOCK;
use super::instance::{Instance, Position};
use super::memory::SegmentView;
use super::reference::reference_block;

/// Counter-keyed pseudo-random stream for data-independent addressing.
///
/// One address block yields 128 pseudo-random words; a fresh block is
/// generated from the next counter value whenever they run out.
struct AddressStream {
    input: Block,
    addresses: Block,
}

impl AddressStream {
    fn new(instance: &Instance, position: &Position) -> Self {
        Self {
            input: Block::address_seed(
                position.pass,
                position.lane,
                position.slice,
                instance.memory_blocks,
                instance.passes,
                instance.algorithm.as_u32(),
            ),
            addresses: Block::ZERO,
        }
    }

    fn refresh(&mut self) {
        self.addresses = Block::next_addresses(&mut self.input);
    }

    /// Pseudo-random value for block `index` of the segment.
    fn at(&mut self, index: u32) -> u64 {
        let slot = index as usize % ADDRESSES_IN_BLOCK;
        if slot == 0 {
            self.refresh();
        }
        self.addresses.word(slot)
    }
}

/// Fills every block of the segment at `position` (index ignored).
///
/// For each block this:
/// 1. takes the previous block of the lane, wrapping to the lane's last
///    block for the first block of a lane
/// 2. draws a 64-bit pseudo-random value, from the address stream or from
///    the first word of the previous block
/// 3. resolves the reference block
/// 4. writes G(previous, reference), XOR-ing onto the old contents when
///    the version asks for it
///
/// Blocks 0 and 1 of every lane are seeded by the initializer, so the first
/// segment of the first pass starts at index 2.
pub(crate) fn fill_segment(instance: &Instance, position: Position, view: &mut SegmentView<'_>) {
    let data_independent = instance
        .algorithm
        .data_independent(position.pass, position.slice);
    let mut addresses = data_independent.then(|| AddressStream::new(instance, &position));

    let starting_index = if position.pass == 0 && position.slice == 0 {
        if let Some(stream) = addresses.as_mut() {
            stream.refresh();
        }
        2
    } else {
        0
    };

    let with_xor = instance.version.xors_previous_pass(position.pass);
    let lane_start = instance.index(position.lane, 0);
    let mut cur = instance.index(
        position.lane,
        position.slice * instance.segment_length + starting_index,
    );

    for index in starting_index..instance.segment_length {
        let prev = if cur == lane_start {
            cur + instance.lane_length as usize - 1
        } else {
            cur - 1
        };

        let pseudo_rand = match addresses.as_mut() {
            Some(stream) => stream.at(index),
            None => view.block(prev).word(0),
        };

        let reference = reference_block(instance, &position.at(index), pseudo_rand);
        view.fill_block(cur, prev, reference, with_xor);

        cur += 1;
    }
}
