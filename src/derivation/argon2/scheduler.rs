//! Pass and slice scheduling for Argon2.
//!
//! Each pass walks the four slices in order. Within a slice the lanes are
//! independent and are handed to a worker pool; the slice boundary is a
//! barrier because the next slice may reference blocks any lane has just
//! written.

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{Level, debug, trace};

use super::block::Block;
use super::consts::{SYNC_POINTS, WORDS_IN_BLOCK};
use super::core::Error;
use super::instance::{Instance, Position};
use super::memory::Arena;
use super::segment::fill_segment;

/// Fills the whole arena `instance.passes` times.
///
/// Blocks 0 and 1 of every lane must already be seeded. Lanes of one slice
/// run on `min(threads, lanes)` workers; with a single worker they are
/// filled inline on the calling thread. The result never depends on the
/// number of workers.
pub(crate) fn fill_memory_blocks(instance: &Instance, blocks: &mut [Block]) -> Result<(), Error> {
    let pool = worker_pool(instance)?;
    let mut arena = Arena::new(blocks);

    for pass in 0..instance.passes {
        for slice in 0..SYNC_POINTS {
            let views = arena.slice_views(instance, slice);

            match &pool {
                Some(pool) => pool.scope(|scope| {
                    for (lane, mut view) in (0..).zip(views) {
                        scope.spawn(move |_| {
                            fill_segment(instance, Position::new(pass, lane, slice), &mut view);
                        });
                    }
                }),
                None => {
                    for (lane, mut view) in (0..).zip(views) {
                        fill_segment(instance, Position::new(pass, lane, slice), &mut view);
                    }
                }
            }
        }

        trace!(pass, "pass complete");
        if instance.print_internals {
            print_pass(pass, arena.blocks());
        }
    }

    Ok(())
}

fn worker_pool(instance: &Instance) -> Result<Option<ThreadPool>, Error> {
    let workers = instance.threads.min(instance.lanes) as usize;
    if workers <= 1 {
        return Ok(None);
    }

    debug!(workers, lanes = instance.lanes, "starting lane workers");
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("argon2-lane-{i}"))
        .build()
        .map(Some)
        .map_err(|err| Error::ThreadPool(err.to_string()))
}

/// Dumps every block after a pass, one event per block.
fn print_pass(pass: u32, blocks: &[Block]) {
    if !tracing::enabled!(target: "argon2::internals", Level::TRACE) {
        return;
    }
    for (index, block) in blocks.iter().enumerate() {
        let words = (0..WORDS_IN_BLOCK)
            .map(|i| format!("{:016x}", block.word(i)))
            .collect::<Vec<_>>()
            .join(" ");
        trace!(target: "argon2::internals", pass, block = index, %words);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::argon2::params::{Algorithm, Version};

    fn seeded(instance: &Instance) -> Vec<Block> {
        let mut blocks = vec![Block::ZERO; instance.memory_blocks as usize];
        for lane in 0..instance.lanes {
            for j in 0..2 {
                blocks[instance.index(lane, j)].init_value((lane * 2 + j + 1) as u8);
            }
        }
        blocks
    }

    #[test]
    fn worker_count_does_not_change_memory() {
        for algorithm in [Algorithm::Argon2d, Algorithm::Argon2i, Algorithm::Argon2id] {
            let serial = Instance::new(64, 2, 4, 1, algorithm, Version::V0x13);
            let mut expected = seeded(&serial);
            fill_memory_blocks(&serial, &mut expected).unwrap();

            for threads in [2, 3, 4] {
                let parallel = Instance { threads, ..serial.clone() };
                let mut blocks = seeded(&parallel);
                fill_memory_blocks(&parallel, &mut blocks).unwrap();
                assert_eq!(blocks, expected, "{algorithm:?} with {threads} threads");
            }
        }
    }

    #[test]
    fn every_block_is_written() {
        let instance = Instance::new(32, 1, 2, 2, Algorithm::Argon2id, Version::V0x13);
        let mut blocks = seeded(&instance);
        fill_memory_blocks(&instance, &mut blocks).unwrap();
        assert!(blocks.iter().all(|b| *b != Block::ZERO));
    }
}
