//! Block arena ownership for Argon2.
//!
//! The arena is obtained from a [`BlockAllocator`] at the start of a run and
//! held by a [`Memory`] guard that wipes and returns it on every exit path.
//! While memory is being filled, the arena is shared between lane workers
//! through [`SegmentView`]s: each view may write only the blocks of its own
//! segment and may read anything else.

use core::marker::PhantomData;
use core::ops::Range;
use core::ptr::NonNull;

use tracing::warn;
use zeroize::Zeroize;

use super::block::Block;
use super::core::Error;
use super::instance::Instance;

/// Source of block arenas.
///
/// The engine calls [`allocate`](BlockAllocator::allocate) once per run and
/// [`release`](BlockAllocator::release) exactly once with the same memory,
/// after it has been wiped if the run asked for it.
pub trait BlockAllocator {
    /// Returns `block_count` blocks, or [`Error::MemoryAllocation`].
    fn allocate(&self, block_count: usize) -> Result<Vec<Block>, Error>;

    /// Takes back memory previously handed out by `allocate`.
    fn release(&self, memory: Vec<Block>) {
        drop(memory);
    }
}

/// Allocator backed by the global heap, failing instead of aborting when
/// the arena cannot be reserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl BlockAllocator for SystemAllocator {
    fn allocate(&self, block_count: usize) -> Result<Vec<Block>, Error> {
        let mut memory = Vec::new();
        memory
            .try_reserve_exact(block_count)
            .map_err(|_| Error::MemoryAllocation)?;
        memory.resize(block_count, Block::ZERO);
        Ok(memory)
    }
}

/// Scoped owner of the block arena for one run.
pub(crate) struct Memory<'a> {
    blocks: Vec<Block>,
    allocator: &'a dyn BlockAllocator,
    clear: bool,
}

impl<'a> Memory<'a> {
    pub(crate) fn allocate(
        allocator: &'a dyn BlockAllocator,
        block_count: usize,
        clear: bool,
    ) -> Result<Self, Error> {
        let blocks = allocator.allocate(block_count).inspect_err(|_| {
            warn!(block_count, "failed to allocate Argon2 memory");
        })?;

        if blocks.len() != block_count {
            warn!(
                block_count,
                got = blocks.len(),
                "allocator returned the wrong number of blocks"
            );
            allocator.release(blocks);
            return Err(Error::MemoryAllocation);
        }

        Ok(Self {
            blocks,
            allocator,
            clear,
        })
    }

    pub(crate) fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }
}

impl Drop for Memory<'_> {
    fn drop(&mut self) {
        if self.clear {
            self.blocks.iter_mut().for_each(Zeroize::zeroize);
        }
        self.allocator.release(core::mem::take(&mut self.blocks));
    }
}

/// The arena while lanes are being filled.
///
/// Holding the exclusive borrow of the blocks, it hands out one
/// [`SegmentView`] per lane for a slice. The views borrow the arena
/// mutably, so the views of two slices can never coexist.
pub(crate) struct Arena<'a> {
    base: NonNull<Block>,
    len: usize,
    _blocks: PhantomData<&'a mut [Block]>,
}

impl<'a> Arena<'a> {
    pub(crate) fn new(blocks: &'a mut [Block]) -> Self {
        let len = blocks.len();
        Self {
            base: NonNull::from(blocks).cast::<Block>(),
            len,
            _blocks: PhantomData,
        }
    }

    /// One view per lane, each writable over that lane's segment of `slice`.
    pub(crate) fn slice_views(&mut self, instance: &Instance, slice: u32) -> Vec<SegmentView<'_>> {
        debug_assert_eq!(self.len, instance.memory_blocks as usize);
        let segment_length = instance.segment_length as usize;

        (0..instance.lanes)
            .map(|lane| {
                let start = instance.index(lane, slice * instance.segment_length);
                SegmentView {
                    base: self.base,
                    len: self.len,
                    writable: start..start + segment_length,
                    _arena: PhantomData,
                }
            })
            .collect()
    }

    /// Read access to every block; no view can be alive at this point.
    pub(crate) fn blocks(&self) -> &[Block] {
        // SAFETY: `base`/`len` come from a live `&'a mut [Block]`, and every
        // `SegmentView` borrows `self` mutably, so none exists while this
        // shared borrow does.
        unsafe { core::slice::from_raw_parts(self.base.as_ptr(), self.len) }
    }
}

/// A lane worker's window onto the arena for one (pass, slice).
///
/// Writes are confined to `writable`, which is disjoint from every other
/// view of the same slice. Reads may target any block the reference rules
/// declare complete; those are never inside another view's `writable`.
pub(crate) struct SegmentView<'s> {
    base: NonNull<Block>,
    len: usize,
    writable: Range<usize>,
    _arena: PhantomData<&'s mut [Block]>,
}

// SAFETY: the only mutation a view performs is on its own segment, and the
// views handed out for one slice have pairwise disjoint segments.
unsafe impl Send for SegmentView<'_> {}

impl SegmentView<'_> {
    #[inline]
    pub(crate) fn block(&self, index: usize) -> &Block {
        assert!(index < self.len, "block {index} outside arena of {}", self.len);
        // SAFETY: in bounds, and no view ever writes a block another view
        // reads during the same slice.
        unsafe { &*self.base.as_ptr().add(index) }
    }

    /// Writes G(prev, reference) into `cur`, XOR-ing onto the existing
    /// contents when `with_xor` is set.
    #[inline]
    pub(crate) fn fill_block(&mut self, cur: usize, prev: usize, reference: usize, with_xor: bool) {
        assert!(
            self.writable.contains(&cur),
            "block {cur} outside writable segment {:?}",
            self.writable
        );
        debug_assert!(prev != cur && reference != cur);

        let next = Block::compress(self.block(prev), self.block(reference));

        // SAFETY: `cur` lies in this view's exclusive range and the shared
        // borrows taken above have ended.
        let dst = unsafe { &mut *self.base.as_ptr().add(cur) };
        if with_xor {
            dst.in_place_xor(&next);
        } else {
            *dst = next;
        }
    }
}
