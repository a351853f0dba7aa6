//! Compile-time configuration of the Argon2 engine.
//!
//! Sizes and limits follow RFC 9106 and the reference implementation.
//! Nothing here is tunable at runtime.

/// Memory block size in bytes.
pub const BLOCK_SIZE: usize = 1024;

/// Number of 64-bit words in a block.
pub const WORDS_IN_BLOCK: usize = BLOCK_SIZE / 8;

/// Number of pseudo-random values produced by one address block.
pub const ADDRESSES_IN_BLOCK: usize = 128;

/// Number of slices per lane (synchronisation points per pass).
pub const SYNC_POINTS: u32 = 4;

/// Length of the pre-hashing digest H0.
pub const PREHASH_DIGEST_LENGTH: usize = 64;

/// Length of H0 extended with the block and lane indices.
pub const PREHASH_SEED_LENGTH: usize = PREHASH_DIGEST_LENGTH + 8;

pub const MIN_LANES: u32 = 1;
pub const MAX_LANES: u32 = 0x00FF_FFFF;

pub const MIN_THREADS: u32 = 1;
pub const MAX_THREADS: u32 = 0x00FF_FFFF;

pub const MIN_OUTLEN: usize = 4;
pub const MAX_OUTLEN: usize = 0xFFFF_FFFF;

/// Minimum number of blocks per lane (two per slice).
pub const MIN_MEMORY_PER_LANE: u32 = 2 * SYNC_POINTS;

/// Largest addressable memory cost in KiB for this target.
pub const MAX_MEMORY: u64 = {
    let bits = usize::BITS as u64 - 10 - 1;
    let bits = if bits < 32 { bits } else { 32 };
    let max = 1u64 << bits;
    if max < 0xFFFF_FFFF { max } else { 0xFFFF_FFFF }
};

pub const MIN_TIME: u32 = 1;

pub const MAX_PWD_LENGTH: usize = 0xFFFF_FFFF;

pub const MIN_SALT_LENGTH: usize = 8;
pub const MAX_SALT_LENGTH: usize = 0xFFFF_FFFF;

pub const MAX_SECRET_LENGTH: usize = 0xFFFF_FFFF;

pub const MAX_AD_LENGTH: usize = 0xFFFF_FFFF;
