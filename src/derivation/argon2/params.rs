//! Parameter definitions for Argon2.
//!
//! This module defines the addressing policies, the algorithm versions,
//! the behavioural flags, and the cost parameters accepted by the
//! high-level hashing functions.

/// Argon2 addressing policy.
///
/// The discriminant is the type identifier hashed into H0 and into the
/// address generator input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Data-dependent addressing: reference blocks are chosen from the
    /// contents of the previous block. Fastest, but leaks memory access
    /// patterns to side channels.
    Argon2d = 0,
    /// Data-independent addressing: reference blocks are chosen from a
    /// counter-keyed pseudo-random stream.
    Argon2i = 1,
    /// Hybrid: data-independent for the first half of the first pass,
    /// data-dependent afterwards.
    #[default]
    Argon2id = 2,
}

impl Algorithm {
    /// Whether the given (pass, slice) draws its addresses from the
    /// data-independent stream.
    pub(crate) fn data_independent(self, pass: u32, slice: u32) -> bool {
        match self {
            Algorithm::Argon2d => false,
            Algorithm::Argon2i => true,
            Algorithm::Argon2id => pass == 0 && slice < 2,
        }
    }

    pub(crate) fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Argon2 algorithm version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    /// Version 1.0: every pass overwrites the blocks it produces.
    V0x10 = 0x10,
    /// Version 1.3 (RFC 9106): passes after the first XOR their result
    /// onto the block produced by the previous pass.
    #[default]
    V0x13 = 0x13,
}

impl Version {
    pub(crate) fn as_u32(self) -> u32 {
        self as u32
    }

    /// Whether pass `pass` accumulates onto existing block contents.
    pub(crate) fn xors_previous_pass(self, pass: u32) -> bool {
        self == Version::V0x13 && pass > 0
    }
}

/// Behavioural switches of a hashing run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flags {
    /// Wipe the caller's password buffer once it has been absorbed.
    pub clear_password: bool,
    /// Wipe the caller's secret buffer once it has been absorbed.
    pub clear_secret: bool,
    /// Wipe the block arena before it is released.
    pub clear_memory: bool,
    /// Emit the pre-hash digest and every block after every pass as
    /// `trace` events on the `argon2::internals` target.
    pub print_internals: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            clear_password: false,
            clear_secret: false,
            clear_memory: true,
            print_internals: false,
        }
    }
}

/// Cost parameters and optional inputs for [`hash`](super::core::hash) and
/// its per-algorithm shorthands.
///
/// RFC 9106 suggests, for memory-constrained settings, Argon2id with
/// `time = 3` and `mem_kib = 65536`; more memory is always preferable to
/// more passes. `lanes` should match the parallelism the verifier can
/// afford, since the tag depends on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    /// Memory cost in KiB; at least 8 per lane.
    pub mem_kib: u32,
    /// Passes over the whole arena.
    pub time: u32,
    /// Number of lanes. Part of the hashed input.
    pub lanes: u32,
    /// Worker threads; values above `lanes` are clamped. Never affects
    /// the output.
    pub threads: u32,
    /// Length of the output tag in bytes (minimum 4).
    pub tag_len: usize,
    /// Algorithm version.
    pub version: Version,
    /// Key `K`, hashed into H0.
    pub secret: Option<Vec<u8>>,
    /// Associated data `X`, hashed into H0.
    pub associated_data: Option<Vec<u8>>,
}

impl Default for Params {
    /// 64 MiB, 3 passes, one lane on one thread, 32-byte tag, version 1.3.
    fn default() -> Self {
        Self {
            mem_kib: 64 * 1024,
            time: 3,
            lanes: 1,
            threads: 1,
            tag_len: 32,
            version: Version::default(),
            secret: None,
            associated_data: None,
        }
    }
}
