//! Argon2 memory-hard hashing core (RFC 9106).
//!
//! Argon2 fills a large matrix of 1024-byte blocks, each block mixing its
//! predecessor with a pseudo-randomly chosen earlier block, and hashes the
//! result down to a tag. The cost of the matrix is what makes the function
//! memory-hard.
//!
//! # Algorithm Overview
//!
//! 1. **Pre-hashing**: every parameter and input is absorbed into a 64-byte
//!    BLAKE2b digest H0.
//! 2. **Seeding**: blocks 0 and 1 of each lane are expanded from H0, the
//!    block index and the lane index with H'.
//! 3. **Memory filling**: Fill the remaining blocks, pass after pass, using
//!    the compression function G. The lanes of one slice are filled in
//!    parallel; slices are separated by a barrier.
//! 4. **Finalization**: the last blocks of all lanes are XOR-ed into one,
//!    which H' stretches to the requested tag length.
//!
//! # Addressing Modes
//!
//! - **Argon2d**: block addresses depend on previously computed block
//!   contents.
//! - **Argon2i**: block addresses come from a counter-keyed stream and never
//!   depend on secret data.
//! - **Argon2id**: data-independent for the first half of the first pass,
//!   data-dependent afterwards.
//!
//! # Example
//!
//! ```rust
//! use cryptal_argon2::derivation::argon2::{Algorithm, Context, argon2_core};
//!
//! let mut tag = [0u8; 32];
//! let mut password = *b"password";
//! let mut context = Context::new(&mut tag, &mut password, b"somesalt");
//! context.mem_kib = 256;
//! context.time = 2;
//!
//! argon2_core(&mut context, Algorithm::Argon2i).unwrap();
//! ```

pub(crate) mod block;
pub(crate) mod boundary;
pub mod consts;
pub mod core;
pub(crate) mod instance;
pub(crate) mod memory;
pub(crate) mod params;
pub(crate) mod reference;
pub(crate) mod scheduler;
pub(crate) mod segment;
pub(crate) mod validate;

pub use self::block::Block;
pub use self::core::{Context, Error, Result, argon2_core, argon2d, argon2i, argon2id, hash};
pub use self::memory::{BlockAllocator, SystemAllocator};
pub use self::params::{Algorithm, Flags, Params, Version};
