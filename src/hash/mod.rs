//! Hash algorithms exposed by the crate.
//!
//! Currently includes BLAKE2b, backed by the `blake2` crate.

pub mod blake2b;

/// Re-export of the BLAKE2b helpers used by Argon2.
pub use blake2b::{DigestLengthError, blake2b_long, blake2b512};
