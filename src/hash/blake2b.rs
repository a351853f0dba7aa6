//! BLAKE2b digests (RFC 7693) and the variable-length expansion `H'`.
//!
//! The compression itself is provided by the `blake2` crate. This module
//! only fixes the framing Argon2 relies on: the 64-byte digest used for
//! pre-hashing, and `H'`, which stretches a digest to any output length by
//! chaining full BLAKE2b-512 invocations and keeping half of each.

use blake2::digest::{Digest, Update, VariableOutput};
use blake2::{Blake2b512, Blake2bVar};

/// Output size of BLAKE2b-512 in bytes.
pub const BLAKE2B_OUTBYTES: usize = 64;

/// Errors produced when a requested digest length cannot be honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DigestLengthError {
    /// A zero-length digest was requested.
    #[error("digest length must be at least one byte")]
    Empty,
    /// The length prefix of `H'` is a 32-bit integer.
    #[error("digest length {0} does not fit in 32 bits")]
    TooLong(usize),
    /// BLAKE2b itself rejected the output size.
    #[error("BLAKE2b cannot produce a {0}-byte digest")]
    Unsupported(usize),
}

/// Computes BLAKE2b-512 over the concatenation of `inputs`.
pub fn blake2b512(inputs: &[&[u8]]) -> [u8; BLAKE2B_OUTBYTES] {
    let mut hasher = Blake2b512::new();
    for input in inputs {
        Digest::update(&mut hasher, input);
    }

    let mut out = [0u8; BLAKE2B_OUTBYTES];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Variable-length hash `H'` (RFC 9106 §3.3).
///
/// Fills `out` with `H'^T(inputs)` where `T = out.len()`. For `T <= 64` this
/// is a single BLAKE2b-T call over `LE32(T) || inputs`. Longer outputs are
/// built from the first 32 bytes of successive BLAKE2b-512 digests, each
/// hashing the previous one, and closed by a final digest sized to whatever
/// remains.
pub fn blake2b_long(out: &mut [u8], inputs: &[&[u8]]) -> Result<(), DigestLengthError> {
    if out.is_empty() {
        return Err(DigestLengthError::Empty);
    }

    let out_len = out.len();
    let prefix = u32::try_from(out_len)
        .map_err(|_| DigestLengthError::TooLong(out_len))?
        .to_le_bytes();

    if out_len <= BLAKE2B_OUTBYTES {
        let mut hasher =
            Blake2bVar::new(out_len).map_err(|_| DigestLengthError::Unsupported(out_len))?;
        Update::update(&mut hasher, &prefix);
        for input in inputs {
            Update::update(&mut hasher, input);
        }
        return hasher
            .finalize_variable(out)
            .map_err(|_| DigestLengthError::Unsupported(out_len));
    }

    let half = BLAKE2B_OUTBYTES / 2;

    let mut hasher = Blake2b512::new();
    Digest::update(&mut hasher, prefix);
    for input in inputs {
        Digest::update(&mut hasher, input);
    }
    let mut chain = [0u8; BLAKE2B_OUTBYTES];
    chain.copy_from_slice(&hasher.finalize());

    out[..half].copy_from_slice(&chain[..half]);
    let mut written = half;

    while out_len - written > BLAKE2B_OUTBYTES {
        chain = blake2b512(&[&chain]);
        out[written..written + half].copy_from_slice(&chain[..half]);
        written += half;
    }

    let remaining = out_len - written;
    let mut tail =
        Blake2bVar::new(remaining).map_err(|_| DigestLengthError::Unsupported(remaining))?;
    Update::update(&mut tail, &chain);
    tail.finalize_variable(&mut out[written..])
        .map_err(|_| DigestLengthError::Unsupported(remaining))
}
