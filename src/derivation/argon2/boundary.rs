//! Initialization and finalization for Argon2.
//!
//! This module handles the boundary operations of the Argon2 algorithm:
//! computing the initial hash H0 from all inputs, seeding the first two
//! blocks of every lane from it, and deriving the final tag from the
//! filled memory.

use tracing::trace;
use zeroize::{Zeroize, Zeroizing};

use super::block::Block;
use super::consts::{BLOCK_SIZE, PREHASH_DIGEST_LENGTH, PREHASH_SEED_LENGTH};
use super::core::{Context, Error};
use super::instance::Instance;
use super::params::Algorithm;
use crate::hash::{blake2b_long, blake2b512};

/// Computes the initial hash H0 from all Argon2 inputs.
///
/// H0 is a 64-byte BLAKE2b hash of the concatenation of all parameters
/// and inputs, each variable-length input prefixed with its length:
/// ```text
/// H0 = BLAKE2b(p || T || m || t || v || y || |P| || P || |S| || S || |K| || K || |X| || X)
/// ```
///
/// The memory cost is hashed as requested, before rounding. The digest is
/// returned in the first 64 bytes of a 72-byte seed whose tail is filled in
/// by [`fill_first_blocks`]. Once absorbed, the password and secret are
/// wiped if the context asks for it.
pub(crate) fn initial_hash(
    context: &mut Context<'_>,
    algorithm: Algorithm,
) -> Zeroizing<[u8; PREHASH_SEED_LENGTH]> {
    let digest = Zeroizing::new(blake2b512(&[
        &context.lanes.to_le_bytes(),
        &len32(context.out.len()),
        &context.mem_kib.to_le_bytes(),
        &context.time.to_le_bytes(),
        &context.version.as_u32().to_le_bytes(),
        &algorithm.as_u32().to_le_bytes(),
        &len32(context.password.len()),
        &context.password[..],
        &len32(context.salt.len()),
        context.salt,
        &len32(context.secret.len()),
        &context.secret[..],
        &len32(context.associated_data.len()),
        context.associated_data,
    ]));

    clear_inputs(context);

    let mut seed = Zeroizing::new([0u8; PREHASH_SEED_LENGTH]);
    seed[..PREHASH_DIGEST_LENGTH].copy_from_slice(&digest[..]);

    if context.flags.print_internals {
        trace!(
            target: "argon2::internals",
            digest = %hex::encode(&seed[..PREHASH_DIGEST_LENGTH]),
            "pre-hashing digest"
        );
    }

    seed
}

/// Wipes the password and secret buffers the context asks to clear.
pub(crate) fn clear_inputs(context: &mut Context<'_>) {
    if context.flags.clear_password {
        context.password.zeroize();
    }
    if context.flags.clear_secret {
        context.secret.zeroize();
    }
}

/// Seeds blocks 0 and 1 of every lane: `B[l][j] = H'^1024(H0 || j || l)`.
pub(crate) fn fill_first_blocks(
    seed: &mut [u8; PREHASH_SEED_LENGTH],
    instance: &Instance,
    blocks: &mut [Block],
) -> Result<(), Error> {
    let mut bytes = Zeroizing::new([0u8; BLOCK_SIZE]);

    for lane in 0..instance.lanes {
        seed[PREHASH_DIGEST_LENGTH + 4..].copy_from_slice(&lane.to_le_bytes());
        for j in 0..2u32 {
            seed[PREHASH_DIGEST_LENGTH..PREHASH_DIGEST_LENGTH + 4]
                .copy_from_slice(&j.to_le_bytes());
            blake2b_long(&mut bytes[..], &[&seed[..]])?;
            blocks[instance.index(lane, j)] = Block::from_bytes(&bytes);
        }
    }

    Ok(())
}

/// Writes `H'^T(B[0][q-1] xor ... xor B[p-1][q-1])` into `out`, `T` being
/// `out.len()`.
pub(crate) fn finalize(instance: &Instance, blocks: &[Block], out: &mut [u8]) -> Result<(), Error> {
    let mut final_block = Block::ZERO;
    final_block.copy_from(&blocks[instance.last_block(0)]);
    for lane in 1..instance.lanes {
        final_block.in_place_xor(&blocks[instance.last_block(lane)]);
    }

    let bytes = Zeroizing::new(final_block.to_bytes());
    final_block.zeroize();

    blake2b_long(out, &[&bytes[..]])?;
    Ok(())
}

fn len32(len: usize) -> [u8; 4] {
    // Lengths are validated to fit in 32 bits before hashing starts.
    (len as u32).to_le_bytes()
}
