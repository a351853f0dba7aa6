//! Input validation for Argon2.
//!
//! Every check runs before any memory is allocated. Checks are ordered so
//! that a context with several problems always reports the same one.

use super::consts::{
    MAX_AD_LENGTH, MAX_LANES, MAX_MEMORY, MAX_OUTLEN, MAX_PWD_LENGTH, MAX_SALT_LENGTH,
    MAX_SECRET_LENGTH, MAX_THREADS, MIN_LANES, MIN_MEMORY_PER_LANE, MIN_OUTLEN,
    MIN_SALT_LENGTH, MIN_THREADS, MIN_TIME,
};
use super::core::{Context, Error};

/// Rejects contexts the engine cannot process.
pub(crate) fn validate_inputs(context: &Context<'_>) -> Result<(), Error> {
    let out_len = context.out.len();
    if out_len < MIN_OUTLEN {
        return Err(Error::OutputTooShort);
    }
    if out_len > MAX_OUTLEN {
        return Err(Error::OutputTooLong);
    }

    check_max(context.password.len(), MAX_PWD_LENGTH, Error::PasswordTooLong)?;

    if context.salt.len() < MIN_SALT_LENGTH {
        return Err(Error::SaltTooShort);
    }
    check_max(context.salt.len(), MAX_SALT_LENGTH, Error::SaltTooLong)?;
    check_max(context.secret.len(), MAX_SECRET_LENGTH, Error::SecretTooLong)?;
    check_max(
        context.associated_data.len(),
        MAX_AD_LENGTH,
        Error::AssociatedDataTooLong,
    )?;

    let mem_kib = u64::from(context.mem_kib);
    if mem_kib < u64::from(MIN_MEMORY_PER_LANE)
        || mem_kib < u64::from(MIN_MEMORY_PER_LANE) * u64::from(context.lanes)
    {
        return Err(Error::MemoryTooLittle);
    }
    if mem_kib > MAX_MEMORY {
        return Err(Error::MemoryTooMuch);
    }

    if context.time < MIN_TIME {
        return Err(Error::TimeTooSmall);
    }

    if context.lanes < MIN_LANES {
        return Err(Error::LanesTooFew);
    }
    if context.lanes > MAX_LANES {
        return Err(Error::LanesTooMany);
    }

    if context.threads < MIN_THREADS {
        return Err(Error::ThreadsTooFew);
    }
    if context.threads > MAX_THREADS {
        return Err(Error::ThreadsTooMany);
    }

    Ok(())
}

#[inline]
fn check_max(len: usize, max: usize, err: Error) -> Result<(), Error> {
    if len > max { Err(err) } else { Ok(()) }
}
