use tracing::debug;
use zeroize::Zeroizing;

use super::boundary::{clear_inputs, fill_first_blocks, finalize, initial_hash};
use super::instance::Instance;
use super::memory::{BlockAllocator, Memory, SystemAllocator};
use super::params::{Algorithm, Flags, Params, Version};
use super::scheduler::fill_memory_blocks;
use super::validate::validate_inputs;
use crate::hash::DigestLengthError;

/// Errors that can occur during an Argon2 computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Output buffer is shorter than 4 bytes.
    #[error("output is too short")]
    OutputTooShort,
    /// Output buffer is longer than 2^32 - 1 bytes.
    #[error("output is too long")]
    OutputTooLong,
    /// Password is longer than 2^32 - 1 bytes.
    #[error("password is too long")]
    PasswordTooLong,
    /// Salt is shorter than 8 bytes.
    #[error("salt is too short")]
    SaltTooShort,
    /// Salt is longer than 2^32 - 1 bytes.
    #[error("salt is too long")]
    SaltTooLong,
    /// Secret is longer than 2^32 - 1 bytes.
    #[error("secret is too long")]
    SecretTooLong,
    /// Associated data is longer than 2^32 - 1 bytes.
    #[error("associated data is too long")]
    AssociatedDataTooLong,
    /// Time cost is below one pass.
    #[error("time cost is too small")]
    TimeTooSmall,
    /// Memory cost is below 8 KiB per lane.
    #[error("memory cost is too small")]
    MemoryTooLittle,
    /// Memory cost exceeds what this target can address.
    #[error("memory cost is too large")]
    MemoryTooMuch,
    /// No lanes were requested.
    #[error("too few lanes")]
    LanesTooFew,
    /// More than 2^24 - 1 lanes were requested.
    #[error("too many lanes")]
    LanesTooMany,
    /// No worker threads were requested.
    #[error("too few threads")]
    ThreadsTooFew,
    /// More than 2^24 - 1 worker threads were requested.
    #[error("too many threads")]
    ThreadsTooMany,
    /// The block arena could not be allocated.
    #[error("memory allocation failed")]
    MemoryAllocation,
    /// The lane worker pool could not be started.
    #[error("failed to start lane workers: {0}")]
    ThreadPool(String),
}

impl From<DigestLengthError> for Error {
    fn from(err: DigestLengthError) -> Self {
        match err {
            DigestLengthError::Empty => Error::OutputTooShort,
            DigestLengthError::TooLong(_) | DigestLengthError::Unsupported(_) => {
                Error::OutputTooLong
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Everything one hashing run reads and writes.
///
/// The password and secret are borrowed mutably so they can be wiped in
/// place when [`Flags`] ask for it. The tag length is the length of `out`.
pub struct Context<'a> {
    /// Receives the tag on success; untouched on failure.
    pub out: &'a mut [u8],
    /// Password `P`; wiped after pre-hashing if [`Flags::clear_password`].
    pub password: &'a mut [u8],
    /// Salt `S`, at least 8 bytes.
    pub salt: &'a [u8],
    /// Key `K`; wiped after pre-hashing if [`Flags::clear_secret`].
    pub secret: &'a mut [u8],
    /// Associated data `X`.
    pub associated_data: &'a [u8],
    /// Memory cost in KiB.
    pub mem_kib: u32,
    /// Number of passes.
    pub time: u32,
    /// Number of lanes.
    pub lanes: u32,
    /// Worker threads, clamped to `lanes`.
    pub threads: u32,
    /// Algorithm version, hashed into H0.
    pub version: Version,
    /// Wiping and diagnostics switches.
    pub flags: Flags,
    /// Custom arena source; the global heap when `None`.
    pub allocator: Option<&'a dyn BlockAllocator>,
}

impl<'a> Context<'a> {
    /// A context with no secret or associated data and the cost parameters
    /// of [`Params::default`].
    pub fn new(out: &'a mut [u8], password: &'a mut [u8], salt: &'a [u8]) -> Self {
        let params = Params::default();
        Self {
            out,
            password,
            salt,
            secret: &mut [],
            associated_data: &[],
            mem_kib: params.mem_kib,
            time: params.time,
            lanes: params.lanes,
            threads: params.threads,
            version: params.version,
            flags: Flags::default(),
            allocator: None,
        }
    }
}

/// Runs one complete Argon2 computation over `context`.
///
/// Inputs are validated before anything is allocated. On success the tag
/// fills `context.out`; on failure `context.out` is left untouched. The
/// block arena is wiped (if [`Flags::clear_memory`]) and released on every
/// path, and the password/secret are wiped exactly once when requested,
/// including when validation fails.
pub fn argon2_core(context: &mut Context<'_>, algorithm: Algorithm) -> Result<()> {
    if let Err(err) = validate_inputs(context) {
        debug!(%err, "rejected Argon2 parameters");
        clear_inputs(context);
        return Err(err);
    }

    let instance = Instance::new(
        context.mem_kib,
        context.time,
        context.lanes,
        context.threads,
        algorithm,
        context.version,
    )
    .with_print_internals(context.flags.print_internals);

    debug!(
        ?algorithm,
        version = ?instance.version,
        passes = instance.passes,
        lanes = instance.lanes,
        threads = instance.threads,
        memory_blocks = instance.memory_blocks,
        segment_length = instance.segment_length,
        "starting Argon2 run"
    );

    let mut seed = initial_hash(context, algorithm);

    let system = SystemAllocator;
    let allocator: &dyn BlockAllocator = match context.allocator {
        Some(allocator) => allocator,
        None => &system,
    };
    let mut memory = Memory::allocate(
        allocator,
        instance.memory_blocks as usize,
        context.flags.clear_memory,
    )?;

    fill_first_blocks(&mut seed, &instance, memory.blocks_mut())?;
    fill_memory_blocks(&instance, memory.blocks_mut())?;
    finalize(&instance, memory.blocks(), context.out)?;

    debug!(tag_len = context.out.len(), "Argon2 run complete");
    Ok(())
}

/// Computes an Argon2 hash of the given password.
///
/// # Arguments
///
/// * `algorithm` - Addressing policy (Argon2d, Argon2i or Argon2id)
/// * `password` - The password to hash
/// * `salt` - A random salt (minimum 8 bytes, recommended 16+ bytes)
/// * `params` - Argon2 parameters (memory, time, parallelism, tag length)
///
/// # Returns
///
/// The derived key (tag) as a byte vector, or an error if parameters are invalid.
///
/// # Example
///
/// ```rust
/// use cryptal_argon2::derivation::{Algorithm, Params, hash};
///
/// let params = Params {
///     mem_kib: 64,
///     time: 1,
///     ..Params::default()
/// };
///
/// let tag = hash(Algorithm::Argon2id, b"my_password", b"random_salt_16b!", &params).unwrap();
/// assert_eq!(tag.len(), 32);
/// ```
pub fn hash(
    algorithm: Algorithm,
    password: &[u8],
    salt: &[u8],
    params: &Params,
) -> Result<Vec<u8>> {
    let mut out = vec![0u8; params.tag_len];
    let mut password = Zeroizing::new(password.to_vec());
    let mut secret = Zeroizing::new(params.secret.clone().unwrap_or_default());

    let mut context = Context {
        out: &mut out,
        password: password.as_mut_slice(),
        salt,
        secret: secret.as_mut_slice(),
        associated_data: params.associated_data.as_deref().unwrap_or_default(),
        mem_kib: params.mem_kib,
        time: params.time,
        lanes: params.lanes,
        threads: params.threads,
        version: params.version,
        flags: Flags::default(),
        allocator: None,
    };

    argon2_core(&mut context, algorithm)?;
    Ok(out)
}

/// Argon2d over `password` and `salt`.
pub fn argon2d(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>> {
    hash(Algorithm::Argon2d, password, salt, params)
}

/// Argon2i over `password` and `salt`.
pub fn argon2i(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>> {
    hash(Algorithm::Argon2i, password, salt, params)
}

/// Argon2id over `password` and `salt`.
pub fn argon2id(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>> {
    hash(Algorithm::Argon2id, password, salt, params)
}
