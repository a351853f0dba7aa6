//! Password hashing and key derivation.
//!
//! Currently includes the Argon2 family (Argon2d, Argon2i, Argon2id).

pub mod argon2;

/// Re-export of the Argon2 entry points and their parameters.
pub use argon2::{Algorithm, Error, Params, Version, argon2d, argon2i, argon2id, hash};
