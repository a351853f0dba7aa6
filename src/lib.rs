//! Argon2 memory-hard hashing for Nebula
//!
//! This crate provides the Argon2 block-filling engine (RFC 9106) and the
//! BLAKE2b framing it is built on.
//!
//! The focus is on **clarity, predictability, and auditability**: the
//! memory layout, the reference-block selection, and the pass/slice
//! schedule are each kept in a small module of their own, and the one
//! `unsafe` boundary (sharing the block arena between lane workers) is
//! confined to the memory module.
//!
//! # Module overview
//!
//! - `hash`
//!   BLAKE2b-512 and the variable-length expansion `H'` used by Argon2 for
//!   pre-hashing, lane seeding, and tag derivation.
//!
//! - `derivation`
//!   The Argon2 core: block operations, the address stream, reference
//!   selection, segment filling, the parallel scheduler, and the
//!   `argon2_core` entry point with its input validation.
//!
//! # Design goals
//!
//! - Output independent of the number of worker threads
//! - Inputs validated before any memory is allocated
//! - Memory and, on request, password and secret wiped on every exit path
//! - Minimal and explicit APIs

pub mod derivation;
pub mod hash;
