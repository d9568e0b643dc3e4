#![forbid(unsafe_code)]

//! # SIGAID Crypto
//!
//! Cryptographic primitives for SIGAID: domain-separated Ed25519 signing,
//! BLAKE3 hashing, HKDF-SHA256, XChaCha20-Poly1305 AEAD, the lease-token
//! envelope, constant-time comparison, and the encrypted keyfile container.
//!
//! Failure behavior is uniform by design: verification returns a boolean
//! and decryption returns an opaque error, so callers never branch on why
//! a check failed.

/// XChaCha20-Poly1305 sealing and opening with associated data.
pub mod aead;
/// Constant-time byte comparison for all MAC and signature compare paths.
pub mod ct;
/// BLAKE3 hashing and HKDF-SHA256 derivation.
pub mod hash;
/// The encrypted keyfile container protecting identity seeds at rest.
pub mod key_store;
/// Domain-separated Ed25519 signing and verification.
pub mod sign;
/// The authenticated, encrypted lease-token envelope.
pub mod token;

pub use ct::ct_eq;
pub use sign::{sign, verify, Domain};
