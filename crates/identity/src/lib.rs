#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo
    )
)]

//! # SIGAID Identity
//!
//! Agent keypair lifecycle: CSPRNG generation, deterministic derivation
//! from a seed, encrypted storage on disk, and the printable AgentID.

/// The agent keypair and its storage operations.
pub mod keypair;

pub use keypair::KeyPair;
