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

//! # SIGAID Proof
//!
//! Proof bundles: construction on the agent side, verification on the
//! service side. Online verification (with Authority corroboration) lives
//! with the Authority; this crate provides the pure checks shared by both
//! modes, the fully-offline verifier, and offline state-chain
//! verification.

/// Offline verification of a run of state-chain entries.
pub mod chain;
/// Merkle inclusion-proof verification.
pub mod merkle;
/// Proof bundle construction.
pub mod prover;
/// The shared bundle checks and the offline verifier.
pub mod verifier;

pub use prover::build_bundle;
pub use verifier::{bundle_checks, verify_offline};
