#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # SIGAID Types
//!
//! This crate is the foundational library for SIGAID, containing all core
//! data structures, canonical byte encodings, and error types.
//!
//! ## Architectural Role
//!
//! As the base crate, `sigaid-types` has minimal dependencies and is itself a
//! dependency for almost every other crate in the workspace. This structure
//! prevents circular dependencies and provides a stable, canonical definition
//! for shared types like `AgentId`, `StateEntry`, `ProofBundle`, and the
//! error enums.

/// Maximum accepted length in bytes of a verifier-supplied challenge.
pub const CHALLENGE_MAX_LEN: usize = 256;
/// Minimum accepted length in bytes of a verifier-supplied challenge.
pub const CHALLENGE_MIN_LEN: usize = 16;
/// Maximum length in UTF-8 bytes of a state entry's action summary.
pub const ACTION_SUMMARY_MAX_BYTES: usize = 256;
/// Maximum length in bytes of a custom action type label.
pub const CUSTOM_ACTION_TYPE_MAX_BYTES: usize = 32;
/// Tolerated clock skew, in seconds, for lease requests and bundle timestamps.
pub const CLOCK_SKEW_SECS: u64 = 120;
/// Length in bytes of an acquire-request nonce.
pub const NONCE_LEN: usize = 16;

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::ClientError> = std::result::Result<T, E>;

/// The printable agent identifier and its encoding rules.
pub mod agent;
/// Canonical, deterministic byte layouts for everything that is signed or hashed.
pub mod canonical;
/// The per-agent hash-linked state chain entry and head types.
pub mod chain;
/// Base64 serde adapters for fixed-size byte fields on wire structs.
pub mod encoding;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Lease records and lease-token claims.
pub mod lease;
/// Proof bundles, challenges, verification policies, and outcomes.
pub mod proof;
/// RFC 3339 timestamp helpers shared by the client and the Authority.
pub mod timestamp;
/// Request and response bodies of the Authority wire protocol.
pub mod wire;

pub use agent::AgentId;
pub use chain::{ActionType, StateEntry, StateHead};
pub use proof::{Challenge, ProofBundle, ReasonCode, VerifyOutcome, VerifyPolicy};
