//! Core error types for SIGAID.

use crate::chain::StateHead;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors from cryptographic primitives.
///
/// Verification and decryption failures are uniformly opaque: callers never
/// learn why a signature failed or why a tag did not match.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// A signature, MAC, or AEAD check failed. Deliberately reason-free.
    #[error("cryptographic verification failed")]
    Failure,
    /// The system CSPRNG was unavailable or returned an error.
    #[error("system randomness unavailable")]
    Csprng,
    /// Provided key material was structurally invalid.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
    /// An input violated a structural requirement (length, encoding).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::Failure => "CRYPTO_FAILURE",
            Self::Csprng => "CRYPTO_CSPRNG_UNAVAILABLE",
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidInput(_) => "CRYPTO_INVALID_INPUT",
        }
    }
}

/// Errors from identity handling and key storage.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// A printable agent identifier failed to parse or validate.
    #[error("invalid agent id: {0}")]
    InvalidAgentId(String),
    /// The keyfile decrypted structurally but the password was wrong, or
    /// the password was wrong in a way indistinguishable from corruption.
    #[error("wrong keyfile password")]
    WrongPassword,
    /// The keyfile container was malformed or tampered with.
    #[error("corrupt keyfile: {0}")]
    CorruptKeyfile(String),
    /// An underlying filesystem operation failed.
    #[error("keyfile I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A cryptographic primitive failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl ErrorCode for IdentityError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidAgentId(_) => "IDENTITY_INVALID_AGENT_ID",
            Self::WrongPassword => "IDENTITY_WRONG_PASSWORD",
            Self::CorruptKeyfile(_) => "IDENTITY_CORRUPT_KEYFILE",
            Self::Io(_) => "IDENTITY_IO_ERROR",
            Self::Crypto(e) => e.code(),
        }
    }
}

/// Errors from the lease protocol, on either side.
#[derive(Error, Debug)]
pub enum LeaseError {
    /// Another session holds the lease. Surfaced once, never retried
    /// implicitly.
    #[error("lease held by session {holder_session_id} until {expires_at}")]
    HeldByAnother {
        /// The session currently holding the lease.
        holder_session_id: String,
        /// RFC 3339 expiry of the holding lease.
        expires_at: String,
    },
    /// The operation requires a live lease and none matches.
    #[error("no active lease")]
    NoActiveLease,
    /// The token's session does not match the lease record.
    #[error("lease session mismatch")]
    SessionMismatch,
    /// The lease or token has expired.
    #[error("lease expired")]
    Expired,
    /// The acquire-request signature failed verification.
    #[error("invalid lease request signature")]
    InvalidSignature,
    /// The request timestamp was outside the tolerated clock-skew window.
    #[error("request timestamp outside clock-skew window")]
    ClockSkew,
    /// The request nonce was already observed within the skew window.
    #[error("request nonce replayed")]
    NonceReplayed,
    /// The agent is not registered with the Authority.
    #[error("agent not registered")]
    NotRegistered,
    /// The request was structurally invalid (bad TTL, bad nonce length).
    #[error("invalid lease request: {0}")]
    InvalidRequest(String),
}

impl ErrorCode for LeaseError {
    fn code(&self) -> &'static str {
        match self {
            Self::HeldByAnother { .. } => "LEASE_HELD",
            Self::NoActiveLease => "LEASE_NONE_ACTIVE",
            Self::SessionMismatch => "LEASE_SESSION_MISMATCH",
            Self::Expired => "LEASE_EXPIRED",
            Self::InvalidSignature => "LEASE_INVALID_SIGNATURE",
            Self::ClockSkew => "LEASE_CLOCK_SKEW",
            Self::NonceReplayed => "LEASE_NONCE_REPLAYED",
            Self::NotRegistered => "LEASE_AGENT_NOT_REGISTERED",
            Self::InvalidRequest(_) => "LEASE_INVALID_REQUEST",
        }
    }
}

/// Errors from state-chain appends and verification.
#[derive(Error, Debug)]
pub enum ChainError {
    /// A proposed entry conflicts with the committed chain. Fatal for the
    /// identity until manual intervention; never reconciled silently.
    #[error("state chain fork detected at head sequence {}", current_head.sequence)]
    Fork {
        /// The Authority's committed head at rejection time.
        current_head: StateHead,
    },
    /// The proposed sequence is not exactly head + 1.
    #[error("sequence mismatch: expected {expected}, got {got}")]
    SequenceMismatch {
        /// The only admissible next sequence.
        expected: u64,
        /// The sequence the client proposed.
        got: u64,
    },
    /// A head comparison failed during verification.
    #[error("state head mismatch")]
    HeadMismatch,
    /// The entry signature failed verification.
    #[error("invalid entry signature")]
    BadSignature,
    /// The entry hash does not recompute from the entry's content.
    #[error("entry hash does not recompute")]
    BadEntryHash,
    /// The entry links to a previous hash that is not the committed head.
    #[error("previous-hash link broken at sequence {sequence}")]
    BrokenLink {
        /// The sequence whose link failed.
        sequence: u64,
    },
    /// The entry was signed by a key other than the registered identity
    /// key. Mid-chain key rotation is unsupported.
    #[error("entry signed by an unregistered key")]
    PermissionDenied,
    /// The entry violated a structural bound.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),
    /// A Merkle inclusion proof failed to verify.
    #[error("inclusion proof did not verify")]
    BadInclusionProof,
}

impl ErrorCode for ChainError {
    fn code(&self) -> &'static str {
        match self {
            Self::Fork { .. } => "CHAIN_FORK",
            Self::SequenceMismatch { .. } => "CHAIN_SEQUENCE_MISMATCH",
            Self::HeadMismatch => "CHAIN_HEAD_MISMATCH",
            Self::BadSignature => "CHAIN_BAD_SIGNATURE",
            Self::BadEntryHash => "CHAIN_BAD_ENTRY_HASH",
            Self::BrokenLink { .. } => "CHAIN_BROKEN_LINK",
            Self::PermissionDenied => "CHAIN_PERMISSION_DENIED",
            Self::InvalidEntry(_) => "CHAIN_INVALID_ENTRY",
            Self::BadInclusionProof => "CHAIN_BAD_INCLUSION_PROOF",
        }
    }
}

/// Errors from proof construction and the verification plumbing.
///
/// Expected-invalid bundles do not produce errors; they produce
/// [`crate::proof::VerifyOutcome::Invalid`]. These variants cover caller
/// mistakes and infrastructure failures.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The challenge length was outside 16..=256 bytes.
    #[error("invalid challenge: {0}")]
    InvalidChallenge(String),
    /// Online verification was requested but the Authority could not be
    /// reached.
    #[error("authority unavailable: {0}")]
    AuthorityUnavailable(String),
}

impl ErrorCode for VerifyError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidChallenge(_) => "VERIFY_INVALID_CHALLENGE",
            Self::AuthorityUnavailable(_) => "VERIFY_AUTHORITY_UNAVAILABLE",
        }
    }
}

/// Errors surfaced by the client SDK.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A retryable network or server-side failure.
    #[error("transient failure: {0}")]
    Transient(String),
    /// The Authority rejected the caller's API key.
    #[error("permission denied")]
    PermissionDenied,
    /// A non-retryable protocol-level rejection.
    #[error("authority rejected request ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message.
        message: String,
    },
    /// The caller-supplied deadline elapsed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// The background renewal task lost the lease.
    #[error("lease lost")]
    LeaseLost,
    /// A lease-domain rejection.
    #[error(transparent)]
    Lease(#[from] LeaseError),
    /// A state-chain rejection.
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// An identity or key-storage failure.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// A cryptographic failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// A verification-plumbing failure.
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

impl ErrorCode for ClientError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transient(_) => "CLIENT_TRANSIENT",
            Self::PermissionDenied => "CLIENT_PERMISSION_DENIED",
            Self::Api { .. } => "CLIENT_API_ERROR",
            Self::DeadlineExceeded => "CLIENT_DEADLINE_EXCEEDED",
            Self::LeaseLost => "CLIENT_LEASE_LOST",
            Self::Lease(e) => e.code(),
            Self::Chain(e) => e.code(),
            Self::Identity(e) => e.code(),
            Self::Crypto(e) => e.code(),
            Self::Verify(e) => e.code(),
        }
    }
}
