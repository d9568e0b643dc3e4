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

//! # SIGAID Authority
//!
//! The trusted central process: it registers agent identities, holds the
//! single lease slot per agent, owns the append-ordered state chains, and
//! corroborates proof bundles. All keyed state lives in explicitly owned
//! concurrent maps behind per-agent locks; there are no hidden singletons,
//! and the state's lifetime is the lifetime of the [`Authority`] value.

/// Per-agent state chain storage and append validation.
pub mod chain;
/// The per-agent lease slot state machine and token minting.
pub mod lease;
/// Merkle commitments and inclusion proofs over a chain.
pub mod merkle;
/// The agent registry with reputation counters.
pub mod registry;
/// Online (Authority-corroborated) proof bundle verification.
pub mod verify;

use sigaid_crypto::token::TokenKey;
use sigaid_types::error::CryptoError;

/// Tunable limits of an Authority process.
#[derive(Debug, Clone)]
pub struct AuthorityConfig {
    /// Tolerated clock skew for acquire requests and bundle timestamps,
    /// in seconds.
    pub clock_skew_secs: u64,
    /// Upper bound on a requested lease TTL, in seconds.
    pub max_ttl_secs: u32,
    /// Upper bound on retained nonce-replay entries per sweep.
    pub nonce_cache_max: usize,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            clock_skew_secs: sigaid_types::CLOCK_SKEW_SECS,
            max_ttl_secs: 3600,
            nonce_cache_max: 100_000,
        }
    }
}

/// The Authority's owned state: registry, lease slots, and chains.
pub struct Authority {
    /// Registered identities and reputation counters.
    pub registry: registry::AgentRegistry,
    /// Per-agent lease slots.
    pub leases: lease::LeaseAuthority,
    /// Per-agent state chains.
    pub chains: chain::ChainStore,
}

impl Authority {
    /// Creates an Authority with a fresh token key.
    pub fn new(config: AuthorityConfig) -> Result<Self, CryptoError> {
        let token_key = TokenKey::generate()?;
        Ok(Self::with_token_key(config, token_key))
    }

    /// Creates an Authority around an existing long-lived token key.
    pub fn with_token_key(config: AuthorityConfig, token_key: TokenKey) -> Self {
        Self {
            registry: registry::AgentRegistry::new(),
            leases: lease::LeaseAuthority::new(config.clone(), token_key),
            chains: chain::ChainStore::new(),
        }
    }
}
