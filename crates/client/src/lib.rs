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

//! # SIGAID Client
//!
//! The agent-side SDK: an HTTP client for the Authority wire protocol, a
//! session type that acquires and auto-renews the exclusive lease, appends
//! to the state chain, and produces proof bundles. The client never
//! silently degrades security: lost leases and forks are surfaced, not
//! papered over.

/// Capped exponential backoff with full jitter.
pub mod backoff;
/// Environment-driven client configuration.
pub mod config;
/// The raw HTTP client for the Authority wire protocol.
pub mod http;
/// The agent session: lease lifecycle, appends, and proving.
pub mod session;

pub use config::ClientConfig;
pub use http::AuthorityClient;
pub use session::{AgentSession, LeaseHandle};
