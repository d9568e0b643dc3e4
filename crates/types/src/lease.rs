//! Lease records and lease-token claims.
//!
//! A lease is the time-bounded, single-holder right to act as an agent
//! identity. The Authority holds at most one live `Lease` per agent at any
//! instant; the holder proves possession with an encrypted token whose
//! claims mirror the lease record.

use crate::agent::AgentId;
use crate::timestamp;
use serde::{Deserialize, Serialize};

/// The record the Authority holds for a granted lease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    /// The identity the lease covers.
    pub agent_id: AgentId,
    /// Client-chosen session identifier, unique per acquire attempt.
    pub session_id: String,
    /// Grant time, seconds since the Unix epoch.
    pub acquired_at_unix: i64,
    /// Expiry time, seconds since the Unix epoch. Always after
    /// `acquired_at_unix`.
    pub expires_at_unix: i64,
    /// Renew counter. Starts at 0 and never decreases.
    pub sequence: u64,
}

impl Lease {
    /// True when the lease has passed its expiry at `now_unix`.
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        now_unix >= self.expires_at_unix
    }
}

/// The claims carried inside a lease token.
///
/// A valid token's claims precisely match the Authority's lease record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The identity the token authorizes.
    pub agent_id: AgentId,
    /// The holding session.
    pub session_id: String,
    /// Issue time, RFC 3339 UTC.
    pub iat: String,
    /// Expiry time, RFC 3339 UTC.
    pub exp: String,
    /// Unique token identifier.
    pub jti: String,
    /// Monotonic per-session renew counter.
    pub seq: u64,
}

impl TokenClaims {
    /// Expiry as seconds since the Unix epoch.
    pub fn expires_unix(&self) -> Result<i64, String> {
        timestamp::parse_rfc3339_unix(&self.exp)
    }

    /// Issue time as seconds since the Unix epoch.
    pub fn issued_unix(&self) -> Result<i64, String> {
        timestamp::parse_rfc3339_unix(&self.iat)
    }

    /// True when the token has passed its expiry at `now_unix`. A token
    /// with an unparseable expiry is treated as expired.
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        match self.expires_unix() {
            Ok(exp) => now_unix >= exp,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn test_agent() -> AgentId {
        let signing = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]);
        AgentId::from_public_key_bytes(signing.verifying_key().to_bytes()).unwrap()
    }

    #[test]
    fn claims_roundtrip_json() {
        let claims = TokenClaims {
            agent_id: test_agent(),
            session_id: "sess-1".into(),
            iat: "2026-01-01T00:00:00Z".into(),
            exp: "2026-01-01T00:05:00Z".into(),
            jti: "tok-1".into(),
            seq: 3,
        };
        let json = serde_json::to_string(&claims).unwrap();
        let back: TokenClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
        assert!(AgentId::from_str(&back.agent_id.to_string()).is_ok());
    }

    #[test]
    fn expiry_check() {
        let claims = TokenClaims {
            agent_id: test_agent(),
            session_id: "s".into(),
            iat: "1970-01-01T00:00:00Z".into(),
            exp: "1970-01-01T00:01:00Z".into(),
            jti: "j".into(),
            seq: 0,
        };
        assert!(!claims.is_expired_at(59));
        assert!(claims.is_expired_at(60));
    }
}
