//! Request and response bodies of the Authority wire protocol.
//!
//! Field names and semantics here are normative for compatibility; see the
//! gateway crate for paths and methods. All timestamps are RFC 3339 UTC,
//! all hashes and signatures Base64 unless a field name says otherwise.

use crate::chain::StateEntry;
use crate::proof::ProofBundle;
use serde::{Deserialize, Serialize};

/// Body of `POST /v1/agents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAgentRequest {
    /// Printable agent identifier.
    pub agent_id: String,
    /// The 32-byte Ed25519 public key, Base64.
    pub public_key_base64: String,
    /// Optional caller-supplied metadata, stored opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Reputation counters the Authority tracks per agent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReputationCounters {
    /// Proof bundles verified successfully against this agent.
    pub proofs_verified: u64,
    /// State entries appended.
    pub entries_appended: u64,
    /// Leases acquired.
    pub leases_acquired: u64,
}

impl ReputationCounters {
    /// The scalar score verification policies compare against.
    pub fn score(&self) -> u64 {
        self.proofs_verified + self.entries_appended + self.leases_acquired
    }
}

/// Body of `GET /v1/agents/{agent_id}` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfoResponse {
    /// Printable agent identifier.
    pub agent_id: String,
    /// The registered public key, Base64.
    pub public_key_base64: String,
    /// Registration time, RFC 3339 UTC.
    pub registered_at: String,
    /// Reputation counters.
    pub reputation: ReputationCounters,
}

/// Body of `POST /v1/leases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquireLeaseRequest {
    /// Printable agent identifier.
    pub agent_id: String,
    /// Client-chosen session identifier, unique per attempt.
    pub session_id: String,
    /// Request time, RFC 3339 UTC. Must be within the skew window.
    pub timestamp: String,
    /// 16-byte request nonce, hex.
    pub nonce_hex: String,
    /// Requested lease lifetime in seconds.
    pub ttl_seconds: u32,
    /// Ed25519 signature over the canonical request bytes, hex.
    pub signature_hex: String,
}

/// Body of successful lease grant and renew responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseGrantResponse {
    /// The minted lease token.
    pub lease_token: String,
    /// Grant time, RFC 3339 UTC.
    pub acquired_at: String,
    /// Expiry time, RFC 3339 UTC.
    pub expires_at: String,
    /// Renew counter.
    pub sequence: u64,
}

/// Body of the 409 response when a lease is held by another session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseHeldResponse {
    /// Always `"lease_held"`.
    pub error: String,
    /// The session currently holding the lease.
    pub holder_session_id: String,
    /// RFC 3339 expiry of the holding lease.
    pub expires_at: String,
}

/// Body of `PUT /v1/leases/{agent_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewLeaseRequest {
    /// The holding session.
    pub session_id: String,
    /// The token from the previous grant or renew.
    pub current_token: String,
    /// Requested extension in seconds.
    pub ttl_seconds: u32,
}

/// Body of `DELETE /v1/leases/{agent_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseLeaseRequest {
    /// The holding session.
    pub session_id: String,
    /// The current lease token.
    pub token: String,
}

/// Body of `GET /v1/leases/{agent_id}` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseStatusResponse {
    /// Whether a live lease exists right now.
    pub held: bool,
    /// The holding session, when held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// RFC 3339 expiry, when held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Renew counter, when held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

/// Body of `POST /v1/state/{agent_id}`: the full entry in canonical form,
/// plus the lease token authorizing the append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendEntryRequest {
    /// The fully signed entry.
    pub entry: StateEntry,
    /// The appending session's lease token.
    pub lease_token: String,
}

/// Body of `GET /v1/state/{agent_id}` responses and of append
/// confirmations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadResponse {
    /// Sequence of the newest entry; absent for a fresh chain.
    pub sequence: Option<u64>,
    /// `entry_hash` of the newest entry, Base64; the zero hash for a
    /// fresh chain.
    pub entry_hash_base64: String,
}

/// Body of the 409 response when an append would fork the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkResponse {
    /// Always `"fork"`.
    pub error: String,
    /// The committed head at rejection time.
    pub current_head: HeadResponse,
}

/// Query parameters of `GET /v1/state/{agent_id}/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of entries to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Starting sequence offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// Body of `GET /v1/state/{agent_id}/history` responses, ascending by
/// sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// The requested run of entries.
    pub entries: Vec<StateEntry>,
    /// Total chain length.
    pub total: u64,
}

/// Query parameters of `GET /v1/state/{agent_id}/proof`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InclusionProofQuery {
    /// The sequence to prove inclusion for.
    pub sequence: u64,
}

/// A Merkle inclusion proof for one entry against a committed root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InclusionProofResponse {
    /// The proven sequence.
    pub sequence: u64,
    /// The committed root, Base64.
    pub root_base64: String,
    /// Sibling hashes from leaf to root, Base64 each.
    pub audit_path: Vec<String>,
    /// Number of leaves committed by the root.
    pub tree_size: u64,
}

/// Body of `POST /v1/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// The bundle under verification.
    pub proof: ProofBundle,
    /// Overrides the default `require_lease = true` policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_lease: Option<bool>,
    /// Minimum reputation score required of the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_reputation_score: Option<u64>,
}

/// Body of `POST /v1/verify` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the bundle verified.
    pub valid: bool,
    /// The agent the bundle speaks for.
    pub agent_id: String,
    /// Rejection reason when `valid` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
}

/// The uniform error body for responses not covered by a specific shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error tag.
    pub error: String,
    /// Optional human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let status = LeaseStatusResponse {
            held: false,
            session_id: None,
            expires_at: None,
            sequence: None,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "{\"held\":false}");
    }

    #[test]
    fn reputation_score_sums_counters() {
        let rep = ReputationCounters {
            proofs_verified: 1,
            entries_appended: 2,
            leases_acquired: 3,
        };
        assert_eq!(rep.score(), 6);
    }
}
