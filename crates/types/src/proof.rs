//! Proof bundles: the compact object an agent presents to a challenging
//! service, and the vocabulary of verification outcomes.

use crate::agent::AgentId;
use crate::chain::StateEntry;
use crate::error::VerifyError;
use crate::{CHALLENGE_MAX_LEN, CHALLENGE_MIN_LEN};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A verifier-supplied nonce, 16 to 256 bytes, unique per verification
/// attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Challenge(#[serde(with = "crate::encoding::b64_vec")] Vec<u8>);

impl Challenge {
    /// Wraps challenge bytes, enforcing the length bounds.
    pub fn new(bytes: Vec<u8>) -> Result<Self, VerifyError> {
        if bytes.len() < CHALLENGE_MIN_LEN || bytes.len() > CHALLENGE_MAX_LEN {
            return Err(VerifyError::InvalidChallenge(format!(
                "challenge length {} outside {}..={}",
                bytes.len(),
                CHALLENGE_MIN_LEN,
                CHALLENGE_MAX_LEN
            )));
        }
        Ok(Self(bytes))
    }

    /// The length of the challenge in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Challenges are never empty; present for the usual pairing with
    /// [`Challenge::len`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Challenge {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The compact, self-describing proof an agent produces for a challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    /// The identity the proof speaks for.
    pub agent_id: AgentId,
    /// The current lease token, opaque to the service.
    pub lease_token: String,
    /// The newest entry of the agent's state chain.
    pub state_head: StateEntry,
    /// The challenge exactly as received.
    pub challenge: Challenge,
    /// Ed25519 signature over the challenge under `agent.challenge.v1`.
    #[serde(with = "crate::encoding::b64_64")]
    pub challenge_signature: [u8; 64],
    /// Bundle creation time, RFC 3339 UTC, stored exactly as signed.
    pub bundle_timestamp: String,
    /// Ed25519 signature over all preceding fields under `agent.proof.v1`.
    #[serde(with = "crate::encoding::b64_64")]
    pub bundle_signature: [u8; 64],
}

/// The enumerated reasons a bundle can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// The agent identifier failed to parse or validate.
    BadAgentId,
    /// A signature in the bundle failed verification.
    BadSignature,
    /// The challenge in the bundle differs from the one issued.
    ChallengeMismatch,
    /// The bundle timestamp is outside the tolerated skew window.
    StaleBundle,
    /// The Authority holds no live lease matching the bundle's token.
    NoActiveLease,
    /// The bundle's state head disagrees with the Authority's head.
    StateHeadMismatch,
    /// Online verification was required but the Authority was unreachable.
    AuthorityUnavailable,
}

impl ReasonCode {
    /// The wire form of the reason code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadAgentId => "bad_agent_id",
            Self::BadSignature => "bad_signature",
            Self::ChallengeMismatch => "challenge_mismatch",
            Self::StaleBundle => "stale_bundle",
            Self::NoActiveLease => "no_active_lease",
            Self::StateHeadMismatch => "state_head_mismatch",
            Self::AuthorityUnavailable => "authority_unavailable",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tagged outcome of verifying a proof bundle. Verification never
/// fails with an error for expected-invalid input; it returns `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Every check passed, including Authority corroboration.
    Valid,
    /// Every offline check passed; the Authority was not consulted. The
    /// caller must weigh this accordingly.
    ValidOffline,
    /// The bundle was rejected.
    Invalid(ReasonCode),
}

impl VerifyOutcome {
    /// True for both `Valid` and `ValidOffline`.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid | Self::ValidOffline)
    }
}

/// Caller policy for proof verification.
#[derive(Debug, Clone)]
pub struct VerifyPolicy {
    /// Reject bundles whose lease cannot be corroborated live.
    pub require_lease: bool,
    /// Maximum tolerated age, in seconds, of the bundle's state head
    /// timestamp. `None` disables the check.
    pub max_state_age_secs: Option<u64>,
    /// Minimum reputation score the Authority must report for the agent.
    /// `None` disables the check.
    pub min_reputation: Option<u64>,
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        Self {
            require_lease: true,
            max_state_age_secs: None,
            min_reputation: None,
        }
    }
}
