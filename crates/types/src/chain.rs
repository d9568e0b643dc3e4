//! State chain entries and heads.
//!
//! Each agent owns a strictly linear, append-only chain of `StateEntry`
//! records. Entry `n` commits to entry `n - 1` through `prev_hash`, is
//! signed by the agent's identity key, and is itself committed to by
//! `entry_hash`. An entry is immutable once signed.

use crate::agent::AgentId;
use crate::canonical;
use crate::error::ChainError;
use crate::{ACTION_SUMMARY_MAX_BYTES, CUSTOM_ACTION_TYPE_MAX_BYTES};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The `prev_hash` of the first entry in every chain.
pub const ZERO_HASH: [u8; 32] = [0u8; 32];

/// The category of an action recorded on a state chain.
///
/// The enumerated set is closed; anything else travels as `Custom` with a
/// bounded label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionType {
    /// The agent committed to a decision.
    Decision,
    /// The agent performed an external action.
    Action,
    /// The agent recorded an observation.
    Observation,
    /// The agent sent or received a message.
    Communication,
    /// The agent recorded an error condition.
    Error,
    /// A periodic checkpoint with no semantic payload.
    Checkpoint,
    /// A caller-defined action category, at most 32 bytes.
    Custom(String),
}

impl ActionType {
    /// The canonical string form, as signed and as sent on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Decision => "decision",
            Self::Action => "action",
            Self::Observation => "observation",
            Self::Communication => "communication",
            Self::Error => "error",
            Self::Checkpoint => "checkpoint",
            Self::Custom(label) => label.as_str(),
        }
    }

    /// Parses a string form, validating the length bound on custom labels.
    pub fn parse(s: &str) -> Result<Self, ChainError> {
        Ok(match s {
            "decision" => Self::Decision,
            "action" => Self::Action,
            "observation" => Self::Observation,
            "communication" => Self::Communication,
            "error" => Self::Error,
            "checkpoint" => Self::Checkpoint,
            other => {
                if other.is_empty() || other.len() > CUSTOM_ACTION_TYPE_MAX_BYTES {
                    return Err(ChainError::InvalidEntry(format!(
                        "custom action type must be 1..={} bytes",
                        CUSTOM_ACTION_TYPE_MAX_BYTES
                    )));
                }
                Self::Custom(other.to_string())
            }
        })
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// One immutable, signed record on an agent's state chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    /// The identity that signed this entry.
    pub agent_id: AgentId,
    /// 0-based position in the chain. Never reused, never skipped.
    pub sequence: u64,
    /// `entry_hash` of the previous entry; all zeros at sequence 0.
    #[serde(with = "crate::encoding::b64_32")]
    pub prev_hash: [u8; 32],
    /// RFC 3339 UTC timestamp, stored exactly as signed.
    pub timestamp: String,
    /// The action category.
    pub action_type: ActionType,
    /// Human-readable summary, at most 256 UTF-8 bytes.
    pub action_summary: String,
    /// BLAKE3 hash of the caller's payload. The payload itself never
    /// reaches the chain.
    #[serde(with = "crate::encoding::b64_32")]
    pub action_data_hash: [u8; 32],
    /// Ed25519 signature by the agent's identity key over the canonical
    /// bytes of all preceding fields.
    #[serde(with = "crate::encoding::b64_64")]
    pub signature: [u8; 64],
    /// BLAKE3 hash over the fully signed entry.
    #[serde(with = "crate::encoding::b64_32")]
    pub entry_hash: [u8; 32],
}

impl StateEntry {
    /// The canonical bytes covered by the entry signature.
    pub fn signing_bytes(&self) -> Vec<u8> {
        canonical::entry_signing_bytes(self)
    }

    /// Recomputes what `entry_hash` must be for this entry's content and
    /// signature.
    pub fn compute_entry_hash(&self) -> [u8; 32] {
        *blake3::hash(&canonical::entry_hash_preimage(self)).as_bytes()
    }

    /// Structural validation: bounded fields and a parseable timestamp.
    /// Signature and hash checks live with the verifiers.
    pub fn validate_shape(&self) -> Result<(), ChainError> {
        if self.action_summary.len() > ACTION_SUMMARY_MAX_BYTES {
            return Err(ChainError::InvalidEntry(format!(
                "action summary exceeds {} bytes",
                ACTION_SUMMARY_MAX_BYTES
            )));
        }
        ActionType::parse(self.action_type.as_str())?;
        crate::timestamp::parse_rfc3339_unix(&self.timestamp)
            .map_err(ChainError::InvalidEntry)?;
        if self.sequence == 0 && self.prev_hash != ZERO_HASH {
            return Err(ChainError::InvalidEntry(
                "sequence 0 must link to the zero hash".into(),
            ));
        }
        Ok(())
    }

    /// The head this entry defines once committed.
    pub fn head(&self) -> StateHead {
        StateHead {
            sequence: self.sequence,
            entry_hash: self.entry_hash,
        }
    }
}

/// The latest committed position of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHead {
    /// Sequence number of the newest entry.
    pub sequence: u64,
    /// `entry_hash` of the newest entry.
    #[serde(with = "crate::encoding::b64_32")]
    pub entry_hash: [u8; 32],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_type_roundtrip() {
        for s in [
            "decision",
            "action",
            "observation",
            "communication",
            "error",
            "checkpoint",
        ] {
            assert_eq!(ActionType::parse(s).unwrap().as_str(), s);
        }
        let custom = ActionType::parse("tool_call").unwrap();
        assert_eq!(custom, ActionType::Custom("tool_call".into()));
    }

    #[test]
    fn custom_action_type_bounded() {
        let long = "x".repeat(CUSTOM_ACTION_TYPE_MAX_BYTES + 1);
        assert!(ActionType::parse(&long).is_err());
        assert!(ActionType::parse("").is_err());
    }
}
