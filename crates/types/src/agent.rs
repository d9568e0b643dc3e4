//! The printable `AgentId` and its checksum-guarded encoding.
//!
//! An `AgentId` is the literal prefix `aid_` followed by the Base58
//! (Bitcoin alphabet) encoding of the 32-byte Ed25519 public key
//! concatenated with a 4-byte truncated BLAKE3 checksum over the key.
//! Every valid `AgentId` parses back to a valid Ed25519 public point and
//! re-encodes to itself.

use crate::error::IdentityError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The literal prefix of every printable agent identifier.
pub const AGENT_ID_PREFIX: &str = "aid_";
/// Length in bytes of the truncated BLAKE3 checksum.
pub const CHECKSUM_LEN: usize = 4;

/// A verified agent identity: the raw 32-byte Ed25519 public key.
///
/// Equality is byte-wise on the decoded key. Construction always validates
/// that the bytes form a valid Ed25519 public point, so holding an
/// `AgentId` is proof the key is well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId([u8; 32]);

impl AgentId {
    /// Creates an `AgentId` from raw public key bytes, validating that they
    /// decode to a valid Ed25519 public point.
    pub fn from_public_key_bytes(bytes: [u8; 32]) -> Result<Self, IdentityError> {
        ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|_| IdentityError::InvalidAgentId("not a valid Ed25519 public key".into()))?;
        Ok(Self(bytes))
    }

    /// Returns the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the validated `ed25519_dalek` verifying key for this identity.
    pub fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        // Validity was established at construction.
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .unwrap_or_else(|_| unreachable!("AgentId holds a validated public point"))
    }

    /// Computes the 4-byte truncated BLAKE3 checksum over a public key.
    pub fn checksum(key: &[u8; 32]) -> [u8; CHECKSUM_LEN] {
        let digest = blake3::hash(key);
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest.as_bytes()[..CHECKSUM_LEN]);
        out
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = [0u8; 32 + CHECKSUM_LEN];
        payload[..32].copy_from_slice(&self.0);
        payload[32..].copy_from_slice(&Self::checksum(&self.0));
        write!(f, "{}{}", AGENT_ID_PREFIX, bs58::encode(payload).into_string())
    }
}

impl FromStr for AgentId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix(AGENT_ID_PREFIX)
            .ok_or_else(|| IdentityError::InvalidAgentId("missing aid_ prefix".into()))?;

        let decoded = bs58::decode(body)
            .into_vec()
            .map_err(|_| IdentityError::InvalidAgentId("invalid Base58".into()))?;
        if decoded.len() != 32 + CHECKSUM_LEN {
            return Err(IdentityError::InvalidAgentId(format!(
                "decoded length {} != {}",
                decoded.len(),
                32 + CHECKSUM_LEN
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded[..32]);
        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&decoded[32..]);

        if checksum != Self::checksum(&key) {
            return Err(IdentityError::InvalidAgentId("checksum mismatch".into()));
        }

        Self::from_public_key_bytes(key)
    }
}

impl Serialize for AgentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AgentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
