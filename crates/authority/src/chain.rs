//! Per-agent state chain storage.
//!
//! Appends are validated against the committed head and either extend the
//! chain or fail; a fork is never reconciled. Readers may be concurrent;
//! writers are serialized per agent behind the chain lock.

use crate::registry::ReputationEvent;
use crate::Authority;
use dashmap::DashMap;
use sigaid_crypto::ct_eq;
use sigaid_crypto::sign::{self, Domain};
use sigaid_types::chain::ZERO_HASH;
use sigaid_types::error::{ChainError, LeaseError};
use sigaid_types::timestamp;
use sigaid_types::{AgentId, StateEntry, StateHead};
use std::sync::{Arc, Mutex};

type Chain = Arc<Mutex<Vec<StateEntry>>>;

/// The keyed chain store.
pub struct ChainStore {
    chains: DashMap<AgentId, Chain>,
}

impl ChainStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            chains: DashMap::new(),
        }
    }

    fn chain(&self, agent_id: &AgentId) -> Chain {
        self.chains
            .entry(*agent_id)
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }

    /// Validates and appends an entry for the registered identity
    /// `agent_id`. The caller has already established that the appending
    /// session holds the lease.
    pub fn append(&self, agent_id: &AgentId, entry: StateEntry) -> Result<StateHead, ChainError> {
        // An entry claiming a different identity than the registered one
        // is a rotation attempt, which is unsupported.
        if entry.agent_id != *agent_id {
            return Err(ChainError::PermissionDenied);
        }
        entry.validate_shape()?;

        if !sign::verify(
            &agent_id.verifying_key(),
            Domain::State,
            &entry.signing_bytes(),
            &entry.signature,
        ) {
            return Err(ChainError::BadSignature);
        }
        if !ct_eq(&entry.compute_entry_hash(), &entry.entry_hash) {
            return Err(ChainError::BadEntryHash);
        }

        let chain = self.chain(agent_id);
        let mut guard = chain
            .lock()
            .map_err(|_| ChainError::InvalidEntry("chain lock poisoned".into()))?;

        let (expected_seq, expected_prev) = match guard.last() {
            Some(head) => (head.sequence + 1, head.entry_hash),
            None => (0, ZERO_HASH),
        };
        let current_head = guard.last().map(StateEntry::head);

        if entry.sequence == expected_seq {
            if entry.prev_hash != expected_prev {
                // Right position, wrong lineage: a fork.
                return Err(ChainError::Fork {
                    current_head: current_head.unwrap_or(StateHead {
                        sequence: 0,
                        entry_hash: ZERO_HASH,
                    }),
                });
            }
        } else if entry.sequence < expected_seq {
            // A sequence the chain already holds. Identical resubmission
            // is still a mismatch; differing content is a fork.
            let committed = &guard[entry.sequence as usize];
            if *committed != entry {
                return Err(ChainError::Fork {
                    current_head: current_head.unwrap_or(StateHead {
                        sequence: 0,
                        entry_hash: ZERO_HASH,
                    }),
                });
            }
            return Err(ChainError::SequenceMismatch {
                expected: expected_seq,
                got: entry.sequence,
            });
        } else {
            return Err(ChainError::SequenceMismatch {
                expected: expected_seq,
                got: entry.sequence,
            });
        }

        let head = entry.head();
        guard.push(entry);
        log::debug!(
            "[Chain] {} appended sequence {}",
            agent_id,
            head.sequence
        );
        Ok(head)
    }

    /// The committed head, `None` for a fresh chain.
    pub fn head(&self, agent_id: &AgentId) -> Option<StateHead> {
        let chain = self.chain(agent_id);
        let guard = chain.lock().ok()?;
        guard.last().map(StateEntry::head)
    }

    /// Entries in ascending sequence, windowed by `offset` and `limit`.
    /// Also returns the total chain length.
    pub fn history(&self, agent_id: &AgentId, offset: u64, limit: u64) -> (Vec<StateEntry>, u64) {
        let chain = self.chain(agent_id);
        let Ok(guard) = chain.lock() else {
            return (Vec::new(), 0);
        };
        let total = guard.len() as u64;
        let start = offset.min(total) as usize;
        let end = offset.saturating_add(limit).min(total) as usize;
        (guard[start..end].to_vec(), total)
    }

    /// All entry hashes in sequence order, for Merkle commitments.
    pub fn entry_hashes(&self, agent_id: &AgentId) -> Vec<[u8; 32]> {
        let chain = self.chain(agent_id);
        let Ok(guard) = chain.lock() else {
            return Vec::new();
        };
        guard.iter().map(|e| e.entry_hash).collect()
    }
}

impl Default for ChainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Authority {
    /// Handles a lease-gated append: token validation, then the chain
    /// update.
    pub fn append_entry(
        &self,
        agent_id: &AgentId,
        entry: StateEntry,
        lease_token: &str,
    ) -> Result<StateHead, AppendError> {
        self.leases
            .validate_token_at(agent_id, lease_token, timestamp::now_unix() as i64)
            .map_err(AppendError::Lease)?;
        let head = self
            .chains
            .append(agent_id, entry)
            .map_err(AppendError::Chain)?;
        self.registry.record(agent_id, ReputationEvent::EntryAppended);
        Ok(head)
    }
}

/// An append failure: either the lease gate or the chain itself.
#[derive(Debug)]
pub enum AppendError {
    /// The lease gate rejected the token.
    Lease(LeaseError),
    /// The chain rejected the entry.
    Chain(ChainError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigaid_identity::KeyPair;
    use sigaid_types::ActionType;

    fn keypair() -> KeyPair {
        KeyPair::from_seed([0x71u8; 32])
    }

    fn signed_entry(
        kp: &KeyPair,
        sequence: u64,
        prev_hash: [u8; 32],
        summary: &str,
    ) -> StateEntry {
        let mut entry = StateEntry {
            agent_id: kp.agent_id().unwrap(),
            sequence,
            prev_hash,
            timestamp: timestamp::unix_to_rfc3339(1_700_000_000 + sequence as i64),
            action_type: ActionType::Action,
            action_summary: summary.to_string(),
            action_data_hash: sigaid_crypto::hash::hash_payload(summary.as_bytes()),
            signature: [0u8; 64],
            entry_hash: [0u8; 32],
        };
        entry.signature = kp.sign(Domain::State, &entry.signing_bytes());
        entry.entry_hash = entry.compute_entry_hash();
        entry
    }

    #[test]
    fn appends_extend_the_head() {
        let store = ChainStore::new();
        let kp = keypair();
        let agent = kp.agent_id().unwrap();

        let e0 = signed_entry(&kp, 0, ZERO_HASH, "zero");
        let h0 = store.append(&agent, e0.clone()).unwrap();
        assert_eq!(h0.sequence, 0);

        let e1 = signed_entry(&kp, 1, h0.entry_hash, "one");
        let h1 = store.append(&agent, e1).unwrap();
        assert_eq!(h1.sequence, 1);
        assert_eq!(store.head(&agent).unwrap(), h1);
    }

    #[test]
    fn fork_at_next_sequence_rejected() {
        let store = ChainStore::new();
        let kp = keypair();
        let agent = kp.agent_id().unwrap();

        let e0 = signed_entry(&kp, 0, ZERO_HASH, "zero");
        let h0 = store.append(&agent, e0).unwrap();

        // Correct position, wrong prev_hash.
        let forked = signed_entry(&kp, 1, [0xEEu8; 32], "fork");
        match store.append(&agent, forked) {
            Err(ChainError::Fork { current_head }) => assert_eq!(current_head, h0),
            other => panic!("expected fork, got {:?}", other),
        }
        // No state change.
        assert_eq!(store.head(&agent).unwrap(), h0);
    }

    #[test]
    fn conflicting_committed_sequence_is_fork() {
        let store = ChainStore::new();
        let kp = keypair();
        let agent = kp.agent_id().unwrap();

        let e0 = signed_entry(&kp, 0, ZERO_HASH, "zero");
        let h0 = store.append(&agent, e0).unwrap();
        let e1 = signed_entry(&kp, 1, h0.entry_hash, "one");
        store.append(&agent, e1).unwrap();

        let conflicting = signed_entry(&kp, 1, h0.entry_hash, "other-one");
        assert!(matches!(
            store.append(&agent, conflicting),
            Err(ChainError::Fork { .. })
        ));
    }

    #[test]
    fn skipped_sequence_rejected() {
        let store = ChainStore::new();
        let kp = keypair();
        let agent = kp.agent_id().unwrap();

        let e = signed_entry(&kp, 3, [0u8; 32], "later");
        assert!(matches!(
            store.append(&agent, e),
            Err(ChainError::SequenceMismatch { expected: 0, got: 3 })
        ));
    }

    #[test]
    fn tampered_entry_rejected() {
        let store = ChainStore::new();
        let kp = keypair();
        let agent = kp.agent_id().unwrap();

        let mut e0 = signed_entry(&kp, 0, ZERO_HASH, "zero");
        e0.action_summary = "tampered".into();
        assert!(matches!(
            store.append(&agent, e0),
            Err(ChainError::BadSignature)
        ));

        let mut e0 = signed_entry(&kp, 0, ZERO_HASH, "zero");
        e0.entry_hash[4] ^= 0x01;
        assert!(matches!(
            store.append(&agent, e0),
            Err(ChainError::BadEntryHash)
        ));
    }

    #[test]
    fn foreign_identity_rejected() {
        let store = ChainStore::new();
        let kp = keypair();
        let other = KeyPair::from_seed([0x72u8; 32]);

        let e0 = signed_entry(&other, 0, ZERO_HASH, "zero");
        assert!(matches!(
            store.append(&kp.agent_id().unwrap(), e0),
            Err(ChainError::PermissionDenied)
        ));
    }

    #[test]
    fn history_windows() {
        let store = ChainStore::new();
        let kp = keypair();
        let agent = kp.agent_id().unwrap();

        let mut prev = ZERO_HASH;
        for i in 0..5 {
            let e = signed_entry(&kp, i, prev, &format!("e{}", i));
            prev = store.append(&agent, e).unwrap().entry_hash;
        }

        let (window, total) = store.history(&agent, 1, 2);
        assert_eq!(total, 5);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].sequence, 1);
        assert_eq!(window[1].sequence, 2);

        let (tail, _) = store.history(&agent, 4, 10);
        assert_eq!(tail.len(), 1);
        let (past_end, _) = store.history(&agent, 9, 10);
        assert!(past_end.is_empty());
    }
}
