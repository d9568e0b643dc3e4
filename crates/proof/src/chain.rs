//! Offline verification of a run of state-chain entries.

use sigaid_crypto::ct_eq;
use sigaid_crypto::sign::{self, Domain};
use sigaid_types::chain::ZERO_HASH;
use sigaid_types::error::ChainError;
use sigaid_types::{AgentId, StateEntry};

/// Verifies an ordered run of entries `E_a..E_b` for one agent.
///
/// For each entry the hash must recompute and the signature must verify
/// under the agent's key; for each adjacent pair the link and the
/// sequence step must hold. A run starting at sequence 0 must link to the
/// zero hash.
pub fn verify_run(entries: &[StateEntry], agent_id: &AgentId) -> Result<(), ChainError> {
    let public_key = agent_id.verifying_key();

    for entry in entries {
        if entry.agent_id != *agent_id {
            return Err(ChainError::PermissionDenied);
        }
        entry.validate_shape()?;
        if !sign::verify(
            &public_key,
            Domain::State,
            &entry.signing_bytes(),
            &entry.signature,
        ) {
            return Err(ChainError::BadSignature);
        }
        if !ct_eq(&entry.compute_entry_hash(), &entry.entry_hash) {
            return Err(ChainError::BadEntryHash);
        }
    }

    for pair in entries.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.sequence != prev.sequence + 1 {
            return Err(ChainError::SequenceMismatch {
                expected: prev.sequence + 1,
                got: next.sequence,
            });
        }
        if !ct_eq(&next.prev_hash, &prev.entry_hash) {
            return Err(ChainError::BrokenLink {
                sequence: next.sequence,
            });
        }
    }

    if let Some(first) = entries.first() {
        if first.sequence == 0 && first.prev_hash != ZERO_HASH {
            return Err(ChainError::BrokenLink { sequence: 0 });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigaid_identity::KeyPair;
    use sigaid_types::timestamp;
    use sigaid_types::ActionType;

    fn build_chain(kp: &KeyPair, len: u64) -> Vec<StateEntry> {
        let mut entries = Vec::new();
        let mut prev_hash = ZERO_HASH;
        for sequence in 0..len {
            let mut entry = StateEntry {
                agent_id: kp.agent_id().unwrap(),
                sequence,
                prev_hash,
                timestamp: timestamp::unix_to_rfc3339(1_700_000_000 + sequence as i64),
                action_type: ActionType::Action,
                action_summary: format!("step {}", sequence),
                action_data_hash: sigaid_crypto::hash::hash_payload(&sequence.to_be_bytes()),
                signature: [0u8; 64],
                entry_hash: [0u8; 32],
            };
            entry.signature = kp.sign(Domain::State, &entry.signing_bytes());
            entry.entry_hash = entry.compute_entry_hash();
            prev_hash = entry.entry_hash;
            entries.push(entry);
        }
        entries
    }

    #[test]
    fn valid_chain_verifies() {
        let kp = KeyPair::from_seed([0x31u8; 32]);
        let chain = build_chain(&kp, 5);
        assert!(verify_run(&chain, &kp.agent_id().unwrap()).is_ok());
    }

    #[test]
    fn empty_run_verifies() {
        let kp = KeyPair::from_seed([0x31u8; 32]);
        assert!(verify_run(&[], &kp.agent_id().unwrap()).is_ok());
    }

    #[test]
    fn mutating_any_entry_fails() {
        let kp = KeyPair::from_seed([0x31u8; 32]);
        let agent = kp.agent_id().unwrap();
        let chain = build_chain(&kp, 4);

        // Mutate the summary of entry 2: its signature no longer covers
        // the content.
        let mut tampered = chain.clone();
        tampered[2].action_summary = "rewritten".into();
        assert!(matches!(
            verify_run(&tampered, &agent),
            Err(ChainError::BadSignature)
        ));

        // Mutate the stored hash of entry 1: the recompute check fails.
        let mut tampered = chain.clone();
        tampered[1].entry_hash[0] ^= 0x01;
        assert!(matches!(
            verify_run(&tampered, &agent),
            Err(ChainError::BadEntryHash)
        ));

        // Drop entry 1: the sequence step breaks.
        let mut truncated = chain.clone();
        truncated.remove(1);
        assert!(matches!(
            verify_run(&truncated, &agent),
            Err(ChainError::SequenceMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn foreign_signer_rejected() {
        let kp = KeyPair::from_seed([0x31u8; 32]);
        let other = KeyPair::from_seed([0x32u8; 32]);
        let chain = build_chain(&kp, 2);
        assert!(matches!(
            verify_run(&chain, &other.agent_id().unwrap()),
            Err(ChainError::PermissionDenied)
        ));
    }

    #[test]
    fn genesis_must_link_to_zero() {
        let kp = KeyPair::from_seed([0x31u8; 32]);
        let agent = kp.agent_id().unwrap();
        let mut entry = StateEntry {
            agent_id: agent,
            sequence: 0,
            prev_hash: [1u8; 32],
            timestamp: timestamp::unix_to_rfc3339(1_700_000_000),
            action_type: ActionType::Checkpoint,
            action_summary: "genesis".into(),
            action_data_hash: [0u8; 32],
            signature: [0u8; 64],
            entry_hash: [0u8; 32],
        };
        entry.signature = kp.sign(Domain::State, &entry.signing_bytes());
        entry.entry_hash = entry.compute_entry_hash();
        // validate_shape already rejects a genesis entry that does not
        // link to the zero hash.
        assert!(verify_run(&[entry], &agent).is_err());
    }
}
