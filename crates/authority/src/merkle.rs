//! Merkle commitments over a chain's entry hashes.
//!
//! Tree construction and proof production live here with the chain store;
//! the hashing rules and proof verification are shared with every
//! verifier through `sigaid-proof::merkle`.

use crate::Authority;
use sigaid_proof::merkle::{leaf_hash, node_hash, InclusionProof};
use sigaid_types::chain::ZERO_HASH;
use sigaid_types::error::ChainError;
use sigaid_types::AgentId;

fn padded_len(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Builds all tree levels bottom-up. Level 0 is the padded leaf layer.
fn levels(entry_hashes: &[[u8; 32]]) -> Vec<Vec<[u8; 32]>> {
    let width = padded_len(entry_hashes.len());
    let mut level: Vec<[u8; 32]> = Vec::with_capacity(width);
    for entry_hash in entry_hashes {
        level.push(leaf_hash(entry_hash));
    }
    while level.len() < width {
        level.push(leaf_hash(&ZERO_HASH));
    }

    let mut all = vec![level];
    loop {
        let above: Vec<[u8; 32]> = {
            let below = match all.last() {
                Some(level) if level.len() > 1 => level,
                _ => break,
            };
            below
                .chunks(2)
                .map(|pair| node_hash(&pair[0], &pair[1]))
                .collect()
        };
        all.push(above);
    }
    all
}

/// The committed root for a run of entry hashes. An empty chain commits
/// to the zero hash.
pub fn root(entry_hashes: &[[u8; 32]]) -> [u8; 32] {
    if entry_hashes.is_empty() {
        return ZERO_HASH;
    }
    levels(entry_hashes)
        .last()
        .and_then(|top| top.first())
        .copied()
        .unwrap_or(ZERO_HASH)
}

/// Produces an inclusion proof for the leaf at `index`.
pub fn prove(entry_hashes: &[[u8; 32]], index: u64) -> Result<InclusionProof, ChainError> {
    if index as usize >= entry_hashes.len() {
        return Err(ChainError::InvalidEntry(format!(
            "no entry at sequence {}",
            index
        )));
    }

    let all = levels(entry_hashes);
    let mut audit_path = Vec::with_capacity(all.len());
    let mut position = index as usize;
    for level in &all[..all.len().saturating_sub(1)] {
        let sibling = position ^ 1;
        audit_path.push(level[sibling]);
        position >>= 1;
    }

    Ok(InclusionProof {
        leaf_index: index,
        audit_path,
        tree_size: entry_hashes.len() as u64,
        root: root(entry_hashes),
    })
}

impl Authority {
    /// Serves an inclusion proof for `sequence` against the current
    /// committed root of the agent's chain.
    pub fn inclusion_proof(
        &self,
        agent_id: &AgentId,
        sequence: u64,
    ) -> Result<InclusionProof, ChainError> {
        let hashes = self.chains.entry_hashes(agent_id);
        prove(&hashes, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigaid_proof::merkle::verify;

    fn hashes(n: u8) -> Vec<[u8; 32]> {
        (0..n).map(|i| [i; 32]).collect()
    }

    #[test]
    fn empty_chain_commits_to_zero() {
        assert_eq!(root(&[]), ZERO_HASH);
    }

    #[test]
    fn single_leaf_root_is_its_leaf_hash() {
        let h = hashes(1);
        assert_eq!(root(&h), leaf_hash(&h[0]));
    }

    #[test]
    fn proofs_verify_at_every_index() {
        for n in 1..=9u8 {
            let h = hashes(n);
            for i in 0..u64::from(n) {
                let proof = prove(&h, i).unwrap();
                verify(&h[i as usize], &proof)
                    .unwrap_or_else(|_| panic!("n={} i={} failed", n, i));
            }
        }
    }

    #[test]
    fn proof_rejects_wrong_leaf() {
        let h = hashes(5);
        let proof = prove(&h, 2).unwrap();
        assert!(verify(&[0xFFu8; 32], &proof).is_err());
    }

    #[test]
    fn proof_rejects_tampered_path() {
        let h = hashes(5);
        let mut proof = prove(&h, 2).unwrap();
        proof.audit_path[0][0] ^= 0x01;
        assert!(verify(&h[2], &proof).is_err());
    }

    #[test]
    fn proof_rejects_wrong_index() {
        let h = hashes(4);
        let mut proof = prove(&h, 1).unwrap();
        proof.leaf_index = 2;
        assert!(verify(&h[1], &proof).is_err());
    }

    #[test]
    fn out_of_range_index_errors() {
        let h = hashes(3);
        assert!(prove(&h, 3).is_err());
    }

    #[test]
    fn padding_is_stable() {
        // 3 leaves pad to 4; adding the zero hash explicitly as a 4th
        // entry must give the same root.
        let three = hashes(3);
        let mut four = three.clone();
        four.push(ZERO_HASH);
        assert_eq!(root(&three), root(&four));
    }

    #[test]
    fn audit_path_depth_is_log2() {
        let h = hashes(8);
        assert_eq!(prove(&h, 0).unwrap().audit_path.len(), 3);
        let h = hashes(9);
        assert_eq!(prove(&h, 0).unwrap().audit_path.len(), 4);
    }
}
