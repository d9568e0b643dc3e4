//! Merkle inclusion-proof verification.
//!
//! The Authority commits to a chain with a binary tree over the entry
//! hashes, padded with the zero hash to the next power of two. Leaves
//! hash as `BLAKE3(0x00 || entry_hash)` and internal nodes as
//! `BLAKE3(0x01 || left || right)`; the prefixes keep leaves and nodes
//! from ever colliding. Construction lives with the Authority; any party
//! can verify with this module alone.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sigaid_crypto::{ct_eq, hash};
use sigaid_types::error::ChainError;
use sigaid_types::wire::InclusionProofResponse;

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// An inclusion proof for one entry hash against a committed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionProof {
    /// The proven leaf position (the entry's sequence).
    pub leaf_index: u64,
    /// Sibling hashes from the leaf level up to the root.
    pub audit_path: Vec<[u8; 32]>,
    /// Number of real (unpadded) leaves the root commits to.
    pub tree_size: u64,
    /// The committed root.
    pub root: [u8; 32],
}

impl InclusionProof {
    /// Decodes a proof from its wire form.
    pub fn from_wire(response: &InclusionProofResponse) -> Result<Self, ChainError> {
        let decode = |field: &str| -> Result<[u8; 32], ChainError> {
            BASE64
                .decode(field)
                .ok()
                .and_then(|raw| raw.try_into().ok())
                .ok_or_else(|| ChainError::InvalidEntry("bad proof encoding".into()))
        };
        Ok(Self {
            leaf_index: response.sequence,
            audit_path: response
                .audit_path
                .iter()
                .map(|sibling| decode(sibling))
                .collect::<Result<_, _>>()?,
            tree_size: response.tree_size,
            root: decode(&response.root_base64)?,
        })
    }
}

/// The leaf hash of an entry hash.
pub fn leaf_hash(entry_hash: &[u8; 32]) -> [u8; 32] {
    hash::hash(&[&[LEAF_PREFIX][..], entry_hash])
}

/// The hash of an internal node.
pub fn node_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    hash::hash(&[&[NODE_PREFIX][..], left, right])
}

/// Verifies an inclusion proof: recompute the path from the claimed entry
/// hash and compare to the committed root.
pub fn verify(entry_hash: &[u8; 32], proof: &InclusionProof) -> Result<(), ChainError> {
    let mut acc = leaf_hash(entry_hash);
    let mut position = proof.leaf_index;
    for sibling in &proof.audit_path {
        acc = if position & 1 == 0 {
            node_hash(&acc, sibling)
        } else {
            node_hash(sibling, &acc)
        };
        position >>= 1;
    }
    if !ct_eq(&acc, &proof.root) {
        return Err(ChainError::BadInclusionProof);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_roundtrip() {
        let proof = InclusionProof {
            leaf_index: 3,
            audit_path: vec![[1u8; 32], [2u8; 32]],
            tree_size: 4,
            root: [9u8; 32],
        };
        let wire = InclusionProofResponse {
            sequence: proof.leaf_index,
            root_base64: BASE64.encode(proof.root),
            audit_path: proof
                .audit_path
                .iter()
                .map(|sibling| BASE64.encode(sibling))
                .collect(),
            tree_size: proof.tree_size,
        };
        assert_eq!(InclusionProof::from_wire(&wire).unwrap(), proof);

        let mut bad = wire.clone();
        bad.root_base64 = "!!".into();
        assert!(InclusionProof::from_wire(&bad).is_err());
    }

    #[test]
    fn single_leaf_tree() {
        let entry = [7u8; 32];
        let proof = InclusionProof {
            leaf_index: 0,
            audit_path: Vec::new(),
            tree_size: 1,
            root: leaf_hash(&entry),
        };
        assert!(verify(&entry, &proof).is_ok());
        assert!(verify(&[8u8; 32], &proof).is_err());
    }
}
