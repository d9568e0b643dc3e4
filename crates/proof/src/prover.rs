//! Proof bundle construction.

use sigaid_crypto::sign::Domain;
use sigaid_identity::KeyPair;
use sigaid_types::canonical;
use sigaid_types::error::IdentityError;
use sigaid_types::{Challenge, ProofBundle, StateEntry};

/// Builds a signed proof bundle from a held lease token, the current
/// state head, and a verifier challenge.
///
/// The challenge is signed under `agent.challenge.v1`, then the whole
/// bundle minus its own signature is signed under `agent.proof.v1`.
pub fn build_bundle(
    keypair: &KeyPair,
    lease_token: &str,
    state_head: StateEntry,
    challenge: Challenge,
    bundle_timestamp: String,
) -> Result<ProofBundle, IdentityError> {
    let agent_id = keypair.agent_id()?;
    let challenge_signature = keypair.sign(Domain::Challenge, challenge.as_ref());

    let mut bundle = ProofBundle {
        agent_id,
        lease_token: lease_token.to_string(),
        state_head,
        challenge,
        challenge_signature,
        bundle_timestamp,
        bundle_signature: [0u8; 64],
    };
    bundle.bundle_signature = keypair.sign(Domain::Proof, &canonical::bundle_signing_bytes(&bundle));
    Ok(bundle)
}
