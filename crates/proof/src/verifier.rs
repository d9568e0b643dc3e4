//! The shared bundle checks and the offline verifier.
//!
//! Verification returns a tagged outcome and never an error for
//! expected-invalid input. The checks here are the Authority-free subset;
//! online verification composes them with live corroboration.

use sigaid_crypto::ct_eq;
use sigaid_crypto::sign::{self, Domain};
use sigaid_types::canonical;
use sigaid_types::timestamp;
use sigaid_types::{Challenge, ProofBundle, ReasonCode, StateHead, VerifyOutcome};
use sigaid_types::CLOCK_SKEW_SECS;

/// Runs the Authority-free bundle checks: both signatures, the challenge
/// match, timestamp freshness, and state-head self-consistency.
///
/// Returns `Ok(())` when every check passes, otherwise the first failing
/// reason.
pub fn bundle_checks(
    bundle: &ProofBundle,
    expected_challenge: &Challenge,
    now_unix: i64,
) -> Result<(), ReasonCode> {
    let public_key = bundle.agent_id.verifying_key();

    // Bundle signature covers everything else; check it first.
    if !sign::verify(
        &public_key,
        Domain::Proof,
        &canonical::bundle_signing_bytes(bundle),
        &bundle.bundle_signature,
    ) {
        return Err(ReasonCode::BadSignature);
    }
    if !sign::verify(
        &public_key,
        Domain::Challenge,
        bundle.challenge.as_ref(),
        &bundle.challenge_signature,
    ) {
        return Err(ReasonCode::BadSignature);
    }
    if !ct_eq(bundle.challenge.as_ref(), expected_challenge.as_ref()) {
        return Err(ReasonCode::ChallengeMismatch);
    }

    let bundle_unix = match timestamp::parse_rfc3339_unix(&bundle.bundle_timestamp) {
        Ok(t) => t,
        Err(_) => return Err(ReasonCode::StaleBundle),
    };
    if !timestamp::within_skew(bundle_unix, now_unix, CLOCK_SKEW_SECS) {
        return Err(ReasonCode::StaleBundle);
    }

    // State head self-consistency: the entry must be signed by the same
    // identity and commit to its own content.
    let head = &bundle.state_head;
    if head.agent_id != bundle.agent_id {
        return Err(ReasonCode::BadSignature);
    }
    if !sign::verify(
        &public_key,
        Domain::State,
        &head.signing_bytes(),
        &head.signature,
    ) {
        return Err(ReasonCode::BadSignature);
    }
    if !ct_eq(&head.compute_entry_hash(), &head.entry_hash) {
        return Err(ReasonCode::StateHeadMismatch);
    }

    Ok(())
}

/// Fully offline verification: the shared checks plus, when a cached head
/// is supplied, a monotonicity check against it. A pass is `ValidOffline`,
/// which callers must weigh accordingly.
pub fn verify_offline(
    bundle: &ProofBundle,
    expected_challenge: &Challenge,
    now_unix: i64,
    cached_head: Option<&StateHead>,
) -> VerifyOutcome {
    if let Err(reason) = bundle_checks(bundle, expected_challenge, now_unix) {
        return VerifyOutcome::Invalid(reason);
    }

    if let Some(cached) = cached_head {
        let head = &bundle.state_head;
        if head.sequence < cached.sequence {
            return VerifyOutcome::Invalid(ReasonCode::StateHeadMismatch);
        }
        // On an overlapping sequence the two heads must agree exactly.
        if head.sequence == cached.sequence && !ct_eq(&head.entry_hash, &cached.entry_hash) {
            return VerifyOutcome::Invalid(ReasonCode::StateHeadMismatch);
        }
    }

    VerifyOutcome::ValidOffline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prover::build_bundle;
    use sigaid_identity::KeyPair;
    use sigaid_types::chain::ZERO_HASH;
    use sigaid_types::{ActionType, StateEntry};

    const NOW: i64 = 1_700_000_100;

    fn keypair() -> KeyPair {
        KeyPair::from_seed([0x21u8; 32])
    }

    fn signed_entry(kp: &KeyPair, sequence: u64, prev_hash: [u8; 32]) -> StateEntry {
        let mut entry = StateEntry {
            agent_id: kp.agent_id().unwrap(),
            sequence,
            prev_hash,
            timestamp: timestamp::unix_to_rfc3339(NOW - 50),
            action_type: ActionType::Action,
            action_summary: format!("step {}", sequence),
            action_data_hash: sigaid_crypto::hash::hash_payload(b"data"),
            signature: [0u8; 64],
            entry_hash: [0u8; 32],
        };
        entry.signature = kp.sign(Domain::State, &entry.signing_bytes());
        entry.entry_hash = entry.compute_entry_hash();
        entry
    }

    fn bundle(kp: &KeyPair, challenge: &Challenge) -> ProofBundle {
        build_bundle(
            kp,
            "v4.local.token",
            signed_entry(kp, 0, ZERO_HASH),
            challenge.clone(),
            timestamp::unix_to_rfc3339(NOW),
        )
        .unwrap()
    }

    #[test]
    fn valid_bundle_passes_offline() {
        let kp = keypair();
        let challenge = Challenge::new(vec![1u8; 32]).unwrap();
        let b = bundle(&kp, &challenge);
        assert_eq!(
            verify_offline(&b, &challenge, NOW, None),
            VerifyOutcome::ValidOffline
        );
    }

    #[test]
    fn tampered_challenge_signature_fails() {
        let kp = keypair();
        let challenge = Challenge::new(vec![1u8; 32]).unwrap();
        let mut b = bundle(&kp, &challenge);
        b.challenge_signature[0] ^= 0x01;
        // The outer bundle signature also covers the challenge signature,
        // so tampering is caught as a bad signature either way.
        assert_eq!(
            verify_offline(&b, &challenge, NOW, None),
            VerifyOutcome::Invalid(ReasonCode::BadSignature)
        );
    }

    #[test]
    fn wrong_challenge_rejected() {
        let kp = keypair();
        let issued = Challenge::new(vec![1u8; 32]).unwrap();
        let other = Challenge::new(vec![2u8; 32]).unwrap();
        let b = bundle(&kp, &issued);
        assert_eq!(
            verify_offline(&b, &other, NOW, None),
            VerifyOutcome::Invalid(ReasonCode::ChallengeMismatch)
        );
    }

    #[test]
    fn stale_bundle_rejected() {
        let kp = keypair();
        let challenge = Challenge::new(vec![1u8; 32]).unwrap();
        let b = bundle(&kp, &challenge);
        assert_eq!(
            verify_offline(&b, &challenge, NOW + CLOCK_SKEW_SECS as i64 + 1, None),
            VerifyOutcome::Invalid(ReasonCode::StaleBundle)
        );
    }

    #[test]
    fn cached_head_monotonicity() {
        let kp = keypair();
        let challenge = Challenge::new(vec![1u8; 32]).unwrap();
        let b = bundle(&kp, &challenge);

        // Cached head ahead of the bundle: reject.
        let ahead = StateHead {
            sequence: 5,
            entry_hash: [9u8; 32],
        };
        assert_eq!(
            verify_offline(&b, &challenge, NOW, Some(&ahead)),
            VerifyOutcome::Invalid(ReasonCode::StateHeadMismatch)
        );

        // Cached head equal but disagreeing on the hash: reject.
        let conflicting = StateHead {
            sequence: 0,
            entry_hash: [9u8; 32],
        };
        assert_eq!(
            verify_offline(&b, &challenge, NOW, Some(&conflicting)),
            VerifyOutcome::Invalid(ReasonCode::StateHeadMismatch)
        );

        // Cached head equal and agreeing: pass.
        let agreeing = b.state_head.head();
        assert_eq!(
            verify_offline(&b, &challenge, NOW, Some(&agreeing)),
            VerifyOutcome::ValidOffline
        );
    }
}
