//! Online, Authority-corroborated proof verification.
//!
//! The pure bundle checks come from `sigaid-proof`; this module adds the
//! live corroboration: the token must validate against the lease record,
//! its claims must match the bundle, and the bundle's state head must be
//! the Authority's committed head.

use crate::registry::ReputationEvent;
use crate::Authority;
use sigaid_crypto::ct_eq;
use sigaid_proof::verifier::bundle_checks;
use sigaid_types::timestamp;
use sigaid_types::{Challenge, ProofBundle, ReasonCode, VerifyOutcome, VerifyPolicy};

impl Authority {
    /// Verifies a bundle online against `expected_challenge` under the
    /// caller's policy. Expected-invalid bundles yield
    /// [`VerifyOutcome::Invalid`], never an error.
    pub fn verify_bundle(
        &self,
        bundle: &ProofBundle,
        expected_challenge: &Challenge,
        policy: &VerifyPolicy,
    ) -> VerifyOutcome {
        let now_unix = timestamp::now_unix() as i64;

        if !self.registry.contains(&bundle.agent_id) {
            return VerifyOutcome::Invalid(ReasonCode::BadAgentId);
        }

        if let Err(reason) = bundle_checks(bundle, expected_challenge, now_unix) {
            return VerifyOutcome::Invalid(reason);
        }

        if policy.require_lease {
            let claims = match self.leases.validate_token_at(
                &bundle.agent_id,
                &bundle.lease_token,
                now_unix,
            ) {
                Ok(claims) => claims,
                Err(_) => return VerifyOutcome::Invalid(ReasonCode::NoActiveLease),
            };
            // The token inside the bundle must be the one the claims came
            // from; validate_token_at already matched claims to the lease
            // record, so only identity drift remains to check.
            if claims.agent_id != bundle.agent_id {
                return VerifyOutcome::Invalid(ReasonCode::NoActiveLease);
            }
        }

        // The bundle's head must be the committed head, byte for byte.
        match self.chains.head(&bundle.agent_id) {
            Some(head) => {
                if head.sequence != bundle.state_head.sequence
                    || !ct_eq(&head.entry_hash, &bundle.state_head.entry_hash)
                {
                    return VerifyOutcome::Invalid(ReasonCode::StateHeadMismatch);
                }
            }
            None => return VerifyOutcome::Invalid(ReasonCode::StateHeadMismatch),
        }

        if let Some(max_age) = policy.max_state_age_secs {
            let head_unix =
                timestamp::parse_rfc3339_unix(&bundle.state_head.timestamp).unwrap_or(0);
            if now_unix.saturating_sub(head_unix) > max_age as i64 {
                return VerifyOutcome::Invalid(ReasonCode::StaleBundle);
            }
        }

        self.registry
            .record(&bundle.agent_id, ReputationEvent::ProofVerified);
        VerifyOutcome::Valid
    }
}
