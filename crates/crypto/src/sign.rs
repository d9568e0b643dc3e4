//! Domain-separated Ed25519 signing.
//!
//! Every signature in the system covers `len16(domain) || domain || message`
//! where `len16` is the big-endian 16-bit length of the domain label. The
//! set of permitted labels is closed, so a signature produced for one
//! protocol message kind can never verify as another.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// The closed set of signing domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Identity assertions (key ownership demonstrations).
    Identity,
    /// State chain entries.
    State,
    /// Lease acquire requests.
    Lease,
    /// Proof bundles.
    Proof,
    /// Verifier challenges inside proof bundles.
    Challenge,
}

impl Domain {
    /// The ASCII label bound into every signature for this domain.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Identity => "agent.identity.v1",
            Self::State => "agent.state.v1",
            Self::Lease => "agent.lease.v1",
            Self::Proof => "agent.proof.v1",
            Self::Challenge => "agent.challenge.v1",
        }
    }
}

/// Builds the domain-framed preimage: `len16(label) || label || message`.
fn framed(domain: Domain, message: &[u8]) -> Vec<u8> {
    let label = domain.label().as_bytes();
    let mut out = Vec::with_capacity(2 + label.len() + message.len());
    // Labels are short ASCII constants, far below the u16 bound.
    out.extend_from_slice(&(label.len() as u16).to_be_bytes());
    out.extend_from_slice(label);
    out.extend_from_slice(message);
    out
}

/// Signs `message` under `domain` with the agent's identity key.
pub fn sign(key: &SigningKey, domain: Domain, message: &[u8]) -> [u8; 64] {
    key.sign(&framed(domain, message)).to_bytes()
}

/// Verifies a domain-separated signature.
///
/// Returns a plain boolean; the reason for a failure is never exposed.
pub fn verify(public_key: &VerifyingKey, domain: Domain, message: &[u8], signature: &[u8; 64]) -> bool {
    let sig = Signature::from_bytes(signature);
    public_key.verify(&framed(domain, message), &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair() -> SigningKey {
        SigningKey::from_bytes(&[0x42u8; 32])
    }

    #[test]
    fn sign_verify_roundtrip() {
        let key = keypair();
        let sig = sign(&key, Domain::Identity, b"hello");
        assert!(verify(&key.verifying_key(), Domain::Identity, b"hello", &sig));
    }

    #[test]
    fn domain_separation_holds() {
        let key = keypair();
        let sig = sign(&key, Domain::Identity, b"hello");
        assert!(!verify(&key.verifying_key(), Domain::State, b"hello", &sig));
        assert!(!verify(&key.verifying_key(), Domain::Lease, b"hello", &sig));
    }

    #[test]
    fn tampered_message_fails() {
        let key = keypair();
        let sig = sign(&key, Domain::Proof, b"hello");
        assert!(!verify(&key.verifying_key(), Domain::Proof, b"hellp", &sig));
    }

    #[test]
    fn tampered_signature_fails() {
        let key = keypair();
        let mut sig = sign(&key, Domain::Proof, b"hello");
        sig[0] ^= 0x01;
        assert!(!verify(&key.verifying_key(), Domain::Proof, b"hello", &sig));
    }

    #[test]
    fn signatures_are_deterministic() {
        let key = keypair();
        assert_eq!(
            sign(&key, Domain::Challenge, b"nonce"),
            sign(&key, Domain::Challenge, b"nonce")
        );
    }

    #[test]
    fn labels_are_the_closed_set() {
        assert_eq!(Domain::Identity.label(), "agent.identity.v1");
        assert_eq!(Domain::State.label(), "agent.state.v1");
        assert_eq!(Domain::Lease.label(), "agent.lease.v1");
        assert_eq!(Domain::Proof.label(), "agent.proof.v1");
        assert_eq!(Domain::Challenge.label(), "agent.challenge.v1");
    }
}
