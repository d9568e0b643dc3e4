//! Property suites for the crypto primitives.

use proptest::prelude::*;
use sigaid_crypto::key_store::{decrypt_key, encrypt_key, KdfParams};
use sigaid_crypto::sign::{sign, verify, Domain};
use sigaid_crypto::{aead, ct_eq};

const DOMAINS: [Domain; 5] = [
    Domain::Identity,
    Domain::State,
    Domain::Lease,
    Domain::Proof,
    Domain::Challenge,
];

proptest! {
    /// Signatures verify for the signed message and domain, and fail for
    /// every tampering of message, domain, or signature.
    #[test]
    fn sign_verify_and_tamper(
        seed in prop::array::uniform32(any::<u8>()),
        message in proptest::collection::vec(any::<u8>(), 0..256),
        domain_index in 0usize..5,
        flip_bit in 0usize..512,
    ) {
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        let public = key.verifying_key();
        let domain = DOMAINS[domain_index];

        let signature = sign(&key, domain, &message);
        prop_assert!(verify(&public, domain, &message, &signature));

        // Wrong domain.
        let other = DOMAINS[(domain_index + 1) % DOMAINS.len()];
        prop_assert!(!verify(&public, other, &message, &signature));

        // Tampered signature.
        let mut bad_sig = signature;
        bad_sig[flip_bit / 8 % 64] ^= 1 << (flip_bit % 8);
        prop_assert!(!verify(&public, domain, &message, &bad_sig));

        // Tampered message.
        let mut bad_msg = message.clone();
        bad_msg.push(0x00);
        prop_assert!(!verify(&public, domain, &bad_msg, &signature));
    }

    /// AEAD round-trips, and every single-byte corruption fails to open.
    #[test]
    fn aead_roundtrip_and_tamper(
        key in prop::array::uniform32(any::<u8>()),
        plaintext in proptest::collection::vec(any::<u8>(), 0..128),
        aad in proptest::collection::vec(any::<u8>(), 0..32),
        corrupt_at in 0usize..256,
    ) {
        let nonce = [0x24u8; aead::NONCE_LEN];
        let sealed = aead::seal(&key, &nonce, &aad, &plaintext).unwrap();
        prop_assert_eq!(
            aead::open(&key, &nonce, &aad, &sealed).unwrap(),
            plaintext
        );

        let mut tampered = sealed.clone();
        let index = corrupt_at % tampered.len();
        tampered[index] ^= 0x01;
        prop_assert!(aead::open(&key, &nonce, &aad, &tampered).is_err());
    }

    /// Keyfiles round-trip under the right password and reject any other.
    #[test]
    fn keyfile_roundtrip(
        secret in prop::array::uniform32(any::<u8>()),
        password in "[a-zA-Z0-9 ]{1,24}",
        wrong in "[a-zA-Z0-9 ]{1,24}",
    ) {
        prop_assume!(password != wrong);
        let blob = encrypt_key(&secret, &password, KdfParams::insecure_fast()).unwrap();
        prop_assert_eq!(&decrypt_key(&blob, &password).unwrap().0, &secret.to_vec());
        prop_assert!(decrypt_key(&blob, &wrong).is_err());
    }

    /// Constant-time equality agrees with plain equality.
    #[test]
    fn ct_eq_matches_eq(
        a in proptest::collection::vec(any::<u8>(), 0..64),
        b in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assert_eq!(ct_eq(&a, &b), a == b);
        prop_assert!(ct_eq(&a, &a));
    }
}
