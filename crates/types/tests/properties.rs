//! Property suites for the core data model.

use proptest::prelude::*;
use sigaid_types::canonical::CanonicalWriter;
use sigaid_types::AgentId;
use std::str::FromStr;

proptest! {
    /// Every seed-derived public key round-trips through the printable
    /// encoding.
    #[test]
    fn agent_id_roundtrip(seed in prop::array::uniform32(any::<u8>())) {
        let signing = ed25519_dalek::SigningKey::from_bytes(&seed);
        let key = signing.verifying_key().to_bytes();
        let agent_id = AgentId::from_public_key_bytes(key).unwrap();

        let text = agent_id.to_string();
        prop_assert!(text.starts_with("aid_"));
        let parsed = AgentId::from_str(&text).unwrap();
        prop_assert_eq!(parsed.as_bytes(), &key);
        prop_assert_eq!(parsed.to_string(), text);
    }

    /// Any corruption of a single character is caught by the checksum,
    /// the alphabet, or point validation.
    #[test]
    fn agent_id_rejects_single_char_corruption(
        seed in prop::array::uniform32(any::<u8>()),
        position in 0usize..50,
        replacement in proptest::sample::select(
            "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz"
                .chars()
                .collect::<Vec<char>>()
        ),
    ) {
        let signing = ed25519_dalek::SigningKey::from_bytes(&seed);
        let agent_id =
            AgentId::from_public_key_bytes(signing.verifying_key().to_bytes()).unwrap();
        let text = agent_id.to_string();

        let body_start = 4; // past "aid_"
        let mut chars: Vec<char> = text.chars().collect();
        let index = body_start + position % (chars.len() - body_start);
        prop_assume!(chars[index] != replacement);
        chars[index] = replacement;
        let corrupted: String = chars.into_iter().collect();

        // A parse that succeeds must decode to a different key re-encoding
        // to the corrupted text, which the checksum makes vanishingly
        // unlikely; assert rejection outright.
        prop_assert!(AgentId::from_str(&corrupted).is_err());
    }

    /// Length-prefixed writes are unambiguous: distinct splits of the
    /// same bytes encode differently.
    #[test]
    fn canonical_var_fields_are_unambiguous(
        a in proptest::collection::vec(any::<u8>(), 0..64),
        b in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assume!(!b.is_empty());
        let mut one = CanonicalWriter::new();
        one.put_var(&a).put_var(&b);
        let mut joined = a.clone();
        joined.extend_from_slice(&b);
        let mut other = CanonicalWriter::new();
        other.put_var(&joined).put_var(&[]);
        prop_assert_ne!(one.into_bytes(), other.into_bytes());
    }
}
