//! Deterministic identity vectors: a fixed seed must always produce the
//! same AgentID and the same domain-separated signature.

use sigaid_crypto::sign::Domain;
use sigaid_identity::KeyPair;
use std::str::FromStr;

const SEED: [u8; 32] = [0x01; 32];

#[test]
fn fixed_seed_agent_id_is_stable() {
    let keypair = KeyPair::from_seed(SEED);
    assert_eq!(
        hex::encode(keypair.public_key().to_bytes()),
        "8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c"
    );

    let agent_id = keypair.agent_id().unwrap();
    assert_eq!(
        agent_id.to_string(),
        "aid_241gerYcVAvfk7Vc6gFuqBje5CfVJxT1fgzkym5cq2qtgziQLz"
    );

    // Stable across runs and across independent constructions.
    let again = KeyPair::from_seed(SEED).agent_id().unwrap();
    assert_eq!(agent_id, again);
}

#[test]
fn fixed_seed_identity_signature_is_pinned() {
    let keypair = KeyPair::from_seed(SEED);
    let signature = keypair.sign(Domain::Identity, b"hello");
    assert_eq!(
        hex::encode(signature),
        "44e6d522f24852d9976e7a1e80e93fc2640cef4bf6a00cf84c7b1378a28005fe\
         bee24418eb18967ee01457c64920acff8c62cd782ae9f72cbc36ff57304af60a"
    );
}

#[test]
fn pinned_agent_id_parses_back_to_the_key() {
    let parsed = sigaid_types::AgentId::from_str(
        "aid_241gerYcVAvfk7Vc6gFuqBje5CfVJxT1fgzkym5cq2qtgziQLz",
    )
    .unwrap();
    assert_eq!(
        parsed.as_bytes(),
        &KeyPair::from_seed(SEED).public_key().to_bytes()
    );
}

#[test]
fn checksum_layout_matches_definition() {
    // The printable form decodes to pubkey || BLAKE3(pubkey)[..4].
    let keypair = KeyPair::from_seed(SEED);
    let text = keypair.agent_id().unwrap().to_string();
    let decoded = bs58::decode(text.strip_prefix("aid_").unwrap())
        .into_vec()
        .unwrap();
    assert_eq!(decoded.len(), 36);
    let key = &decoded[..32];
    assert_eq!(key, keypair.public_key().to_bytes());
    assert_eq!(&decoded[32..], &blake3::hash(key).as_bytes()[..4]);
}
