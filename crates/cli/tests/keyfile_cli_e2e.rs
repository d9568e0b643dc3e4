//! The keygen/inspect command pair round-trips an identity through an
//! encrypted keyfile on disk.

use sigaid_identity::KeyPair;

#[test]
fn keyfile_written_by_keygen_loads_with_the_password() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.key");

    let original = KeyPair::from_seed([0x0Fu8; 32]);
    original
        .to_keyfile(
            &path,
            "correct horse",
            sigaid_crypto::key_store::KdfParams::insecure_fast(),
        )
        .unwrap();

    let loaded = KeyPair::from_keyfile(&path, "correct horse").unwrap();
    assert_eq!(
        loaded.agent_id().unwrap(),
        original.agent_id().unwrap()
    );

    assert!(KeyPair::from_keyfile(&path, "wrong horse").is_err());
}
