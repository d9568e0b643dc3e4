//! Proof bundle verification over the wire: a live lease plus a chain of
//! five entries verifies; tampering and released leases do not.

use sigaid_cli::testing::TestGateway;
use sigaid_client::{AgentSession, AuthorityClient, ClientConfig};
use sigaid_identity::KeyPair;
use sigaid_types::timestamp;
use sigaid_types::wire::VerifyRequest;
use sigaid_types::{ActionType, Challenge, VerifyOutcome};

fn config(gateway: &TestGateway) -> ClientConfig {
    ClientConfig {
        lease_ttl_secs: 120,
        auto_renew: false,
        ..gateway.client_config()
    }
}

#[tokio::test]
async fn online_verification_lifecycle() {
    let gateway = TestGateway::spawn().await.unwrap();
    let session = AgentSession::new(KeyPair::from_seed([0xD6u8; 32]), config(&gateway)).unwrap();
    session.register(None).await.unwrap();

    let handle = session.acquire().await.unwrap();
    for i in 0..5u64 {
        session
            .append_action(
                &handle,
                ActionType::Action,
                &format!("step {}", i),
                format!("payload-{}", i).as_bytes(),
            )
            .await
            .unwrap();
    }

    // The service issues a 32-byte challenge; the agent responds.
    let challenge = Challenge::new((0u8..32).collect()).unwrap();
    let bundle = session.prove(&handle, challenge.clone()).await.unwrap();

    let wire = AuthorityClient::new(&config(&gateway)).unwrap();

    // Online verify with require_lease: valid.
    let verdict = wire
        .verify_proof(&VerifyRequest {
            proof: bundle.clone(),
            require_lease: Some(true),
            min_reputation_score: None,
        })
        .await
        .unwrap();
    assert!(verdict.valid, "reason: {:?}", verdict.reason_code);
    assert_eq!(verdict.agent_id, session.agent_id().to_string());

    // One flipped byte in the challenge signature: bad_signature.
    let mut tampered = bundle.clone();
    tampered.challenge_signature[7] ^= 0x01;
    let verdict = wire
        .verify_proof(&VerifyRequest {
            proof: tampered,
            require_lease: Some(true),
            min_reputation_score: None,
        })
        .await
        .unwrap();
    assert!(!verdict.valid);
    assert_eq!(verdict.reason_code.as_deref(), Some("bad_signature"));

    // After release, require_lease fails with no_active_lease...
    handle.release().await;
    let verdict = wire
        .verify_proof(&VerifyRequest {
            proof: bundle.clone(),
            require_lease: Some(true),
            min_reputation_score: None,
        })
        .await
        .unwrap();
    assert!(!verdict.valid);
    assert_eq!(verdict.reason_code.as_deref(), Some("no_active_lease"));

    // ...while offline verification still accepts the bundle itself.
    let offline = sigaid_proof::verify_offline(
        &bundle,
        &challenge,
        timestamp::now_unix() as i64,
        None,
    );
    assert_eq!(offline, VerifyOutcome::ValidOffline);

    gateway.shutdown().await;
}

#[tokio::test]
async fn inclusion_proofs_verify_over_the_wire() {
    let gateway = TestGateway::spawn().await.unwrap();
    let session = AgentSession::new(KeyPair::from_seed([0xD8u8; 32]), config(&gateway)).unwrap();
    session.register(None).await.unwrap();

    let handle = session.acquire().await.unwrap();
    let mut heads = Vec::new();
    for i in 0..6u64 {
        let head = session
            .append_action(&handle, ActionType::Action, &format!("step {}", i), b"x")
            .await
            .unwrap();
        heads.push(head);
    }

    let wire = AuthorityClient::new(&config(&gateway)).unwrap();
    for head in &heads {
        let response = wire
            .inclusion_proof(&session.agent_id(), head.sequence)
            .await
            .unwrap();
        let proof = sigaid_proof::merkle::InclusionProof::from_wire(&response).unwrap();
        assert_eq!(proof.tree_size, 6);
        sigaid_proof::merkle::verify(&head.entry_hash, &proof).unwrap();
        // A different entry hash must not pass against the same proof.
        assert!(sigaid_proof::merkle::verify(&[0xAB; 32], &proof).is_err());
    }

    // Proofs for sequences beyond the chain are refused.
    assert!(wire
        .inclusion_proof(&session.agent_id(), 6)
        .await
        .is_err());

    handle.release().await;
    gateway.shutdown().await;
}

#[tokio::test]
async fn reputation_gate_applies_after_validity() {
    let gateway = TestGateway::spawn().await.unwrap();
    let session = AgentSession::new(KeyPair::from_seed([0xD7u8; 32]), config(&gateway)).unwrap();
    session.register(None).await.unwrap();

    let handle = session.acquire().await.unwrap();
    session
        .append_action(&handle, ActionType::Checkpoint, "genesis", b"")
        .await
        .unwrap();

    let challenge = Challenge::new(vec![9u8; 32]).unwrap();
    let bundle = session.prove(&handle, challenge).await.unwrap();
    let wire = AuthorityClient::new(&config(&gateway)).unwrap();

    let verdict = wire
        .verify_proof(&VerifyRequest {
            proof: bundle.clone(),
            require_lease: Some(true),
            min_reputation_score: Some(1_000_000),
        })
        .await
        .unwrap();
    assert!(!verdict.valid);
    assert_eq!(
        verdict.reason_code.as_deref(),
        Some("insufficient_reputation")
    );

    let verdict = wire
        .verify_proof(&VerifyRequest {
            proof: bundle,
            require_lease: Some(true),
            min_reputation_score: Some(1),
        })
        .await
        .unwrap();
    assert!(verdict.valid);

    handle.release().await;
    gateway.shutdown().await;
}
