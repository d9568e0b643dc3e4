//! Fork rejection: after a release and re-acquire, an entry that reuses a
//! committed sequence with different lineage is rejected and nothing
//! changes.

use sigaid_cli::testing::TestGateway;
use sigaid_client::{AgentSession, AuthorityClient, ClientConfig};
use sigaid_crypto::sign::Domain;
use sigaid_identity::KeyPair;
use sigaid_types::error::{ChainError, ClientError};
use sigaid_types::timestamp;
use sigaid_types::wire::AppendEntryRequest;
use sigaid_types::{ActionType, StateEntry};

fn config(gateway: &TestGateway) -> ClientConfig {
    ClientConfig {
        lease_ttl_secs: 60,
        auto_renew: false,
        ..gateway.client_config()
    }
}

fn craft_entry(
    keypair: &KeyPair,
    sequence: u64,
    prev_hash: [u8; 32],
    summary: &str,
) -> StateEntry {
    let mut entry = StateEntry {
        agent_id: keypair.agent_id().unwrap(),
        sequence,
        prev_hash,
        timestamp: timestamp::now_rfc3339(),
        action_type: ActionType::Action,
        action_summary: summary.to_string(),
        action_data_hash: sigaid_crypto::hash::hash_payload(summary.as_bytes()),
        signature: [0u8; 64],
        entry_hash: [0u8; 32],
    };
    entry.signature = keypair.sign(Domain::State, &entry.signing_bytes());
    entry.entry_hash = entry.compute_entry_hash();
    entry
}

#[tokio::test]
async fn forked_append_is_rejected_without_state_change() {
    let gateway = TestGateway::spawn().await.unwrap();
    let keypair_seed = [0xB2u8; 32];

    // Client A: appends sequences 0, 1, 2 under its lease, then releases.
    let client_a = AgentSession::new(KeyPair::from_seed(keypair_seed), config(&gateway)).unwrap();
    client_a.register(None).await.unwrap();
    let handle_a = client_a.acquire().await.unwrap();
    for i in 0..3u64 {
        client_a
            .append_action(&handle_a, ActionType::Action, &format!("step {}", i), b"x")
            .await
            .unwrap();
    }
    handle_a.release().await;

    let agent_id = client_a.agent_id();
    let head_before = gateway.authority.chains.head(&agent_id).unwrap();
    assert_eq!(head_before.sequence, 2);

    // Client B: acquires, then crafts an entry at the committed sequence
    // 2 linking to H1 instead of H2.
    let keypair_b = KeyPair::from_seed(keypair_seed);
    let client_b = AgentSession::new(KeyPair::from_seed(keypair_seed), config(&gateway)).unwrap();
    let handle_b = client_b.acquire().await.unwrap();

    let (history, _) = gateway.authority.chains.history(&agent_id, 0, 10);
    let h1 = history[1].entry_hash;
    let forged = craft_entry(&keypair_b, 2, h1, "rewrite of step 2");

    let wire = AuthorityClient::new(&config(&gateway)).unwrap();
    let error = wire
        .append_entry(
            &agent_id,
            &AppendEntryRequest {
                entry: forged,
                lease_token: handle_b.token(),
            },
        )
        .await
        .unwrap_err();

    match error {
        ClientError::Chain(ChainError::Fork { current_head }) => {
            assert_eq!(current_head, head_before);
        }
        other => panic!("expected fork, got {}", other),
    }

    // No state change: same head, same length.
    assert_eq!(gateway.authority.chains.head(&agent_id).unwrap(), head_before);
    let (_, total) = gateway.authority.chains.history(&agent_id, 0, 10);
    assert_eq!(total, 3);

    handle_b.release().await;
    gateway.shutdown().await;
}

#[tokio::test]
async fn wrong_prev_hash_at_next_sequence_is_fork() {
    let gateway = TestGateway::spawn().await.unwrap();
    let keypair = KeyPair::from_seed([0xB3u8; 32]);
    let session = AgentSession::new(KeyPair::from_seed([0xB3u8; 32]), config(&gateway)).unwrap();
    session.register(None).await.unwrap();
    let handle = session.acquire().await.unwrap();
    session
        .append_action(&handle, ActionType::Checkpoint, "genesis", b"")
        .await
        .unwrap();

    let agent_id = session.agent_id();
    let head = gateway.authority.chains.head(&agent_id).unwrap();

    // Sequence head+1 but a fabricated prev_hash.
    let forged = craft_entry(&keypair, head.sequence + 1, [0xEE; 32], "bad link");
    let wire = AuthorityClient::new(&config(&gateway)).unwrap();
    let error = wire
        .append_entry(
            &agent_id,
            &AppendEntryRequest {
                entry: forged,
                lease_token: handle.token(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ClientError::Chain(ChainError::Fork { .. })
    ));

    handle.release().await;
    gateway.shutdown().await;
}
