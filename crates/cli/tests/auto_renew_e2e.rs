//! Background renewal keeps a short lease alive well past its original
//! TTL, and stops when the handle is released.

use sigaid_cli::testing::TestGateway;
use sigaid_client::{AgentSession, ClientConfig};
use sigaid_identity::KeyPair;
use sigaid_types::ActionType;
use std::time::Duration;

#[tokio::test]
async fn renewal_outlives_the_original_ttl() {
    let gateway = TestGateway::spawn().await.unwrap();
    let config = ClientConfig {
        lease_ttl_secs: 2,
        auto_renew: true,
        renew_safety_margin_secs: 0,
        ..gateway.client_config()
    };
    let session = AgentSession::new(KeyPair::from_seed([0xE8u8; 32]), config).unwrap();
    session.register(None).await.unwrap();

    let handle = session.acquire().await.unwrap();

    // Well past the original 2-second TTL the lease is still usable
    // because the background task renewed it.
    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert!(!handle.is_lost(), "renewal task lost the lease");
    session
        .append_action(&handle, ActionType::Checkpoint, "still here", b"")
        .await
        .unwrap();

    let status = gateway.authority.lease_status(&session.agent_id()).unwrap();
    assert!(status.sequence >= 1, "no renewals recorded");

    handle.release().await;
    assert!(gateway.authority.lease_status(&session.agent_id()).is_none());

    gateway.shutdown().await;
}
