//! Clone rejection: two clients with the same identity race for the
//! lease; exactly one wins and the loser learns who holds it.

use sigaid_cli::testing::TestGateway;
use sigaid_client::{AgentSession, ClientConfig};
use sigaid_identity::KeyPair;
use sigaid_types::error::{ClientError, LeaseError};
use sigaid_types::timestamp;

fn session_for(gateway: &TestGateway, ttl: u32) -> AgentSession {
    let config = ClientConfig {
        lease_ttl_secs: ttl,
        auto_renew: false,
        ..gateway.client_config()
    };
    AgentSession::new(KeyPair::from_seed([0xA1; 32]), config).unwrap()
}

#[tokio::test]
async fn concurrent_acquire_has_one_winner() {
    let gateway = TestGateway::spawn().await.unwrap();
    let first = session_for(&gateway, 60);
    let second = session_for(&gateway, 60);
    first.register(None).await.unwrap();

    let before = timestamp::now_unix() as i64;
    let (a, b) = tokio::join!(first.acquire(), second.acquire());
    let after = timestamp::now_unix() as i64;

    // Exactly one success.
    let (winner, loser) = match (a, b) {
        (Ok(handle), Err(e)) => (handle, e),
        (Err(e), Ok(handle)) => (handle, e),
        (Ok(_), Ok(_)) => panic!("both acquirers won"),
        (Err(a), Err(b)) => panic!("both acquirers lost: {} / {}", a, b),
    };

    match loser {
        ClientError::Lease(LeaseError::HeldByAnother {
            holder_session_id,
            expires_at,
        }) => {
            assert_eq!(holder_session_id, winner.session_id());
            let expires = timestamp::parse_rfc3339_unix(&expires_at).unwrap();
            assert!(
                expires >= before + 59 && expires <= after + 61,
                "expiry {} outside the expected window",
                expires
            );
        }
        other => panic!("expected HeldByAnother, got {}", other),
    }

    winner.release().await;
    gateway.shutdown().await;
}

#[tokio::test]
async fn with_lease_releases_on_success_and_panic() {
    let gateway = TestGateway::spawn().await.unwrap();
    let session = session_for(&gateway, 60);
    session.register(None).await.unwrap();
    let agent_id = session.agent_id();

    // Normal path: the lease is free again afterwards.
    session
        .with_lease(|_handle| async move { Ok(()) })
        .await
        .unwrap();
    assert!(gateway.authority.lease_status(&agent_id).is_none());

    // Panic path: the panic propagates but the lease is still released.
    let session_ref = &session;
    let panicked = std::panic::AssertUnwindSafe(async {
        session_ref
            .with_lease(|_handle| async move {
                if true {
                    panic!("boom");
                }
                Ok(())
            })
            .await
    });
    let result = futures_catch(panicked).await;
    assert!(result.is_err(), "panic did not propagate");
    assert!(gateway.authority.lease_status(&agent_id).is_none());

    gateway.shutdown().await;
}

async fn futures_catch<F, T>(future: std::panic::AssertUnwindSafe<F>) -> Result<T, ()>
where
    F: std::future::Future<Output = T>,
{
    use futures::FutureExt;
    future.catch_unwind().await.map_err(|_| ())
}
