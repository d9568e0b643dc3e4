//! Gateway-level coverage: API-key enforcement and protocol status codes.

use sigaid_authority::{Authority, AuthorityConfig};
use sigaid_gateway::{serve, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

async fn spawn_gateway(api_keys: Vec<String>) -> (String, watch::Sender<bool>) {
    let authority = Arc::new(Authority::new(AuthorityConfig::default()).unwrap());
    let port = portpicker::pick_unused_port().unwrap();
    let addr: SocketAddr = ([127, 0, 0, 1], port).into();
    let state = AppState::new(authority, api_keys);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(serve(addr, state, shutdown_rx));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            break;
        }
        assert!(tokio::time::Instant::now() < deadline, "gateway never bound");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    (format!("http://{}", addr), shutdown_tx)
}

#[tokio::test]
async fn healthz_is_open_but_v1_requires_a_key() {
    let (base, shutdown) = spawn_gateway(vec!["secret-key".into()]).await;
    let http = reqwest::Client::new();

    // Liveness stays unauthenticated.
    let health = http.get(format!("{}/healthz", base)).send().await.unwrap();
    assert_eq!(health.status(), 200);

    // Protected routes reject missing and wrong keys.
    let agent_id = sigaid_identity::KeyPair::from_seed([0x42; 32])
        .agent_id()
        .unwrap();
    let url = format!("{}/v1/leases/{}", base, agent_id);
    let missing = http.get(&url).send().await.unwrap();
    assert_eq!(missing.status(), 401);
    let wrong = http
        .get(&url)
        .header("X-API-Key", "nope")
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);

    // Both header forms are accepted.
    let with_key = http
        .get(&url)
        .header("X-API-Key", "secret-key")
        .send()
        .await
        .unwrap();
    assert_eq!(with_key.status(), 200);
    let bearer = http
        .get(&url)
        .header("Authorization", "Bearer secret-key")
        .send()
        .await
        .unwrap();
    assert_eq!(bearer.status(), 200);

    let _ = shutdown.send(true);
}

#[tokio::test]
async fn registration_status_codes() {
    let (base, shutdown) = spawn_gateway(Vec::new()).await;
    let http = reqwest::Client::new();

    let keypair = sigaid_identity::KeyPair::from_seed([0x43; 32]);
    let agent_id = keypair.agent_id().unwrap();
    use base64::Engine as _;
    let body = serde_json::json!({
        "agent_id": agent_id.to_string(),
        "public_key_base64":
            base64::engine::general_purpose::STANDARD.encode(keypair.public_key().to_bytes()),
    });

    let url = format!("{}/v1/agents", base);
    let created = http.post(&url).json(&body).send().await.unwrap();
    assert_eq!(created.status(), 201);
    let duplicate = http.post(&url).json(&body).send().await.unwrap();
    assert_eq!(duplicate.status(), 409);

    // A mismatched key is a 400, not a registration.
    let mismatched = serde_json::json!({
        "agent_id": agent_id.to_string(),
        "public_key_base64":
            base64::engine::general_purpose::STANDARD.encode([0u8; 32]),
    });
    let bad = http.post(&url).json(&mismatched).send().await.unwrap();
    assert_eq!(bad.status(), 400);

    // Unknown agents are 404 on lookup.
    let other = sigaid_identity::KeyPair::from_seed([0x44; 32])
        .agent_id()
        .unwrap();
    let lookup = http
        .get(format!("{}/v1/agents/{}", base, other))
        .send()
        .await
        .unwrap();
    assert_eq!(lookup.status(), 404);

    let _ = shutdown.send(true);
}
