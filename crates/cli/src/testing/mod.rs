//! In-process gateway harness for end-to-end tests.
//!
//! Spawns the real axum gateway over a fresh Authority on an unused local
//! port, waits for readiness, and hands out client configurations bound
//! to it.

use anyhow::Context;
use sigaid_authority::{Authority, AuthorityConfig};
use sigaid_client::ClientConfig;
use sigaid_gateway::{serve, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A running in-process gateway.
pub struct TestGateway {
    /// Base URL the gateway listens on.
    pub base_url: String,
    /// Direct access to the Authority behind the gateway, for assertions
    /// that bypass the wire.
    pub authority: Arc<Authority>,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl TestGateway {
    /// Spawns a gateway over a fresh Authority with default limits.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(AuthorityConfig::default()).await
    }

    /// Spawns a gateway over a fresh Authority with custom limits.
    pub async fn spawn_with(config: AuthorityConfig) -> anyhow::Result<Self> {
        let authority = Arc::new(Authority::new(config)?);
        let port = portpicker::pick_unused_port().context("no free port")?;
        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        let state = AppState::new(Arc::clone(&authority), std::iter::empty::<String>());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(serve(addr, state, shutdown_rx));

        // Wait for the listener to come up.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            match tokio::net::TcpStream::connect(addr).await {
                Ok(_) => break,
                Err(_) if tokio::time::Instant::now() < deadline => {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                Err(e) => anyhow::bail!("gateway did not come up: {}", e),
            }
        }

        Ok(Self {
            base_url: format!("http://{}", addr),
            authority,
            shutdown_tx,
            task,
        })
    }

    /// A client configuration pointed at this gateway, tuned for fast
    /// tests.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            authority_url: self.base_url.clone(),
            api_key: None,
            request_timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        }
    }

    /// Stops the gateway and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}
