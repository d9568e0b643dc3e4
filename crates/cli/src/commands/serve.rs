//! `serve`: run an Authority gateway.

use clap::Args;
use sigaid_authority::{Authority, AuthorityConfig};
use sigaid_gateway::{serve, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for `sigaid serve`.
#[derive(Args)]
pub struct ServeArgs {
    /// The listen address.
    #[arg(long, default_value = "127.0.0.1:8420")]
    pub addr: SocketAddr,
    /// Accepted API keys. When none are given the gateway is open.
    #[arg(long = "api-key")]
    pub api_keys: Vec<String>,
    /// Maximum lease TTL in seconds.
    #[arg(long, default_value_t = 3600)]
    pub max_ttl: u32,
}

pub(crate) async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let authority = Arc::new(Authority::new(AuthorityConfig {
        max_ttl_secs: args.max_ttl,
        ..AuthorityConfig::default()
    })?);
    let state = AppState::new(authority, args.api_keys);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = shutdown_tx.send(true);
    });

    serve(args.addr, state, shutdown_rx).await
}
