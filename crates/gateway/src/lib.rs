#![forbid(unsafe_code)]

//! # SIGAID Gateway
//!
//! The HTTP surface of the Authority: the `/v1` wire protocol plus
//! `/healthz` and `/metrics`. Paths, methods, field names, and status
//! codes are normative for client compatibility.

mod handlers;
mod metrics;
mod telemetry;

pub use telemetry::init_tracing;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use sigaid_authority::Authority;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Upper bound on request bodies. State entries and bundles are small;
/// anything bigger is abuse.
const MAX_BODY_BYTES: usize = 256 * 1024;
/// Concurrent in-flight requests served before shedding.
const MAX_CONCURRENCY: usize = 512;

// --- Error handling ---

/// The uniform error response: a machine-readable tag plus optional
/// detail, under the status code the protocol pins for the case.
pub struct AppError {
    status: StatusCode,
    body: serde_json::Value,
}

impl AppError {
    /// An error with just a tag.
    pub fn tagged(status: StatusCode, tag: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": tag }),
        }
    }

    /// An error with a tag and a human-readable message.
    pub fn with_message(status: StatusCode, tag: &str, message: String) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": tag, "message": message }),
        }
    }

    /// An error with a tag and extra structured fields.
    pub fn with_fields(status: StatusCode, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// 400 with the `invalid_request` tag.
    pub fn bad_request(message: String) -> Self {
        Self::with_message(StatusCode::BAD_REQUEST, "invalid_request", message)
    }

    /// 404 with the `not_found` tag.
    pub fn not_found(message: String) -> Self {
        Self::with_message(StatusCode::NOT_FOUND, "not_found", message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(target: "gateway", "internal error: {}", self.body);
        }
        (self.status, Json(self.body)).into_response()
    }
}

// --- State and construction ---

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    /// The Authority this gateway fronts.
    pub authority: Arc<Authority>,
    /// Accepted API keys. Empty means the gateway is open.
    pub api_keys: Arc<HashSet<String>>,
}

impl AppState {
    /// Creates gateway state over an Authority.
    pub fn new(authority: Arc<Authority>, api_keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            authority,
            api_keys: Arc::new(api_keys.into_iter().collect()),
        }
    }
}

/// Builds the full router.
pub fn router(state: AppState) -> Router {
    metrics::install();

    let protected = Router::new()
        .route("/v1/agents", post(handlers::register_agent))
        .route("/v1/agents/:agent_id", get(handlers::get_agent))
        .route("/v1/leases", post(handlers::acquire_lease))
        .route(
            "/v1/leases/:agent_id",
            get(handlers::lease_status)
                .put(handlers::renew_lease)
                .delete(handlers::release_lease),
        )
        .route(
            "/v1/state/:agent_id",
            get(handlers::state_head).post(handlers::append_entry),
        )
        .route("/v1/state/:agent_id/history", get(handlers::history))
        .route("/v1/state/:agent_id/proof", get(handlers::inclusion_proof))
        .route("/v1/verify", post(handlers::verify))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .merge(protected)
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(metrics::render))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENCY))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Authenticates callers via `X-API-Key` or `Authorization: Bearer`.
async fn require_api_key(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.api_keys.is_empty() {
        return next.run(request).await;
    }

    let supplied = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            request
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string)
        });

    match supplied {
        Some(key) if state.api_keys.contains(&key) => next.run(request).await,
        _ => AppError::tagged(StatusCode::UNAUTHORIZED, "unauthorized").into_response(),
    }
}

/// Serves the gateway until `shutdown` flips to `true`.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(target: "gateway", "listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await?;
    Ok(())
}
