//! The `/v1` endpoint handlers.

use crate::{metrics, AppError, AppState};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sigaid_authority::chain::AppendError;
use sigaid_authority::lease::AcquireParams;
use sigaid_types::error::{ChainError, LeaseError};
use sigaid_types::timestamp;
use sigaid_types::wire::{
    AcquireLeaseRequest, AgentInfoResponse, AppendEntryRequest, HeadResponse, HistoryQuery,
    HistoryResponse, InclusionProofQuery, InclusionProofResponse, LeaseGrantResponse,
    LeaseStatusResponse, RegisterAgentRequest, ReleaseLeaseRequest, RenewLeaseRequest,
    VerifyRequest, VerifyResponse,
};
use sigaid_types::{AgentId, VerifyOutcome, VerifyPolicy, NONCE_LEN};
use std::time::Instant;

const DEFAULT_HISTORY_LIMIT: u64 = 100;

fn parse_agent(s: &str) -> Result<AgentId, AppError> {
    s.parse()
        .map_err(|e| AppError::bad_request(format!("invalid agent id: {}", e)))
}

fn head_body(head: Option<sigaid_types::StateHead>) -> HeadResponse {
    match head {
        Some(head) => HeadResponse {
            sequence: Some(head.sequence),
            entry_hash_base64: BASE64.encode(head.entry_hash),
        },
        None => HeadResponse {
            sequence: None,
            entry_hash_base64: BASE64.encode([0u8; 32]),
        },
    }
}

fn lease_error(e: LeaseError) -> AppError {
    match e {
        LeaseError::HeldByAnother {
            holder_session_id,
            expires_at,
        } => AppError::with_fields(
            StatusCode::CONFLICT,
            serde_json::json!({
                "error": "lease_held",
                "holder_session_id": holder_session_id,
                "expires_at": expires_at,
            }),
        ),
        LeaseError::InvalidSignature => {
            AppError::tagged(StatusCode::UNAUTHORIZED, "invalid_signature")
        }
        LeaseError::ClockSkew => AppError::tagged(StatusCode::BAD_REQUEST, "clock_skew"),
        LeaseError::NonceReplayed => AppError::tagged(StatusCode::CONFLICT, "nonce_replayed"),
        LeaseError::NotRegistered => AppError::tagged(StatusCode::NOT_FOUND, "not_registered"),
        LeaseError::SessionMismatch => AppError::tagged(StatusCode::FORBIDDEN, "session_mismatch"),
        LeaseError::Expired => AppError::tagged(StatusCode::GONE, "lease_expired"),
        LeaseError::NoActiveLease => AppError::tagged(StatusCode::FORBIDDEN, "no_active_lease"),
        LeaseError::InvalidRequest(message) => AppError::bad_request(message),
    }
}

fn chain_error(e: ChainError) -> AppError {
    match e {
        ChainError::Fork { current_head } => AppError::with_fields(
            StatusCode::CONFLICT,
            serde_json::json!({
                "error": "fork",
                "current_head": head_body(Some(current_head)),
            }),
        ),
        ChainError::SequenceMismatch { expected, got } => AppError::with_message(
            StatusCode::CONFLICT,
            "sequence_mismatch",
            format!("expected sequence {}, got {}", expected, got),
        ),
        ChainError::BadSignature | ChainError::BadEntryHash => {
            AppError::tagged(StatusCode::UNAUTHORIZED, "bad_signature")
        }
        ChainError::PermissionDenied => {
            AppError::tagged(StatusCode::FORBIDDEN, "permission_denied")
        }
        other => AppError::bad_request(other.to_string()),
    }
}

pub(crate) async fn register_agent(
    State(state): State<AppState>,
    Json(body): Json<RegisterAgentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let started = Instant::now();
    let agent_id = parse_agent(&body.agent_id)?;

    // The identifier encodes the key; the explicit field must agree.
    let supplied = BASE64
        .decode(&body.public_key_base64)
        .map_err(|e| AppError::bad_request(format!("invalid public key encoding: {}", e)))?;
    if supplied != agent_id.as_bytes() {
        return Err(AppError::bad_request(
            "public key does not match agent id".into(),
        ));
    }

    let result = state.authority.registry.register(agent_id, body.metadata);
    metrics::observe(
        "register",
        if result.is_ok() { "ok" } else { "conflict" },
        started.elapsed().as_secs_f64(),
    );
    match result {
        Ok(()) => Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({ "agent_id": body.agent_id })),
        )),
        Err(_) => Err(AppError::tagged(StatusCode::CONFLICT, "already_registered")),
    }
}

pub(crate) async fn get_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<AgentInfoResponse>, AppError> {
    let agent_id = parse_agent(&agent_id)?;
    let record = state
        .authority
        .registry
        .get(&agent_id)
        .ok_or_else(|| AppError::not_found("agent not registered".into()))?;
    Ok(Json(AgentInfoResponse {
        agent_id: record.agent_id.to_string(),
        public_key_base64: BASE64.encode(record.agent_id.as_bytes()),
        registered_at: record.registered_at,
        reputation: record.reputation,
    }))
}

pub(crate) async fn acquire_lease(
    State(state): State<AppState>,
    Json(body): Json<AcquireLeaseRequest>,
) -> Result<Json<LeaseGrantResponse>, AppError> {
    let started = Instant::now();
    let agent_id = parse_agent(&body.agent_id)?;

    let nonce: [u8; NONCE_LEN] = hex::decode(&body.nonce_hex)
        .map_err(|e| AppError::bad_request(format!("invalid nonce encoding: {}", e)))?
        .try_into()
        .map_err(|_| AppError::bad_request(format!("nonce must be {} bytes", NONCE_LEN)))?;
    let signature: [u8; 64] = hex::decode(&body.signature_hex)
        .map_err(|e| AppError::bad_request(format!("invalid signature encoding: {}", e)))?
        .try_into()
        .map_err(|_| AppError::bad_request("signature must be 64 bytes".into()))?;
    let timestamp_unix = timestamp::parse_rfc3339_unix(&body.timestamp)
        .map_err(AppError::bad_request)?;

    let result = state.authority.acquire_lease(&AcquireParams {
        agent_id,
        session_id: body.session_id,
        timestamp_unix,
        nonce,
        ttl_seconds: body.ttl_seconds,
        signature,
    });
    metrics::observe(
        "acquire",
        if result.is_ok() { "ok" } else { "rejected" },
        started.elapsed().as_secs_f64(),
    );

    let grant = result.map_err(lease_error)?;
    Ok(Json(LeaseGrantResponse {
        lease_token: grant.token,
        acquired_at: timestamp::unix_to_rfc3339(grant.lease.acquired_at_unix),
        expires_at: timestamp::unix_to_rfc3339(grant.lease.expires_at_unix),
        sequence: grant.lease.sequence,
    }))
}

pub(crate) async fn renew_lease(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    Json(body): Json<RenewLeaseRequest>,
) -> Result<Json<LeaseGrantResponse>, AppError> {
    let started = Instant::now();
    let agent_id = parse_agent(&agent_id)?;
    let result = state.authority.renew_lease(
        &agent_id,
        &body.session_id,
        &body.current_token,
        body.ttl_seconds,
    );
    metrics::observe(
        "renew",
        if result.is_ok() { "ok" } else { "rejected" },
        started.elapsed().as_secs_f64(),
    );
    let grant = result.map_err(lease_error)?;
    Ok(Json(LeaseGrantResponse {
        lease_token: grant.token,
        acquired_at: timestamp::unix_to_rfc3339(grant.lease.acquired_at_unix),
        expires_at: timestamp::unix_to_rfc3339(grant.lease.expires_at_unix),
        sequence: grant.lease.sequence,
    }))
}

pub(crate) async fn release_lease(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    Json(body): Json<ReleaseLeaseRequest>,
) -> Result<StatusCode, AppError> {
    let agent_id = parse_agent(&agent_id)?;
    state
        .authority
        .release_lease(&agent_id, &body.session_id, &body.token)
        .map_err(lease_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn lease_status(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<LeaseStatusResponse>, AppError> {
    let agent_id = parse_agent(&agent_id)?;
    Ok(Json(match state.authority.lease_status(&agent_id) {
        Some(lease) => LeaseStatusResponse {
            held: true,
            session_id: Some(lease.session_id),
            expires_at: Some(timestamp::unix_to_rfc3339(lease.expires_at_unix)),
            sequence: Some(lease.sequence),
        },
        None => LeaseStatusResponse {
            held: false,
            session_id: None,
            expires_at: None,
            sequence: None,
        },
    }))
}

pub(crate) async fn append_entry(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    Json(body): Json<AppendEntryRequest>,
) -> Result<(StatusCode, Json<HeadResponse>), AppError> {
    let started = Instant::now();
    let agent_id = parse_agent(&agent_id)?;
    let result = state
        .authority
        .append_entry(&agent_id, body.entry, &body.lease_token);
    metrics::observe(
        "append",
        if result.is_ok() { "ok" } else { "rejected" },
        started.elapsed().as_secs_f64(),
    );
    match result {
        Ok(head) => Ok((StatusCode::CREATED, Json(head_body(Some(head))))),
        Err(AppendError::Lease(e)) => Err(lease_error(e)),
        Err(AppendError::Chain(e)) => Err(chain_error(e)),
    }
}

pub(crate) async fn state_head(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<HeadResponse>, AppError> {
    let agent_id = parse_agent(&agent_id)?;
    Ok(Json(head_body(state.authority.chains.head(&agent_id))))
}

pub(crate) async fn history(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let agent_id = parse_agent(&agent_id)?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let (entries, total) = state.authority.chains.history(&agent_id, offset, limit);
    Ok(Json(HistoryResponse { entries, total }))
}

pub(crate) async fn inclusion_proof(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    Query(query): Query<InclusionProofQuery>,
) -> Result<Json<InclusionProofResponse>, AppError> {
    let agent_id = parse_agent(&agent_id)?;
    let proof = state
        .authority
        .inclusion_proof(&agent_id, query.sequence)
        .map_err(|e| AppError::not_found(e.to_string()))?;
    Ok(Json(InclusionProofResponse {
        sequence: proof.leaf_index,
        root_base64: BASE64.encode(proof.root),
        audit_path: proof
            .audit_path
            .iter()
            .map(|sibling| BASE64.encode(sibling))
            .collect(),
        tree_size: proof.tree_size,
    }))
}

pub(crate) async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let started = Instant::now();
    let bundle = body.proof;
    let agent_id = bundle.agent_id;
    let policy = VerifyPolicy {
        require_lease: body.require_lease.unwrap_or(true),
        ..VerifyPolicy::default()
    };

    // The service's issued challenge never travels to the Authority; the
    // gateway corroborates the bundle against its own embedded challenge,
    // and the service compares challenge bytes itself.
    let expected = bundle.challenge.clone();
    let outcome = state.authority.verify_bundle(&bundle, &expected, &policy);

    let response = match outcome {
        VerifyOutcome::Valid | VerifyOutcome::ValidOffline => {
            // Reputation gating happens after cryptographic validity.
            if let Some(min) = body.min_reputation_score {
                let score = state.authority.registry.reputation_score(&agent_id);
                if score < min {
                    VerifyResponse {
                        valid: false,
                        agent_id: agent_id.to_string(),
                        reason_code: Some("insufficient_reputation".into()),
                    }
                } else {
                    VerifyResponse {
                        valid: true,
                        agent_id: agent_id.to_string(),
                        reason_code: None,
                    }
                }
            } else {
                VerifyResponse {
                    valid: true,
                    agent_id: agent_id.to_string(),
                    reason_code: None,
                }
            }
        }
        VerifyOutcome::Invalid(reason) => VerifyResponse {
            valid: false,
            agent_id: agent_id.to_string(),
            reason_code: Some(reason.as_str().to_string()),
        },
    };
    metrics::observe(
        "verify",
        if response.valid { "valid" } else { "invalid" },
        started.elapsed().as_secs_f64(),
    );
    Ok(Json(response))
}
