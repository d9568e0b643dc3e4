//! The raw HTTP client for the Authority wire protocol.
//!
//! One method per endpoint; bodies are the shared wire structs. Responses
//! outside the success path are mapped onto the domain error kinds, so
//! callers match on error variants rather than status codes.

use crate::config::ClientConfig;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::StatusCode;
use sigaid_types::error::{ChainError, ClientError, LeaseError};
use sigaid_types::wire::{
    AcquireLeaseRequest, AgentInfoResponse, AppendEntryRequest, HeadResponse, HistoryResponse,
    InclusionProofResponse, LeaseGrantResponse, LeaseStatusResponse, RegisterAgentRequest,
    ReleaseLeaseRequest, RenewLeaseRequest, VerifyRequest, VerifyResponse,
};
use sigaid_types::{AgentId, StateHead};

/// An HTTP client bound to one Authority endpoint.
pub struct AuthorityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AuthorityClient {
    /// Builds a client from the configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transient(format!("http client build failed: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.authority_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            builder = builder.header("X-API-Key", key);
        }
        builder
    }

    /// `POST /v1/agents`. A 409 means the identity is already registered.
    pub async fn register_agent(&self, body: &RegisterAgentRequest) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/v1/agents")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        match response.status() {
            StatusCode::CREATED => Ok(()),
            status => Err(error_from_response(status, response).await),
        }
    }

    /// `POST /v1/agents`, treating "already registered" as success.
    pub async fn ensure_registered(&self, body: &RegisterAgentRequest) -> Result<(), ClientError> {
        match self.register_agent(body).await {
            Ok(()) => Ok(()),
            Err(ClientError::Api { status: 409, .. }) => Ok(()),
            Err(other) => Err(other),
        }
    }

    /// `GET /v1/agents/{agent_id}`.
    pub async fn get_agent(&self, agent_id: &AgentId) -> Result<AgentInfoResponse, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/v1/agents/{}", agent_id))
            .send()
            .await
            .map_err(transport_error)?;
        decode_ok(response).await
    }

    /// `POST /v1/leases`.
    pub async fn acquire_lease(
        &self,
        body: &AcquireLeaseRequest,
    ) -> Result<LeaseGrantResponse, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/v1/leases")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode_ok(response).await
    }

    /// `PUT /v1/leases/{agent_id}`.
    pub async fn renew_lease(
        &self,
        agent_id: &AgentId,
        body: &RenewLeaseRequest,
    ) -> Result<LeaseGrantResponse, ClientError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/v1/leases/{}", agent_id))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode_ok(response).await
    }

    /// `DELETE /v1/leases/{agent_id}`.
    pub async fn release_lease(
        &self,
        agent_id: &AgentId,
        body: &ReleaseLeaseRequest,
    ) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/v1/leases/{}", agent_id))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(error_from_response(status, response).await),
        }
    }

    /// `GET /v1/leases/{agent_id}`.
    pub async fn lease_status(
        &self,
        agent_id: &AgentId,
    ) -> Result<LeaseStatusResponse, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/v1/leases/{}", agent_id))
            .send()
            .await
            .map_err(transport_error)?;
        decode_ok(response).await
    }

    /// `POST /v1/state/{agent_id}`.
    pub async fn append_entry(
        &self,
        agent_id: &AgentId,
        body: &AppendEntryRequest,
    ) -> Result<HeadResponse, ClientError> {
        let response = self
            .request(reqwest::Method::POST, &format!("/v1/state/{}", agent_id))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        match response.status() {
            StatusCode::CREATED => response
                .json()
                .await
                .map_err(|e| ClientError::Transient(format!("response decode failed: {}", e))),
            status => Err(error_from_response(status, response).await),
        }
    }

    /// `GET /v1/state/{agent_id}`.
    pub async fn state_head(&self, agent_id: &AgentId) -> Result<HeadResponse, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/v1/state/{}", agent_id))
            .send()
            .await
            .map_err(transport_error)?;
        decode_ok(response).await
    }

    /// `GET /v1/state/{agent_id}/history?limit=&offset=`.
    pub async fn history(
        &self,
        agent_id: &AgentId,
        limit: u64,
        offset: u64,
    ) -> Result<HistoryResponse, ClientError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!(
                    "/v1/state/{}/history?limit={}&offset={}",
                    agent_id, limit, offset
                ),
            )
            .send()
            .await
            .map_err(transport_error)?;
        decode_ok(response).await
    }

    /// `GET /v1/state/{agent_id}/proof?sequence=`.
    pub async fn inclusion_proof(
        &self,
        agent_id: &AgentId,
        sequence: u64,
    ) -> Result<InclusionProofResponse, ClientError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/v1/state/{}/proof?sequence={}", agent_id, sequence),
            )
            .send()
            .await
            .map_err(transport_error)?;
        decode_ok(response).await
    }

    /// `POST /v1/verify`.
    pub async fn verify_proof(&self, body: &VerifyRequest) -> Result<VerifyResponse, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/v1/verify")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode_ok(response).await
    }
}

/// Decodes a wire head into the typed form; `None` for a fresh chain.
pub fn head_from_response(head: &HeadResponse) -> Result<Option<StateHead>, ClientError> {
    let Some(sequence) = head.sequence else {
        return Ok(None);
    };
    let raw = BASE64
        .decode(&head.entry_hash_base64)
        .map_err(|e| ClientError::Transient(format!("bad head encoding: {}", e)))?;
    let entry_hash: [u8; 32] = raw
        .try_into()
        .map_err(|_| ClientError::Transient("bad head hash length".into()))?;
    Ok(Some(StateHead {
        sequence,
        entry_hash,
    }))
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::DeadlineExceeded
    } else {
        ClientError::Transient(e.to_string())
    }
}

async fn decode_ok<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| ClientError::Transient(format!("response decode failed: {}", e)))
    } else {
        Err(error_from_response(status, response).await)
    }
}

/// Maps a non-success response onto the domain error kinds using the
/// `error` tag in the body.
async fn error_from_response(status: StatusCode, response: reqwest::Response) -> ClientError {
    let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);
    let tag = body
        .get("error")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let message = body
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or(&tag)
        .to_string();

    if status.is_server_error() {
        return ClientError::Transient(format!("authority {}: {}", status.as_u16(), message));
    }

    match tag.as_str() {
        "lease_held" => ClientError::Lease(LeaseError::HeldByAnother {
            holder_session_id: body
                .get("holder_session_id")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            expires_at: body
                .get("expires_at")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        }),
        "fork" => {
            let current_head = body
                .get("current_head")
                .and_then(|v| serde_json::from_value::<HeadResponse>(v.clone()).ok())
                .and_then(|h| head_from_response(&h).ok().flatten())
                .unwrap_or(StateHead {
                    sequence: 0,
                    entry_hash: [0u8; 32],
                });
            ClientError::Chain(ChainError::Fork { current_head })
        }
        "invalid_signature" => ClientError::Lease(LeaseError::InvalidSignature),
        "clock_skew" => ClientError::Lease(LeaseError::ClockSkew),
        "nonce_replayed" => ClientError::Lease(LeaseError::NonceReplayed),
        "not_registered" => ClientError::Lease(LeaseError::NotRegistered),
        "session_mismatch" => ClientError::Lease(LeaseError::SessionMismatch),
        "lease_expired" => ClientError::Lease(LeaseError::Expired),
        "no_active_lease" => ClientError::Lease(LeaseError::NoActiveLease),
        "bad_signature" => ClientError::Chain(ChainError::BadSignature),
        "permission_denied" => ClientError::Chain(ChainError::PermissionDenied),
        "unauthorized" => ClientError::PermissionDenied,
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
