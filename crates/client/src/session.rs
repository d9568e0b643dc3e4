//! The agent session: lease lifecycle, state appends, and proving.
//!
//! A session owns the agent's keypair. Acquiring produces a
//! [`LeaseHandle`] whose background task renews the lease at a fraction of
//! the TTL; losing the lease is surfaced through the handle, never hidden.
//! Release happens on every exit path: explicitly, on scope exit in
//! [`AgentSession::with_lease`], and best-effort from `Drop`.

use crate::backoff::Backoff;
use crate::config::ClientConfig;
use crate::http::{head_from_response, AuthorityClient};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::FutureExt;
use rand::rngs::OsRng;
use rand::RngCore;
use sigaid_crypto::hash;
use sigaid_crypto::sign::Domain;
use sigaid_identity::KeyPair;
use sigaid_types::canonical;
use sigaid_types::chain::ZERO_HASH;
use sigaid_types::error::{ClientError, CryptoError, LeaseError};
use sigaid_types::timestamp;
use sigaid_types::wire::{
    AcquireLeaseRequest, AppendEntryRequest, RegisterAgentRequest, ReleaseLeaseRequest,
    RenewLeaseRequest,
};
use sigaid_types::{
    ActionType, AgentId, Challenge, ProofBundle, StateEntry, StateHead, NONCE_LEN,
};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// An agent process bound to one identity and one Authority.
pub struct AgentSession {
    keypair: KeyPair,
    agent_id: AgentId,
    client: Arc<AuthorityClient>,
    config: ClientConfig,
    last_entry: tokio::sync::Mutex<Option<StateEntry>>,
}

struct LeaseShared {
    token: Mutex<String>,
    expires_at_unix: AtomicI64,
    released: AtomicBool,
    lost_tx: watch::Sender<bool>,
    lost_rx: watch::Receiver<bool>,
    stop_tx: watch::Sender<bool>,
}

/// A held (or formerly held) lease.
pub struct LeaseHandle {
    agent_id: AgentId,
    session_id: String,
    shared: Arc<LeaseShared>,
    client: Arc<AuthorityClient>,
    safety_margin_secs: u64,
    renew_task: Mutex<Option<JoinHandle<()>>>,
}

impl AgentSession {
    /// Creates a session from a keypair and configuration.
    pub fn new(keypair: KeyPair, config: ClientConfig) -> Result<Self, ClientError> {
        let agent_id = keypair.agent_id()?;
        let client = Arc::new(AuthorityClient::new(&config)?);
        Ok(Self {
            keypair,
            agent_id,
            client,
            config,
            last_entry: tokio::sync::Mutex::new(None),
        })
    }

    /// This session's identity.
    pub fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// The underlying wire client.
    pub fn client(&self) -> &AuthorityClient {
        &self.client
    }

    /// Registers the identity with the Authority, idempotently.
    pub async fn register(&self, metadata: Option<serde_json::Value>) -> Result<(), ClientError> {
        self.client
            .ensure_registered(&RegisterAgentRequest {
                agent_id: self.agent_id.to_string(),
                public_key_base64: BASE64.encode(self.keypair.public_key().to_bytes()),
                metadata,
            })
            .await
    }

    fn signed_acquire_request(&self) -> Result<AcquireLeaseRequest, ClientError> {
        let mut session_bytes = [0u8; 8];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut session_bytes)
            .map_err(|_| ClientError::Crypto(CryptoError::Csprng))?;
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|_| ClientError::Crypto(CryptoError::Csprng))?;

        let session_id = format!("sess-{}", hex::encode(session_bytes));
        let now = timestamp::now_unix() as i64;
        let ttl = self.config.lease_ttl_secs;
        let message =
            canonical::lease_request_bytes(&self.agent_id, &session_id, now as u64, &nonce, ttl);
        let signature = self.keypair.sign(Domain::Lease, &message);

        Ok(AcquireLeaseRequest {
            agent_id: self.agent_id.to_string(),
            session_id,
            timestamp: timestamp::unix_to_rfc3339(now),
            nonce_hex: hex::encode(nonce),
            ttl_seconds: ttl,
            signature_hex: hex::encode(signature),
        })
    }

    /// A single acquire attempt. `LeaseHeldByAnother` is surfaced as-is;
    /// there is no hidden retry.
    pub async fn acquire(&self) -> Result<LeaseHandle, ClientError> {
        let request = self.signed_acquire_request()?;
        let grant = self.client.acquire_lease(&request).await?;
        let expires_at =
            timestamp::parse_rfc3339_unix(&grant.expires_at).map_err(ClientError::Transient)?;

        let (lost_tx, lost_rx) = watch::channel(false);
        let (stop_tx, stop_rx) = watch::channel(false);
        let shared = Arc::new(LeaseShared {
            token: Mutex::new(grant.lease_token),
            expires_at_unix: AtomicI64::new(expires_at),
            released: AtomicBool::new(false),
            lost_tx,
            lost_rx,
            stop_tx,
        });

        let handle = LeaseHandle {
            agent_id: self.agent_id,
            session_id: request.session_id.clone(),
            shared: Arc::clone(&shared),
            client: Arc::clone(&self.client),
            safety_margin_secs: self.config.renew_safety_margin_secs,
            renew_task: Mutex::new(None),
        };

        if self.config.auto_renew {
            let task = tokio::spawn(renew_loop(
                Arc::clone(&self.client),
                self.agent_id,
                request.session_id,
                Arc::clone(&shared),
                self.config.clone(),
                stop_rx,
            ));
            if let Ok(mut slot) = handle.renew_task.lock() {
                *slot = Some(task);
            }
        }
        Ok(handle)
    }

    /// Acquires, waiting with full-jitter backoff while another session
    /// holds the lease, up to `deadline` from now.
    pub async fn acquire_wait(&self, deadline: Duration) -> Result<LeaseHandle, ClientError> {
        let give_up = tokio::time::Instant::now() + deadline;
        let mut backoff = Backoff::for_authority();
        loop {
            match self.acquire().await {
                Ok(handle) => return Ok(handle),
                Err(ClientError::Lease(LeaseError::HeldByAnother { .. }))
                | Err(ClientError::Transient(_)) => {
                    let delay = backoff.next_delay();
                    if tokio::time::Instant::now() + delay >= give_up {
                        return Err(ClientError::DeadlineExceeded);
                    }
                    tokio::time::sleep(delay).await;
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Runs `f` under a held lease and releases on every exit path: the
    /// normal return, an error, or a panic inside the block. The caller's
    /// result is propagated unchanged.
    pub async fn with_lease<F, Fut, T>(&self, f: F) -> Result<T, ClientError>
    where
        F: FnOnce(Arc<LeaseHandle>) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let handle = Arc::new(self.acquire().await?);
        let result = std::panic::AssertUnwindSafe(f(Arc::clone(&handle)))
            .catch_unwind()
            .await;
        handle.release().await;
        match result {
            Ok(value) => value,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    /// Builds, signs, and appends a state entry under the held lease.
    /// The payload itself never leaves the process; only its hash does.
    pub async fn append_action(
        &self,
        handle: &LeaseHandle,
        action_type: ActionType,
        summary: &str,
        payload: &[u8],
    ) -> Result<StateHead, ClientError> {
        if handle.is_lost() {
            return Err(ClientError::LeaseLost);
        }

        let mut cache = self.last_entry.lock().await;
        let (sequence, prev_hash) = match cache.as_ref() {
            Some(last) => (last.sequence + 1, last.entry_hash),
            None => match head_from_response(&self.client.state_head(&self.agent_id).await?)? {
                Some(head) => (head.sequence + 1, head.entry_hash),
                None => (0, ZERO_HASH),
            },
        };

        let mut entry = StateEntry {
            agent_id: self.agent_id,
            sequence,
            prev_hash,
            timestamp: timestamp::now_rfc3339(),
            action_type,
            action_summary: summary.to_string(),
            action_data_hash: hash::hash_payload(payload),
            signature: [0u8; 64],
            entry_hash: [0u8; 32],
        };
        entry.signature = self.keypair.sign(Domain::State, &entry.signing_bytes());
        entry.entry_hash = entry.compute_entry_hash();

        let request = AppendEntryRequest {
            entry: entry.clone(),
            lease_token: handle.token(),
        };
        let response = self.client.append_entry(&self.agent_id, &request).await;
        match response {
            Ok(_) => {
                let head = entry.head();
                *cache = Some(entry);
                Ok(head)
            }
            Err(e) => {
                // A fork is fatal for this identity; drop the local cache
                // so nothing is built on top of rejected state.
                if matches!(
                    e,
                    ClientError::Chain(sigaid_types::error::ChainError::Fork { .. })
                ) {
                    *cache = None;
                    log::error!("[Session] fork detected for {}; refusing to proceed", self.agent_id);
                }
                Err(e)
            }
        }
    }

    /// Produces a proof bundle for a verifier challenge under the held
    /// lease and the current state head.
    pub async fn prove(
        &self,
        handle: &LeaseHandle,
        challenge: Challenge,
    ) -> Result<ProofBundle, ClientError> {
        if handle.is_lost() {
            return Err(ClientError::LeaseLost);
        }

        let cached = self.last_entry.lock().await.clone();
        let head_entry = match cached {
            Some(entry) => entry,
            None => self.fetch_head_entry().await?,
        };

        let bundle = sigaid_proof::build_bundle(
            &self.keypair,
            &handle.token(),
            head_entry,
            challenge,
            timestamp::now_rfc3339(),
        )?;
        Ok(bundle)
    }

    async fn fetch_head_entry(&self) -> Result<StateEntry, ClientError> {
        let head = head_from_response(&self.client.state_head(&self.agent_id).await?)?
            .ok_or_else(|| ClientError::Transient("state chain is empty".into()))?;
        let history = self.client.history(&self.agent_id, 1, head.sequence).await?;
        history
            .entries
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Transient("head entry missing from history".into()))
    }
}

impl LeaseHandle {
    /// The identity this lease covers.
    pub fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// The session that holds the lease.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The current token. Renewals swap it in place.
    pub fn token(&self) -> String {
        self.shared
            .token
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// True once the lease cannot be trusted: renewal failed, the expiry
    /// passed the safety margin, or the handle was released. The local
    /// clock is authoritative here; a lease the Authority might still
    /// consider live is treated as lost anyway.
    pub fn is_lost(&self) -> bool {
        if self.shared.released.load(Ordering::SeqCst) || *self.shared.lost_rx.borrow() {
            return true;
        }
        let now = timestamp::now_unix() as i64;
        now > self.shared.expires_at_unix.load(Ordering::SeqCst) - self.safety_margin_secs as i64
    }

    /// A receiver that flips to `true` when the background renewal gives
    /// the lease up.
    pub fn lost_signal(&self) -> watch::Receiver<bool> {
        self.shared.lost_rx.clone()
    }

    /// Releases the lease: stops the renewal task and tells the
    /// Authority, best-effort. Idempotent; network failure does not block
    /// the caller, the Authority will let the lease expire.
    pub async fn release(&self) {
        if self.shared.released.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.shared.stop_tx.send(true);
        let task = self.renew_task.lock().ok().and_then(|mut slot| slot.take());
        if let Some(task) = task {
            task.abort();
        }

        let body = ReleaseLeaseRequest {
            session_id: self.session_id.clone(),
            token: self.token(),
        };
        let release = self.client.release_lease(&self.agent_id, &body);
        match tokio::time::timeout(Duration::from_secs(3), release).await {
            Ok(Ok(())) => log::debug!("[Session] released lease for {}", self.agent_id),
            Ok(Err(e)) => log::warn!("[Session] release failed, lease will expire: {}", e),
            Err(_) => log::warn!("[Session] release timed out, lease will expire"),
        }
    }
}

impl Drop for LeaseHandle {
    fn drop(&mut self) {
        if self.shared.released.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.shared.stop_tx.send(true);
        if let Some(task) = self.renew_task.lock().ok().and_then(|mut slot| slot.take()) {
            task.abort();
        }
        // Fire-and-forget release when a runtime is still around; the
        // Authority's expiry covers the rest.
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let client = Arc::clone(&self.client);
            let agent_id = self.agent_id;
            let body = ReleaseLeaseRequest {
                session_id: self.session_id.clone(),
                token: self.token(),
            };
            runtime.spawn(async move {
                let release = client.release_lease(&agent_id, &body);
                let _ = tokio::time::timeout(Duration::from_secs(3), release).await;
            });
        }
    }
}

/// The background renewal loop: fire at `ttl * renew_fraction`, retry
/// transient failures with capped backoff until the safety margin, then
/// declare the lease lost.
async fn renew_loop(
    client: Arc<AuthorityClient>,
    agent_id: AgentId,
    session_id: String,
    shared: Arc<LeaseShared>,
    config: ClientConfig,
    mut stop_rx: watch::Receiver<bool>,
) {
    let renew_after = Duration::from_secs(config.renew_after_secs());
    loop {
        tokio::select! {
            _ = tokio::time::sleep(renew_after) => {}
            _ = stop_rx.changed() => return,
        }

        let mut backoff = Backoff::for_authority();
        loop {
            if *stop_rx.borrow() {
                return;
            }
            let body = RenewLeaseRequest {
                session_id: session_id.clone(),
                current_token: shared
                    .token
                    .lock()
                    .map(|t| t.clone())
                    .unwrap_or_default(),
                ttl_seconds: config.lease_ttl_secs,
            };
            match client.renew_lease(&agent_id, &body).await {
                Ok(grant) => {
                    let expires = timestamp::parse_rfc3339_unix(&grant.expires_at).unwrap_or(0);
                    if let Ok(mut token) = shared.token.lock() {
                        *token = grant.lease_token;
                    }
                    shared.expires_at_unix.store(expires, Ordering::SeqCst);
                    log::debug!(
                        "[Session] renewed lease for {} until {}",
                        agent_id,
                        grant.expires_at
                    );
                    break;
                }
                Err(ClientError::Transient(reason)) | Err(ClientError::Api { message: reason, status: 500..=599 }) => {
                    // Retry until the safety margin, then give up.
                    let now = timestamp::now_unix() as i64;
                    let give_up = shared.expires_at_unix.load(Ordering::SeqCst)
                        - config.renew_safety_margin_secs as i64;
                    if now >= give_up {
                        log::warn!(
                            "[Session] lease for {} lost after renewal failures: {}",
                            agent_id,
                            reason
                        );
                        let _ = shared.lost_tx.send(true);
                        return;
                    }
                    tokio::time::sleep(backoff.next_delay()).await;
                }
                Err(e) => {
                    // A definitive rejection: the lease is gone.
                    log::warn!("[Session] lease for {} lost: {}", agent_id, e);
                    let _ = shared.lost_tx.send(true);
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_request_is_signed_over_canonical_bytes() {
        let keypair = KeyPair::from_seed([0x91u8; 32]);
        let session = AgentSession::new(keypair, ClientConfig::default()).unwrap();
        let request = session.signed_acquire_request().unwrap();

        assert!(request.session_id.starts_with("sess-"));
        assert_eq!(request.nonce_hex.len(), NONCE_LEN * 2);

        let nonce: [u8; NONCE_LEN] = hex::decode(&request.nonce_hex)
            .unwrap()
            .try_into()
            .unwrap();
        let ts = timestamp::parse_rfc3339_unix(&request.timestamp).unwrap();
        let message = canonical::lease_request_bytes(
            &session.agent_id(),
            &request.session_id,
            ts as u64,
            &nonce,
            request.ttl_seconds,
        );
        let signature: [u8; 64] = hex::decode(&request.signature_hex)
            .unwrap()
            .try_into()
            .unwrap();
        assert!(sigaid_crypto::sign::verify(
            &session.agent_id().verifying_key(),
            Domain::Lease,
            &message,
            &signature
        ));
    }

    #[test]
    fn fresh_nonce_and_session_per_attempt() {
        let keypair = KeyPair::from_seed([0x91u8; 32]);
        let session = AgentSession::new(keypair, ClientConfig::default()).unwrap();
        let a = session.signed_acquire_request().unwrap();
        let b = session.signed_acquire_request().unwrap();
        assert_ne!(a.nonce_hex, b.nonce_hex);
        assert_ne!(a.session_id, b.session_id);
    }
}
