//! The per-agent lease slot.
//!
//! At any instant the Authority holds at most one live lease per agent.
//! Each agent's slot sits behind its own mutex, so the acquire path is a
//! conditional update no two concurrent acquirers can both win, and all
//! lease operations for one agent are linearizable. An expired lease
//! logically transitions to free at the first access after its expiry.

use crate::registry::ReputationEvent;
use crate::{Authority, AuthorityConfig};
use dashmap::DashMap;
use rand::rngs::OsRng;
use rand::RngCore;
use sigaid_crypto::sign::{self, Domain};
use sigaid_crypto::token::{self, TokenKey};
use sigaid_types::canonical;
use sigaid_types::error::LeaseError;
use sigaid_types::lease::{Lease, TokenClaims};
use sigaid_types::timestamp;
use sigaid_types::{AgentId, NONCE_LEN};
use std::sync::{Arc, Mutex};

/// A validated acquire request, decoded from the wire.
#[derive(Debug, Clone)]
pub struct AcquireParams {
    /// The identity to lease.
    pub agent_id: AgentId,
    /// Client-chosen session identifier.
    pub session_id: String,
    /// Client clock at signing time, seconds since the Unix epoch.
    pub timestamp_unix: i64,
    /// Request nonce.
    pub nonce: [u8; NONCE_LEN],
    /// Requested lifetime in seconds.
    pub ttl_seconds: u32,
    /// Signature over the canonical request bytes under `agent.lease.v1`.
    pub signature: [u8; 64],
}

/// A granted or renewed lease, plus its token.
#[derive(Debug, Clone)]
pub struct LeaseGrant {
    /// The minted token.
    pub token: String,
    /// The lease record the token mirrors.
    pub lease: Lease,
}

type Slot = Arc<Mutex<Option<Lease>>>;

/// The keyed lease slots and the nonce replay cache.
pub struct LeaseAuthority {
    config: AuthorityConfig,
    token_key: TokenKey,
    slots: DashMap<AgentId, Slot>,
    // Nonce replay cache keyed by (agent, nonce); values are expiry times.
    nonces: DashMap<(AgentId, [u8; NONCE_LEN]), i64>,
}

impl LeaseAuthority {
    /// Creates the lease service around the Authority's token key.
    pub fn new(config: AuthorityConfig, token_key: TokenKey) -> Self {
        Self {
            config,
            token_key,
            slots: DashMap::new(),
            nonces: DashMap::new(),
        }
    }

    fn slot(&self, agent_id: &AgentId) -> Slot {
        self.slots
            .entry(*agent_id)
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    fn check_ttl(&self, ttl_seconds: u32) -> Result<(), LeaseError> {
        if ttl_seconds == 0 || ttl_seconds > self.config.max_ttl_secs {
            return Err(LeaseError::InvalidRequest(format!(
                "ttl must be 1..={} seconds",
                self.config.max_ttl_secs
            )));
        }
        Ok(())
    }

    fn mint(&self, lease: &Lease) -> Result<String, LeaseError> {
        let mut jti = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut jti)
            .map_err(|_| LeaseError::InvalidRequest("token id generation failed".into()))?;
        let claims = TokenClaims {
            agent_id: lease.agent_id,
            session_id: lease.session_id.clone(),
            iat: timestamp::unix_to_rfc3339(lease.acquired_at_unix),
            exp: timestamp::unix_to_rfc3339(lease.expires_at_unix),
            jti: hex::encode(jti),
            seq: lease.sequence,
        };
        token::seal_claims(&self.token_key, &claims)
            .map_err(|_| LeaseError::InvalidRequest("token minting failed".into()))
    }

    /// Sweeps expired nonce entries when the cache grows past its bound.
    fn prune_nonces(&self, now_unix: i64) {
        if self.nonces.len() > self.config.nonce_cache_max {
            self.nonces.retain(|_, expiry| *expiry > now_unix);
        }
    }

    pub(crate) fn acquire_at(
        &self,
        params: &AcquireParams,
        now_unix: i64,
    ) -> Result<LeaseGrant, LeaseError> {
        self.check_ttl(params.ttl_seconds)?;

        // Signature first: an unauthenticated request learns nothing else.
        let message = canonical::lease_request_bytes(
            &params.agent_id,
            &params.session_id,
            params.timestamp_unix as u64,
            &params.nonce,
            params.ttl_seconds,
        );
        if !sign::verify(
            &params.agent_id.verifying_key(),
            Domain::Lease,
            &message,
            &params.signature,
        ) {
            return Err(LeaseError::InvalidSignature);
        }

        if !timestamp::within_skew(params.timestamp_unix, now_unix, self.config.clock_skew_secs) {
            return Err(LeaseError::ClockSkew);
        }

        // Replay check within the skew window.
        self.prune_nonces(now_unix);
        let nonce_key = (params.agent_id, params.nonce);
        if let Some(expiry) = self.nonces.get(&nonce_key).map(|e| *e) {
            if expiry > now_unix {
                return Err(LeaseError::NonceReplayed);
            }
        }
        self.nonces
            .insert(nonce_key, now_unix + self.config.clock_skew_secs as i64);

        // Conditional update under the slot lock: free or expired wins,
        // held loses.
        let slot = self.slot(&params.agent_id);
        let mut guard = slot.lock().map_err(|_| LeaseError::NoActiveLease)?;
        if let Some(existing) = guard.as_ref() {
            if !existing.is_expired_at(now_unix) {
                return Err(LeaseError::HeldByAnother {
                    holder_session_id: existing.session_id.clone(),
                    expires_at: timestamp::unix_to_rfc3339(existing.expires_at_unix),
                });
            }
        }
        let lease = Lease {
            agent_id: params.agent_id,
            session_id: params.session_id.clone(),
            acquired_at_unix: now_unix,
            expires_at_unix: now_unix + i64::from(params.ttl_seconds),
            sequence: 0,
        };
        let grant = LeaseGrant {
            token: self.mint(&lease)?,
            lease: lease.clone(),
        };
        *guard = Some(lease);
        log::info!(
            "[Lease] granted {} to session {} until {}",
            params.agent_id,
            params.session_id,
            timestamp::unix_to_rfc3339(grant.lease.expires_at_unix)
        );
        Ok(grant)
    }

    pub(crate) fn renew_at(
        &self,
        agent_id: &AgentId,
        session_id: &str,
        current_token: &str,
        ttl_seconds: u32,
        now_unix: i64,
    ) -> Result<LeaseGrant, LeaseError> {
        self.check_ttl(ttl_seconds)?;

        let claims = token::open_claims(&self.token_key, current_token)
            .map_err(|_| LeaseError::SessionMismatch)?;
        if claims.agent_id != *agent_id || claims.session_id != session_id {
            return Err(LeaseError::SessionMismatch);
        }
        if claims.is_expired_at(now_unix) {
            return Err(LeaseError::Expired);
        }

        let slot = self.slot(agent_id);
        let mut guard = slot.lock().map_err(|_| LeaseError::NoActiveLease)?;
        let lease = guard.as_mut().ok_or(LeaseError::Expired)?;
        if lease.is_expired_at(now_unix) {
            *guard = None;
            return Err(LeaseError::Expired);
        }
        if lease.session_id != session_id || lease.sequence != claims.seq {
            return Err(LeaseError::SessionMismatch);
        }

        // Sliding renewal; the expiry never moves backwards.
        lease.expires_at_unix = lease.expires_at_unix.max(now_unix) + i64::from(ttl_seconds);
        lease.sequence += 1;
        let grant = LeaseGrant {
            token: self.mint(lease)?,
            lease: lease.clone(),
        };
        log::debug!(
            "[Lease] renewed {} session {} seq {} until {}",
            agent_id,
            session_id,
            grant.lease.sequence,
            timestamp::unix_to_rfc3339(grant.lease.expires_at_unix)
        );
        Ok(grant)
    }

    pub(crate) fn release_at(
        &self,
        agent_id: &AgentId,
        session_id: &str,
        current_token: &str,
        now_unix: i64,
    ) -> Result<(), LeaseError> {
        let slot = self.slot(agent_id);
        let mut guard = slot.lock().map_err(|_| LeaseError::NoActiveLease)?;

        let Some(lease) = guard.as_ref() else {
            // Releasing a free slot is success: release is idempotent.
            return Ok(());
        };
        if lease.is_expired_at(now_unix) {
            *guard = None;
            return Ok(());
        }

        let claims = token::open_claims(&self.token_key, current_token)
            .map_err(|_| LeaseError::SessionMismatch)?;
        if claims.agent_id != *agent_id
            || claims.session_id != session_id
            || lease.session_id != session_id
        {
            return Err(LeaseError::SessionMismatch);
        }

        *guard = None;
        log::info!("[Lease] released {} by session {}", agent_id, session_id);
        Ok(())
    }

    /// Validates a token for a lease-gated operation. Every failure is
    /// `NoActiveLease`: callers of gated operations never learn more.
    pub(crate) fn validate_token_at(
        &self,
        agent_id: &AgentId,
        token_str: &str,
        now_unix: i64,
    ) -> Result<TokenClaims, LeaseError> {
        let claims = token::open_claims(&self.token_key, token_str)
            .map_err(|_| LeaseError::NoActiveLease)?;
        if claims.agent_id != *agent_id || claims.is_expired_at(now_unix) {
            return Err(LeaseError::NoActiveLease);
        }

        let slot = self.slot(agent_id);
        let mut guard = slot.lock().map_err(|_| LeaseError::NoActiveLease)?;
        let Some(lease) = guard.as_ref() else {
            return Err(LeaseError::NoActiveLease);
        };
        if lease.is_expired_at(now_unix) {
            *guard = None;
            return Err(LeaseError::NoActiveLease);
        }
        if lease.session_id != claims.session_id || lease.sequence != claims.seq {
            return Err(LeaseError::NoActiveLease);
        }
        Ok(claims)
    }

    pub(crate) fn status_at(&self, agent_id: &AgentId, now_unix: i64) -> Option<Lease> {
        let slot = self.slot(agent_id);
        let mut guard = slot.lock().ok()?;
        if let Some(lease) = guard.as_ref() {
            if lease.is_expired_at(now_unix) {
                *guard = None;
                return None;
            }
            return Some(lease.clone());
        }
        None
    }
}

impl Authority {
    /// Handles an acquire request end to end: registration check, request
    /// validation, and the atomic slot update.
    pub fn acquire_lease(&self, params: &AcquireParams) -> Result<LeaseGrant, LeaseError> {
        if !self.registry.contains(&params.agent_id) {
            return Err(LeaseError::NotRegistered);
        }
        let grant = self.leases.acquire_at(params, timestamp::now_unix() as i64)?;
        self.registry
            .record(&params.agent_id, ReputationEvent::LeaseAcquired);
        Ok(grant)
    }

    /// Renews a held lease against its current token.
    pub fn renew_lease(
        &self,
        agent_id: &AgentId,
        session_id: &str,
        current_token: &str,
        ttl_seconds: u32,
    ) -> Result<LeaseGrant, LeaseError> {
        self.leases.renew_at(
            agent_id,
            session_id,
            current_token,
            ttl_seconds,
            timestamp::now_unix() as i64,
        )
    }

    /// Releases a lease. Idempotent.
    pub fn release_lease(
        &self,
        agent_id: &AgentId,
        session_id: &str,
        token: &str,
    ) -> Result<(), LeaseError> {
        self.leases
            .release_at(agent_id, session_id, token, timestamp::now_unix() as i64)
    }

    /// The current lease, when one is live.
    pub fn lease_status(&self, agent_id: &AgentId) -> Option<Lease> {
        self.leases.status_at(agent_id, timestamp::now_unix() as i64)
    }
}
