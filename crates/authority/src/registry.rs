//! The agent registry.
//!
//! Registration binds an AgentID to its public key (which the identifier
//! itself encodes) plus optional metadata, and opens the reputation
//! counters the verification policy can consult.

use dashmap::DashMap;
use sigaid_types::error::IdentityError;
use sigaid_types::timestamp;
use sigaid_types::wire::ReputationCounters;
use sigaid_types::AgentId;

/// One registered identity.
#[derive(Debug, Clone)]
pub struct AgentRecord {
    /// The registered identity. The decoded key is the registered public
    /// key; mid-chain key rotation is unsupported.
    pub agent_id: AgentId,
    /// Registration time, RFC 3339 UTC.
    pub registered_at: String,
    /// Opaque caller-supplied metadata.
    pub metadata: Option<serde_json::Value>,
    /// Reputation counters.
    pub reputation: ReputationCounters,
}

/// The keyed set of registered agents.
pub struct AgentRegistry {
    agents: DashMap<AgentId, AgentRecord>,
}

impl AgentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            agents: DashMap::new(),
        }
    }

    /// Registers an identity. Fails when it is already present.
    pub fn register(
        &self,
        agent_id: AgentId,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), IdentityError> {
        match self.agents.entry(agent_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(IdentityError::InvalidAgentId(
                "agent already registered".into(),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(AgentRecord {
                    agent_id,
                    registered_at: timestamp::now_rfc3339(),
                    metadata,
                    reputation: ReputationCounters::default(),
                });
                log::info!("[Registry] registered {}", agent_id);
                Ok(())
            }
        }
    }

    /// True when the identity is registered.
    pub fn contains(&self, agent_id: &AgentId) -> bool {
        self.agents.contains_key(agent_id)
    }

    /// A snapshot of the record, when present.
    pub fn get(&self, agent_id: &AgentId) -> Option<AgentRecord> {
        self.agents.get(agent_id).map(|r| r.clone())
    }

    /// The agent's current reputation score, zero when unregistered.
    pub fn reputation_score(&self, agent_id: &AgentId) -> u64 {
        self.agents
            .get(agent_id)
            .map(|r| r.reputation.score())
            .unwrap_or(0)
    }

    /// Bumps a reputation counter.
    pub fn record(&self, agent_id: &AgentId, event: ReputationEvent) {
        if let Some(mut record) = self.agents.get_mut(agent_id) {
            match event {
                ReputationEvent::ProofVerified => record.reputation.proofs_verified += 1,
                ReputationEvent::EntryAppended => record.reputation.entries_appended += 1,
                ReputationEvent::LeaseAcquired => record.reputation.leases_acquired += 1,
            }
        }
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The events that move reputation counters.
#[derive(Debug, Clone, Copy)]
pub enum ReputationEvent {
    /// A proof bundle verified against this agent.
    ProofVerified,
    /// A state entry was appended.
    EntryAppended,
    /// A lease was acquired.
    LeaseAcquired,
}
