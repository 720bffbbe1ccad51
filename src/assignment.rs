use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::user::{Agent, UserDirectory};
use crate::error::CoreError;

// ============================================================================
// Delivery Assignment
// ============================================================================
//
// Picking an agent for a new order is a named, swappable strategy rather
// than a hard-coded rule. `FirstAvailable` reproduces the storefront's
// observed behavior (always agent[0], not capacity- or location-aware);
// `RoundRobin` spreads orders across the pool.
//
// ============================================================================

pub trait AssignmentPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Pick an agent from the pool. `None` when the pool is empty.
    fn select<'a>(&self, agents: &'a [Agent]) -> Option<&'a Agent>;
}

/// Always the first agent in enumeration order.
#[derive(Debug, Default)]
pub struct FirstAvailable;

impl AssignmentPolicy for FirstAvailable {
    fn name(&self) -> &'static str {
        "first-available"
    }

    fn select<'a>(&self, agents: &'a [Agent]) -> Option<&'a Agent> {
        agents.first()
    }
}

/// Rotates through the pool across successive assignments.
#[derive(Debug, Default)]
pub struct RoundRobin {
    next: AtomicUsize,
}

impl AssignmentPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn select<'a>(&self, agents: &'a [Agent]) -> Option<&'a Agent> {
        if agents.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % agents.len();
        agents.get(index)
    }
}

/// Sources the delivery pool from the user directory and applies the
/// configured policy.
#[derive(Clone)]
pub struct AgentPool {
    directory: UserDirectory,
    policy: Arc<dyn AssignmentPolicy>,
}

impl AgentPool {
    pub fn new(directory: UserDirectory, policy: Arc<dyn AssignmentPolicy>) -> Self {
        Self { directory, policy }
    }

    /// Pick an agent for a new order.
    pub async fn assign(&self) -> Result<Agent, CoreError> {
        let agents = self.directory.agents().await?;
        match self.policy.select(&agents) {
            Some(agent) => {
                tracing::debug!(
                    agent_id = %agent.id,
                    policy = self.policy.name(),
                    pool_size = agents.len(),
                    "agent selected"
                );
                Ok(agent.clone())
            }
            None => Err(CoreError::NoAgentAvailable),
        }
    }
}
