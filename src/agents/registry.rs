use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::agent::{Agent, RegisterAgent, UpdateAgent};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::{AgentRepository, ExecutionRepository};

/// Agent Registry
///
/// CRUD semantics over the agent store. Every mutation is validated on the
/// aggregate before anything is written, so a rejected call leaves the
/// stored record untouched.
#[derive(Clone)]
pub struct AgentRegistry {
    agents: Arc<dyn AgentRepository>,
    executions: Arc<dyn ExecutionRepository>,
}

impl AgentRegistry {
    pub fn new(agents: Arc<dyn AgentRepository>, executions: Arc<dyn ExecutionRepository>) -> Self {
        Self { agents, executions }
    }

    /// Registers a new agent with status `created`
    pub async fn create(&self, request: RegisterAgent) -> DomainResult<Agent> {
        let agent = Agent::new(request)?;
        self.agents.save(&agent).await.map_err(DomainError::Storage)?;

        info!(
            agent_id = %agent.id(),
            agent_type = %agent.agent_type(),
            name = agent.name(),
            "Agent registered"
        );
        Ok(agent)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Agent> {
        self.agents
            .find_by_id(id)
            .await
            .map_err(DomainError::Storage)?
            .ok_or_else(|| not_found(id))
    }

    /// All agents in creation order
    pub async fn list(&self) -> DomainResult<Vec<Agent>> {
        self.agents.list().await.map_err(DomainError::Storage)
    }

    /// Applies a partial update and bumps `updated_at`
    ///
    /// Read-modify-write without locking: of two concurrent updates to the
    /// same agent, the last save wins and may drop the other's fields.
    pub async fn update(&self, id: Uuid, update: UpdateAgent) -> DomainResult<Agent> {
        let mut agent = self.get(id).await?;
        agent.apply(update)?;
        self.agents.save(&agent).await.map_err(DomainError::Storage)?;

        info!(agent_id = %id, name = agent.name(), "Agent updated");
        Ok(agent)
    }

    /// Removes an agent together with its execution history
    pub async fn delete(&self, id: Uuid) -> DomainResult<Agent> {
        let agent = self.get(id).await?;
        if !self.agents.delete(id).await.map_err(DomainError::Storage)? {
            return Err(not_found(id));
        }
        self.executions
            .delete_by_agent(id)
            .await
            .map_err(DomainError::Storage)?;

        info!(agent_id = %id, "Agent deleted");
        Ok(agent)
    }
}

fn not_found(id: Uuid) -> DomainError {
    DomainError::NotFound(format!("Agent not found: {}", id))
}
