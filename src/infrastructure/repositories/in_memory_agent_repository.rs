use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::agent::Agent;
use crate::domain::repositories::AgentRepository;

/// In-memory implementation of AgentRepository
///
/// Keeps agents in creation order. Used when no database is configured and
/// in tests.
#[derive(Default)]
pub struct InMemoryAgentRepository {
    agents: RwLock<Vec<Agent>>,
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn save(&self, agent: &Agent) -> Result<(), String> {
        let mut agents = self.agents.write().await;
        match agents.iter_mut().find(|a| a.id() == agent.id()) {
            Some(existing) => *existing = agent.clone(),
            None => agents.push(agent.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, String> {
        let agents = self.agents.read().await;
        Ok(agents.iter().find(|a| a.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Agent>, String> {
        Ok(self.agents.read().await.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, String> {
        let mut agents = self.agents.write().await;
        let before = agents.len();
        agents.retain(|a| a.id() != id);
        Ok(agents.len() != before)
    }
}
