use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::agent::Agent;

/// Repository trait for Agent aggregate
///
/// Defines the contract for persisting and retrieving agents.
/// Implementations should handle storage-specific details.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Save an agent (insert or update)
    async fn save(&self, agent: &Agent) -> Result<(), String>;

    /// Find an agent by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, String>;

    /// List all agents in creation order
    async fn list(&self) -> Result<Vec<Agent>, String>;

    /// Delete an agent by ID, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, String>;
}
