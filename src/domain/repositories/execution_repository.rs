use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::execution::Execution;

/// Repository trait for Execution aggregate
#[async_trait]
pub trait ExecutionRepository: Send + Sync {
    /// Save an execution (insert or update)
    async fn save(&self, execution: &Execution) -> Result<(), String>;

    /// Overwrite an execution that is already stored
    ///
    /// Returns false, writing nothing, when the record is gone (for example
    /// because its agent was deleted).
    async fn update(&self, execution: &Execution) -> Result<bool, String>;

    /// Find one execution of an agent
    async fn find_by_id(&self, agent_id: Uuid, execution_id: Uuid)
        -> Result<Option<Execution>, String>;

    /// Find all executions of an agent in submission order
    async fn find_by_agent(&self, agent_id: Uuid) -> Result<Vec<Execution>, String>;

    /// Delete every execution of an agent
    async fn delete_by_agent(&self, agent_id: Uuid) -> Result<(), String>;
}
