use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::execution::Execution;
use crate::domain::repositories::ExecutionRepository;

/// In-memory implementation of ExecutionRepository
///
/// Executions are grouped per agent, each group in submission order.
#[derive(Default)]
pub struct InMemoryExecutionRepository {
    executions: RwLock<HashMap<Uuid, Vec<Execution>>>,
}

impl InMemoryExecutionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExecutionRepository for InMemoryExecutionRepository {
    async fn save(&self, execution: &Execution) -> Result<(), String> {
        let mut executions = self.executions.write().await;
        let group = executions.entry(execution.agent_id()).or_default();
        match group.iter_mut().find(|e| e.id() == execution.id()) {
            Some(existing) => *existing = execution.clone(),
            None => group.push(execution.clone()),
        }
        Ok(())
    }

    async fn update(&self, execution: &Execution) -> Result<bool, String> {
        let mut executions = self.executions.write().await;
        let existing = executions
            .get_mut(&execution.agent_id())
            .and_then(|group| group.iter_mut().find(|e| e.id() == execution.id()));
        match existing {
            Some(existing) => {
                *existing = execution.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(
        &self,
        agent_id: Uuid,
        execution_id: Uuid,
    ) -> Result<Option<Execution>, String> {
        let executions = self.executions.read().await;
        Ok(executions
            .get(&agent_id)
            .and_then(|group| group.iter().find(|e| e.id() == execution_id))
            .cloned())
    }

    async fn find_by_agent(&self, agent_id: Uuid) -> Result<Vec<Execution>, String> {
        let executions = self.executions.read().await;
        Ok(executions.get(&agent_id).cloned().unwrap_or_default())
    }

    async fn delete_by_agent(&self, agent_id: Uuid) -> Result<(), String> {
        self.executions.write().await.remove(&agent_id);
        Ok(())
    }
}
