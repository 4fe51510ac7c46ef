use std::sync::Arc;

use crate::agents::{AgentRegistry, ExecutionRunner, ExecutorFactory, ExecutorPool};
use crate::config::Settings;
use crate::domain::repositories::{AgentRepository, ExecutionRepository};
use crate::infrastructure::repositories::{InMemoryAgentRepository, InMemoryExecutionRepository};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub registry: AgentRegistry,
    pub runner: ExecutionRunner,
}

impl AppState {
    pub fn new(
        agents: Arc<dyn AgentRepository>,
        executions: Arc<dyn ExecutionRepository>,
        settings: &Settings,
    ) -> Self {
        let pool = ExecutorPool::new(
            ExecutorFactory::new(settings.executor_timeout),
            settings.executor_pool_size,
        );
        let registry = AgentRegistry::new(agents, executions.clone());
        let runner = ExecutionRunner::new(registry.clone(), executions, pool);

        Self { registry, runner }
    }

    /// State backed by in-memory repositories
    pub fn in_memory(settings: &Settings) -> Self {
        Self::new(
            Arc::new(InMemoryAgentRepository::new()),
            Arc::new(InMemoryExecutionRepository::new()),
            settings,
        )
    }
}
