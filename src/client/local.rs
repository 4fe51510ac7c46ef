use async_trait::async_trait;
use uuid::Uuid;

use super::errors::{GatewayError, GatewayResult};
use super::gateway::AgentGateway;
use crate::agents::{AgentRegistry, ExecutionRunner};
use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::agent::{Agent, RegisterAgent, UpdateAgent};
use crate::domain::errors::DomainError;
use crate::domain::execution::{Execution, Parameters};

/// Drives the registry and runner in-process
///
/// Errors carry the status codes the HTTP surface would answer with.
#[derive(Clone)]
pub struct LocalGateway {
    registry: AgentRegistry,
    runner: ExecutionRunner,
}

impl LocalGateway {
    pub fn new(registry: AgentRegistry, runner: ExecutionRunner) -> Self {
        Self { registry, runner }
    }
}

impl From<AppState> for LocalGateway {
    fn from(state: AppState) -> Self {
        Self::new(state.registry, state.runner)
    }
}

impl From<DomainError> for GatewayError {
    fn from(error: DomainError) -> Self {
        let error = ApiError::from(error);
        GatewayError::Status {
            status: error.status.as_u16(),
            detail: error.message,
        }
    }
}

#[async_trait]
impl AgentGateway for LocalGateway {
    async fn create_agent(&self, request: &RegisterAgent) -> GatewayResult<Agent> {
        Ok(self.registry.create(request.clone()).await?)
    }

    async fn list_agents(&self) -> GatewayResult<Vec<Agent>> {
        Ok(self.registry.list().await?)
    }

    async fn get_agent(&self, id: Uuid) -> GatewayResult<Agent> {
        Ok(self.registry.get(id).await?)
    }

    async fn update_agent(&self, id: Uuid, update: &UpdateAgent) -> GatewayResult<Agent> {
        Ok(self.registry.update(id, update.clone()).await?)
    }

    async fn execute_agent(&self, id: Uuid, parameters: Parameters) -> GatewayResult<Execution> {
        Ok(self.runner.submit(id, parameters).await?)
    }

    async fn get_execution(&self, agent_id: Uuid, execution_id: Uuid) -> GatewayResult<Execution> {
        Ok(self.runner.get(agent_id, execution_id).await?)
    }
}
