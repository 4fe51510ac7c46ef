use async_trait::async_trait;
use uuid::Uuid;

use super::errors::GatewayResult;
use crate::domain::agent::{Agent, RegisterAgent, UpdateAgent};
use crate::domain::execution::{Execution, Parameters};

/// Client-side handle to the agent service
///
/// Implemented over HTTP by [`super::HttpAgentGateway`] and in-process by
/// [`super::LocalGateway`].
#[async_trait]
pub trait AgentGateway: Send + Sync {
    async fn create_agent(&self, request: &RegisterAgent) -> GatewayResult<Agent>;

    async fn list_agents(&self) -> GatewayResult<Vec<Agent>>;

    async fn get_agent(&self, id: Uuid) -> GatewayResult<Agent>;

    async fn update_agent(&self, id: Uuid, update: &UpdateAgent) -> GatewayResult<Agent>;

    /// Submits an execution; the returned record may not be terminal yet
    async fn execute_agent(&self, id: Uuid, parameters: Parameters) -> GatewayResult<Execution>;

    async fn get_execution(&self, agent_id: Uuid, execution_id: Uuid) -> GatewayResult<Execution>;
}
