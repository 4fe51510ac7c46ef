use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::errors::PipelineResult;
use super::outcome::{ExecutionOutcome, RunReport};
use crate::client::{AgentGateway, GatewayError, GatewayResult};
use crate::config::ClientSettings;
use crate::domain::agent::AgentConfig;
use crate::domain::execution::Execution;
use crate::domain::pipeline::{PipelineGraph, PipelineNode};

/// Runs every agent-backed node of a graph through the gateway
///
/// Nodes are dispatched concurrently and independently; a failing node never
/// stops the others. Edges are not consulted.
#[derive(Clone)]
pub struct ExecutionDispatcher {
    gateway: Arc<dyn AgentGateway>,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl ExecutionDispatcher {
    pub fn new(gateway: Arc<dyn AgentGateway>) -> Self {
        Self::with_settings(gateway, &ClientSettings::default())
    }

    pub fn with_settings(gateway: Arc<dyn AgentGateway>, settings: &ClientSettings) -> Self {
        Self {
            gateway,
            poll_interval: settings.poll_interval,
            poll_timeout: settings.poll_timeout,
        }
    }

    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    pub fn gateway(&self) -> &Arc<dyn AgentGateway> {
        &self.gateway
    }

    /// Dispatches the graph and collects one outcome per backed node
    ///
    /// Only a structurally invalid graph is an error; node failures are
    /// reported as failed outcomes.
    pub async fn run(&self, graph: &PipelineGraph) -> PipelineResult<RunReport> {
        graph.validate()?;

        let mut skipped = Vec::new();
        let mut dispatches = Vec::new();
        for node in graph.nodes() {
            match node.agent_id() {
                Some(agent_id) => dispatches.push(self.dispatch(node, agent_id)),
                None => skipped.push(node.id.clone()),
            }
        }

        info!(
            nodes = dispatches.len(),
            skipped = skipped.len(),
            "Dispatching pipeline"
        );
        let outcomes = join_all(dispatches).await;
        let report = RunReport { outcomes, skipped };

        info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            "Pipeline run finished"
        );
        Ok(report)
    }

    async fn dispatch(&self, node: &PipelineNode, agent_id: Uuid) -> ExecutionOutcome {
        let parameters = match AgentConfig::parse(&node.data.generic_config) {
            Ok(config) => config.into_map(),
            Err(e) => {
                warn!(node_id = %node.id, error = %e, "Node config is not a JSON object");
                return ExecutionOutcome::failed(node.id.clone(), agent_id, None, e.to_string());
            }
        };

        let submitted = match self.gateway.execute_agent(agent_id, parameters).await {
            Ok(execution) => execution,
            Err(e) => {
                warn!(node_id = %node.id, error = %e, "Dispatch rejected");
                return ExecutionOutcome::failed(node.id.clone(), agent_id, None, e.to_string());
            }
        };

        let execution_id = submitted.id();
        match self.await_terminal(submitted).await {
            Ok(execution) => {
                let outcome = ExecutionOutcome::from_execution(node.id.clone(), &execution);
                if !outcome.is_success() {
                    warn!(node_id = %node.id, %execution_id, "Node execution failed");
                }
                outcome
            }
            Err(e) => {
                warn!(node_id = %node.id, %execution_id, error = %e, "Lost track of execution");
                ExecutionOutcome::failed(node.id.clone(), agent_id, Some(execution_id), e.to_string())
            }
        }
    }

    /// Polls until the execution is terminal or the poll timeout elapses
    async fn await_terminal(&self, mut execution: Execution) -> GatewayResult<Execution> {
        let deadline = Instant::now() + self.poll_timeout;

        while !execution.status().is_terminal() {
            if Instant::now() >= deadline {
                return Err(GatewayError::Timeout(self.poll_timeout));
            }
            tokio::time::sleep(self.poll_interval).await;

            execution = self
                .gateway
                .get_execution(execution.agent_id(), execution.id())
                .await?;
            debug!(execution_id = %execution.id(), status = %execution.status(), "Polled execution");
        }

        Ok(execution)
    }
}
