use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::pool::{ExecutorPool, PooledExecutor};
use super::registry::AgentRegistry;
use crate::domain::agent::Agent;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::execution::{Execution, Parameters};
use crate::domain::repositories::ExecutionRepository;

/// Accepts execute requests and drives each execution to a terminal status
///
/// `submit` records the execution, moves it to Running and returns it; the
/// executor then runs in a spawned task that completes or fails the record.
/// A config the executor rejects fails the execution straight from Pending.
#[derive(Clone)]
pub struct ExecutionRunner {
    registry: AgentRegistry,
    executions: Arc<dyn ExecutionRepository>,
    pool: Arc<ExecutorPool>,
}

impl ExecutionRunner {
    pub fn new(
        registry: AgentRegistry,
        executions: Arc<dyn ExecutionRepository>,
        pool: Arc<ExecutorPool>,
    ) -> Self {
        Self {
            registry,
            executions,
            pool,
        }
    }

    pub async fn submit(&self, agent_id: Uuid, parameters: Parameters) -> DomainResult<Execution> {
        let agent = self.registry.get(agent_id).await?;
        let mut execution = Execution::new(agent.id(), parameters);
        self.executions
            .save(&execution)
            .await
            .map_err(DomainError::Storage)?;

        // A delete that ran between the lookup and the insert has already
        // cleared this agent's history, so the insert must be undone here.
        if let Err(e) = self.registry.get(agent_id).await {
            self.executions
                .delete_by_agent(agent_id)
                .await
                .map_err(DomainError::Storage)?;
            return Err(e);
        }

        let executor = self.pool.acquire(agent.agent_type());
        if let Err(e) = executor.check(agent.config()) {
            warn!(
                agent_id = %agent_id,
                execution_id = %execution.id(),
                error = %e,
                "Execution rejected"
            );
            execution.fail(e.to_string())?;
            self.store(&execution).await?;
            return Ok(execution);
        }

        execution.start()?;
        self.store(&execution).await?;
        info!(
            agent_id = %agent_id,
            execution_id = %execution.id(),
            executor = executor.kind(),
            "Execution started"
        );

        let runner = self.clone();
        let running = execution.clone();
        tokio::spawn(async move {
            runner.finish(agent, running, executor).await;
        });

        Ok(execution)
    }

    async fn finish(&self, agent: Agent, mut execution: Execution, executor: PooledExecutor) {
        let outcome = executor.execute(agent.config(), execution.parameters()).await;
        drop(executor);

        let transition = match outcome {
            Ok(result) => execution.complete(result),
            Err(e) => {
                warn!(execution_id = %execution.id(), error = %e, "Execution failed");
                execution.fail(e.to_string())
            }
        };
        if let Err(e) = transition {
            error!(execution_id = %execution.id(), error = %e, "Execution left running");
            return;
        }

        match self.store(&execution).await {
            Ok(()) => info!(
                execution_id = %execution.id(),
                status = %execution.status(),
                "Execution finished"
            ),
            Err(DomainError::NotFound(_)) => info!(
                execution_id = %execution.id(),
                agent_id = %execution.agent_id(),
                "Agent deleted while running, execution dropped"
            ),
            Err(e) => error!(execution_id = %execution.id(), error = %e, "Failed to record execution"),
        }
    }

    pub async fn get(&self, agent_id: Uuid, execution_id: Uuid) -> DomainResult<Execution> {
        self.executions
            .find_by_id(agent_id, execution_id)
            .await
            .map_err(DomainError::Storage)?
            .ok_or_else(|| DomainError::NotFound(format!("Execution not found: {}", execution_id)))
    }

    /// Executions of an existing agent, in submission order
    pub async fn list(&self, agent_id: Uuid) -> DomainResult<Vec<Execution>> {
        self.registry.get(agent_id).await?;
        self.executions
            .find_by_agent(agent_id)
            .await
            .map_err(DomainError::Storage)
    }

    /// Writes a transition of an execution that was already inserted
    ///
    /// NotFound when the record was removed along with its agent.
    async fn store(&self, execution: &Execution) -> DomainResult<()> {
        let updated = self
            .executions
            .update(execution)
            .await
            .map_err(DomainError::Storage)?;
        if !updated {
            return Err(DomainError::NotFound(format!(
                "Execution not found: {}",
                execution.id()
            )));
        }
        Ok(())
    }
}
