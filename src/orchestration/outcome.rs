use serde::Serialize;
use uuid::Uuid;

use super::errors::PipelineError;
use crate::domain::execution::{Execution, ExecutionResult, ExecutionStatus};

/// Terminal result of dispatching one node
///
/// `result` is present iff `status` is Completed; `error` iff Failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionOutcome {
    pub node_id: String,
    pub agent_id: Uuid,
    /// Absent when the node failed before the service accepted it
    pub execution_id: Option<Uuid>,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ExecutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionOutcome {
    /// Outcome of a terminal execution record
    pub fn from_execution(node_id: impl Into<String>, execution: &Execution) -> Self {
        let node_id = node_id.into();
        match execution.status() {
            ExecutionStatus::Completed => Self {
                node_id,
                agent_id: execution.agent_id(),
                execution_id: Some(execution.id()),
                status: ExecutionStatus::Completed,
                result: Some(execution.result().cloned().unwrap_or_default()),
                error: None,
            },
            status => Self::failed(
                node_id,
                execution.agent_id(),
                Some(execution.id()),
                execution
                    .error()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Execution ended as {}", status)),
            ),
        }
    }

    pub fn failed(
        node_id: impl Into<String>,
        agent_id: Uuid,
        execution_id: Option<Uuid>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            agent_id,
            execution_id,
            status: ExecutionStatus::Failed,
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }
}

/// Aggregate result of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// One entry per agent-backed node, in graph order
    pub outcomes: Vec<ExecutionOutcome>,
    /// Ids of draft nodes that were not dispatched
    pub skipped: Vec<String>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    pub fn succeeded_count(&self) -> usize {
        self.total() - self.failed_count()
    }

    pub fn outcome(&self, node_id: &str) -> Option<&ExecutionOutcome> {
        self.outcomes.iter().find(|o| o.node_id == node_id)
    }

    /// Turns any failed node into `PartialRunFailure`
    pub fn into_result(self) -> Result<RunReport, PipelineError> {
        match self.failed_count() {
            0 => Ok(self),
            failed => Err(PipelineError::PartialRunFailure {
                failed,
                total: self.total(),
            }),
        }
    }
}
