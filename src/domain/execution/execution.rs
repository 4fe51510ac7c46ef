use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::value_objects::ExecutionStatus;
use crate::domain::errors::{DomainError, DomainResult};

/// Input mapping sent with a dispatch
pub type Parameters = Map<String, Value>;

/// Output mapping of a completed dispatch
pub type ExecutionResult = Map<String, Value>;

/// Body of `POST /api/agents/:id/execute`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteAgent {
    #[serde(default)]
    pub parameters: Parameters,
}

/// Execution aggregate root
///
/// The record of one dispatch of one agent.
///
/// # Invariants
/// - Status only moves forward (see [`ExecutionStatus::can_transition_to`])
/// - `started_at` is set once the execution reaches Running
/// - `completed_at` is set once it reaches a terminal status
/// - `result` is present iff status is Completed
/// - `error` is present iff status is Failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    execution_id: Uuid,
    agent_id: Uuid,
    parameters: Parameters,
    status: ExecutionStatus,
    submitted_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    result: Option<ExecutionResult>,
    error: Option<String>,
}

impl Execution {
    /// Creates a pending execution for an agent
    pub fn new(agent_id: Uuid, parameters: Parameters) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            agent_id,
            parameters,
            status: ExecutionStatus::Pending,
            submitted_at: Utc::now(),
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
        }
    }

    /// Pending -> Running
    pub fn start(&mut self) -> DomainResult<()> {
        self.transition(ExecutionStatus::Running)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Running -> Completed, recording the result
    pub fn complete(&mut self, result: ExecutionResult) -> DomainResult<()> {
        self.transition(ExecutionStatus::Completed)?;
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Pending|Running -> Failed, recording the error
    pub fn fail(&mut self, error: impl Into<String>) -> DomainResult<()> {
        self.transition(ExecutionStatus::Failed)?;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, next: ExecutionStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.execution_id
    }

    pub fn agent_id(&self) -> Uuid {
        self.agent_id
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn result(&self) -> Option<&ExecutionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Reconstructs an Execution from persistence layer data
    ///
    /// Only to be used by repository implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        execution_id: Uuid,
        agent_id: Uuid,
        parameters: Parameters,
        status: ExecutionStatus,
        submitted_at: DateTime<Utc>,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        result: Option<ExecutionResult>,
        error: Option<String>,
    ) -> Self {
        Self {
            execution_id,
            agent_id,
            parameters,
            status,
            submitted_at,
            started_at,
            completed_at,
            result,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> Parameters {
        json!({"query": "flights to Lisbon"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn new_execution_is_pending() {
        let agent_id = Uuid::new_v4();
        let execution = Execution::new(agent_id, params());

        assert_eq!(execution.agent_id(), agent_id);
        assert_eq!(execution.status(), ExecutionStatus::Pending);
        assert!(execution.started_at().is_none());
        assert!(execution.completed_at().is_none());
        assert!(execution.result().is_none());
        assert!(execution.error().is_none());
    }

    #[test]
    fn complete_sets_result_and_timestamps() {
        let mut execution = Execution::new(Uuid::new_v4(), params());
        execution.start().unwrap();
        assert!(execution.started_at().is_some());

        let mut result = Map::new();
        result.insert("answer".to_string(), json!(42));
        execution.complete(result.clone()).unwrap();

        assert_eq!(execution.status(), ExecutionStatus::Completed);
        assert_eq!(execution.result(), Some(&result));
        assert!(execution.error().is_none());
        assert!(execution.completed_at().is_some());
    }

    #[test]
    fn fail_from_pending_skips_running() {
        let mut execution = Execution::new(Uuid::new_v4(), params());
        execution.fail("rejected").unwrap();

        assert_eq!(execution.status(), ExecutionStatus::Failed);
        assert_eq!(execution.error(), Some("rejected"));
        assert!(execution.started_at().is_none());
        assert!(execution.result().is_none());
    }

    #[test]
    fn complete_requires_running() {
        let mut execution = Execution::new(Uuid::new_v4(), params());
        let err = execution.complete(Map::new()).unwrap_err();

        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(execution.status(), ExecutionStatus::Pending);
    }

    #[test]
    fn terminal_execution_is_immutable() {
        let mut execution = Execution::new(Uuid::new_v4(), params());
        execution.start().unwrap();
        execution.complete(Map::new()).unwrap();
        let before = execution.clone();

        assert!(execution.fail("late error").is_err());
        assert!(execution.start().is_err());
        assert_eq!(execution, before);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let execution = Execution::new(Uuid::new_v4(), params());
        let value = serde_json::to_value(&execution).unwrap();

        assert_eq!(value["execution_id"], json!(execution.id().to_string()));
        assert_eq!(value["status"], json!("pending"));
        assert_eq!(value["parameters"]["query"], json!("flights to Lisbon"));
        assert!(value["result"].is_null());
    }
}
