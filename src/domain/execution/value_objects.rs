use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Represents the lifecycle status of an execution
///
/// # Status Transitions
/// ```text
/// Pending -> Running -> Completed
///    |          └-----> Failed
///    └----------------> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Accepted, not yet handed to an executor
    Pending,
    /// Executor is working on it
    Running,
    /// Finished with a result
    Completed,
    /// Finished with an error
    Failed,
}

impl ExecutionStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Valid Transitions
    /// - Pending -> Running
    /// - Pending -> Failed (rejected before starting)
    /// - Running -> Completed
    /// - Running -> Failed
    ///
    /// # Example
    /// ```
    /// use agent_pipeline::domain::execution::ExecutionStatus;
    ///
    /// assert!(ExecutionStatus::Pending.can_transition_to(ExecutionStatus::Running));
    /// assert!(!ExecutionStatus::Completed.can_transition_to(ExecutionStatus::Running));
    /// ```
    pub fn can_transition_to(&self, next: ExecutionStatus) -> bool {
        use ExecutionStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Pending, Failed) | (Running, Completed) | (Running, Failed)
        )
    }

    /// Completed and Failed are final
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Failed)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Pending => write!(f, "pending"),
            ExecutionStatus::Running => write!(f, "running"),
            ExecutionStatus::Completed => write!(f, "completed"),
            ExecutionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ExecutionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ExecutionStatus::Pending),
            "running" => Ok(ExecutionStatus::Running),
            "completed" => Ok(ExecutionStatus::Completed),
            "failed" => Ok(ExecutionStatus::Failed),
            other => Err(DomainError::Validation(format!(
                "Unknown execution status: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transition_pending_to_running() {
        assert!(ExecutionStatus::Pending.can_transition_to(ExecutionStatus::Running));
    }

    #[test]
    fn valid_transition_pending_to_failed() {
        assert!(ExecutionStatus::Pending.can_transition_to(ExecutionStatus::Failed));
    }

    #[test]
    fn valid_transition_running_to_terminal() {
        assert!(ExecutionStatus::Running.can_transition_to(ExecutionStatus::Completed));
        assert!(ExecutionStatus::Running.can_transition_to(ExecutionStatus::Failed));
    }

    #[test]
    fn invalid_transition_pending_to_completed() {
        assert!(!ExecutionStatus::Pending.can_transition_to(ExecutionStatus::Completed));
    }

    #[test]
    fn terminal_states_are_final() {
        use ExecutionStatus::*;
        for terminal in [Completed, Failed] {
            for next in [Pending, Running, Completed, Failed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn no_backward_transition() {
        assert!(!ExecutionStatus::Running.can_transition_to(ExecutionStatus::Pending));
        assert!(!ExecutionStatus::Running.can_transition_to(ExecutionStatus::Running));
    }

    #[test]
    fn status_display() {
        assert_eq!(ExecutionStatus::Pending.to_string(), "pending");
        assert_eq!(ExecutionStatus::Running.to_string(), "running");
        assert_eq!(ExecutionStatus::Completed.to_string(), "completed");
        assert_eq!(ExecutionStatus::Failed.to_string(), "failed");
        assert_eq!("failed".parse::<ExecutionStatus>().unwrap(), ExecutionStatus::Failed);
    }
}
