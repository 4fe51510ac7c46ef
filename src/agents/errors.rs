use thiserror::Error;

/// Errors that can occur while an executor runs an agent
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Agent misconfigured: {0}")]
    Misconfigured(String),

    #[error("Remote agent error: {0}")]
    Remote(String),

    #[error("Remote agent timed out after {0} seconds")]
    Timeout(u64),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
