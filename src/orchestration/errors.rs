use thiserror::Error;

use crate::client::GatewayError;
use crate::domain::errors::DomainError;

/// Errors surfaced to whoever drives a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid reference: edge {edge} points at missing node {node}")]
    InvalidReference { edge: String, node: String },

    #[error("Remote dispatch failed: {0}")]
    RemoteDispatch(#[from] GatewayError),

    #[error("{failed} of {total} node executions failed")]
    PartialRunFailure { failed: usize, total: usize },
}

impl From<DomainError> for PipelineError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation(message) => PipelineError::Validation(message),
            DomainError::NotFound(message) => PipelineError::NotFound(message),
            DomainError::InvalidReference { edge, node } => {
                PipelineError::InvalidReference { edge, node }
            }
            other => PipelineError::RemoteDispatch(GatewayError::from(other)),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
