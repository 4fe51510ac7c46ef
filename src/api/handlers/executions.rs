use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::execution::{ExecuteAgent, Execution};

/// Submit an execution of an agent
///
/// POST /api/agents/:id/execute
///
/// Answers 202 with the record as it stands once accepted: usually Running,
/// or already Failed when the agent config was rejected.
pub async fn execute_agent(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ExecuteAgent>, JsonRejection>,
) -> Result<(StatusCode, Json<Execution>), ApiError> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let execution = state.runner.submit(id, req.parameters).await?;

    Ok((StatusCode::ACCEPTED, Json(execution)))
}

/// List executions of an agent
///
/// GET /api/agents/:id/executions
pub async fn list_executions(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<Execution>>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.runner.list(id).await?))
}

/// Get one execution of an agent
///
/// GET /api/agents/:id/executions/:execution_id
pub async fn get_execution(
    State(state): State<AppState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<Execution>, ApiError> {
    let Path((agent_id, execution_id)) = ids?;
    Ok(Json(state.runner.get(agent_id, execution_id).await?))
}
