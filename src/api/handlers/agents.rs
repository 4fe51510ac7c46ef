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
use crate::domain::agent::{Agent, RegisterAgent, UpdateAgent};

/// Register a new agent
///
/// POST /api/agents
pub async fn create_agent(
    State(state): State<AppState>,
    payload: Result<Json<RegisterAgent>, JsonRejection>,
) -> Result<(StatusCode, Json<Agent>), ApiError> {
    let Json(req) = payload?;
    let agent = state.registry.create(req).await?;

    Ok((StatusCode::CREATED, Json(agent)))
}

/// List all agents
///
/// GET /api/agents
pub async fn list_agents(State(state): State<AppState>) -> Result<Json<Vec<Agent>>, ApiError> {
    Ok(Json(state.registry.list().await?))
}

/// Get an agent by ID
///
/// GET /api/agents/:id
pub async fn get_agent(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Agent>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.registry.get(id).await?))
}

/// Partially update an agent
///
/// PUT /api/agents/:id
pub async fn update_agent(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateAgent>, JsonRejection>,
) -> Result<Json<Agent>, ApiError> {
    let Path(id) = id?;
    let Json(req) = payload?;

    Ok(Json(state.registry.update(id, req).await?))
}

/// Delete an agent and its execution history
///
/// DELETE /api/agents/:id
pub async fn delete_agent(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Agent>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.registry.delete(id).await?))
}
