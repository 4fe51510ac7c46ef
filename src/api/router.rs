use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{agents, executions, health};
use super::state::AppState;

/// Builds the service router with tracing and permissive CORS
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        // Agent routes
        .route("/api/agents", post(agents::create_agent).get(agents::list_agents))
        .route(
            "/api/agents/:id",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
        // Execution routes
        .route("/api/agents/:id/execute", post(executions::execute_agent))
        .route("/api/agents/:id/executions", get(executions::list_executions))
        .route(
            "/api/agents/:id/executions/:execution_id",
            get(executions::get_execution),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
