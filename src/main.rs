use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use agent_pipeline::api::{build_router, AppState};
use agent_pipeline::config::Settings;
use agent_pipeline::infrastructure::repositories::{
    PostgresAgentRepository, PostgresExecutionRepository,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let settings = Settings::from_env();

    let state = match &settings.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(settings.database_max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            let agents = PostgresAgentRepository::new(pool.clone());
            let executions = PostgresExecutionRepository::new(pool);
            agents
                .ensure_schema()
                .await
                .expect("Failed to create agents table");
            executions
                .ensure_schema()
                .await
                .expect("Failed to create executions table");

            tracing::info!("Database connected successfully");
            AppState::new(Arc::new(agents), Arc::new(executions), &settings)
        }
        None => AppState::in_memory(&settings),
    };

    let app = build_router(state);

    // Start server
    tracing::info!("Server listening on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
