use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::agent::{Agent, AgentConfig, AgentStatus, AgentType};
use crate::domain::repositories::AgentRepository;

const CREATE_AGENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS agents (
        agent_id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        agent_type TEXT NOT NULL,
        config JSONB NOT NULL DEFAULT '{}'::jsonb,
        status TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
"#;

/// PostgreSQL implementation of AgentRepository
///
/// Enum columns are stored as their wire strings so the schema needs no
/// custom Postgres types.
pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    /// Creates a new PostgresAgentRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `agents` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), String> {
        sqlx::query(CREATE_AGENTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to create agents table: {}", e))?;
        Ok(())
    }
}

fn agent_from_row(row: &PgRow) -> Result<Agent, String> {
    let read = |e: sqlx::Error| format!("Failed to read agent row: {}", e);

    let agent_type: String = row.try_get("agent_type").map_err(read)?;
    let status: String = row.try_get("status").map_err(read)?;
    let config: Json<AgentConfig> = row.try_get("config").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(read)?;

    Ok(Agent::from_persistence(
        row.try_get("agent_id").map_err(read)?,
        row.try_get("name").map_err(read)?,
        agent_type.parse::<AgentType>().map_err(|e| e.to_string())?,
        config.0,
        status.parse::<AgentStatus>().map_err(|e| e.to_string())?,
        created_at,
        updated_at,
    ))
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn save(&self, agent: &Agent) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO agents (
                agent_id, name, agent_type, config, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (agent_id) DO UPDATE SET
                name = EXCLUDED.name,
                config = EXCLUDED.config,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(agent.id())
        .bind(agent.name())
        .bind(agent.agent_type().as_str())
        .bind(Json(agent.config()))
        .bind(agent.status().to_string())
        .bind(agent.created_at())
        .bind(agent.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save agent: {}", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, String> {
        let row = sqlx::query(
            r#"
            SELECT agent_id, name, agent_type, config, status, created_at, updated_at
            FROM agents
            WHERE agent_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find agent by id: {}", e))?;

        row.as_ref().map(agent_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Agent>, String> {
        let rows = sqlx::query(
            r#"
            SELECT agent_id, name, agent_type, config, status, created_at, updated_at
            FROM agents
            ORDER BY created_at ASC, agent_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list agents: {}", e))?;

        rows.iter().map(agent_from_row).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, String> {
        let result = sqlx::query("DELETE FROM agents WHERE agent_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete agent: {}", e))?;

        Ok(result.rows_affected() > 0)
    }
}
