use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::execution::{Execution, ExecutionResult, ExecutionStatus, Parameters};
use crate::domain::repositories::ExecutionRepository;

const CREATE_EXECUTIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS executions (
        execution_id UUID PRIMARY KEY,
        agent_id UUID NOT NULL REFERENCES agents (agent_id) ON DELETE CASCADE,
        parameters JSONB NOT NULL DEFAULT '{}'::jsonb,
        status TEXT NOT NULL,
        submitted_at TIMESTAMPTZ NOT NULL,
        started_at TIMESTAMPTZ,
        completed_at TIMESTAMPTZ,
        result JSONB,
        error TEXT
    )
"#;

const CREATE_EXECUTIONS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS executions_agent_id_idx ON executions (agent_id)";

/// PostgreSQL implementation of ExecutionRepository
pub struct PostgresExecutionRepository {
    pool: PgPool,
}

impl PostgresExecutionRepository {
    /// Creates a new PostgresExecutionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `executions` table; `agents` must exist first
    pub async fn ensure_schema(&self) -> Result<(), String> {
        for statement in [CREATE_EXECUTIONS_TABLE, CREATE_EXECUTIONS_INDEX] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| format!("Failed to create executions table: {}", e))?;
        }
        Ok(())
    }
}

fn execution_from_row(row: &PgRow) -> Result<Execution, String> {
    let read = |e: sqlx::Error| format!("Failed to read execution row: {}", e);

    let status: String = row.try_get("status").map_err(read)?;
    let parameters: Json<Parameters> = row.try_get("parameters").map_err(read)?;
    let result: Option<Json<ExecutionResult>> = row.try_get("result").map_err(read)?;
    let submitted_at: DateTime<Utc> = row.try_get("submitted_at").map_err(read)?;
    let started_at: Option<DateTime<Utc>> = row.try_get("started_at").map_err(read)?;
    let completed_at: Option<DateTime<Utc>> = row.try_get("completed_at").map_err(read)?;

    Ok(Execution::from_persistence(
        row.try_get("execution_id").map_err(read)?,
        row.try_get("agent_id").map_err(read)?,
        parameters.0,
        status.parse::<ExecutionStatus>().map_err(|e| e.to_string())?,
        submitted_at,
        started_at,
        completed_at,
        result.map(|r| r.0),
        row.try_get("error").map_err(read)?,
    ))
}

#[async_trait]
impl ExecutionRepository for PostgresExecutionRepository {
    async fn save(&self, execution: &Execution) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO executions (
                execution_id, agent_id, parameters, status,
                submitted_at, started_at, completed_at, result, error
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (execution_id) DO UPDATE SET
                status = EXCLUDED.status,
                started_at = EXCLUDED.started_at,
                completed_at = EXCLUDED.completed_at,
                result = EXCLUDED.result,
                error = EXCLUDED.error
            "#,
        )
        .bind(execution.id())
        .bind(execution.agent_id())
        .bind(Json(execution.parameters()))
        .bind(execution.status().to_string())
        .bind(execution.submitted_at())
        .bind(execution.started_at())
        .bind(execution.completed_at())
        .bind(execution.result().map(Json))
        .bind(execution.error())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save execution: {}", e))?;

        Ok(())
    }

    async fn update(&self, execution: &Execution) -> Result<bool, String> {
        let result = sqlx::query(
            r#"
            UPDATE executions
            SET status = $3, started_at = $4, completed_at = $5, result = $6, error = $7
            WHERE execution_id = $1 AND agent_id = $2
            "#,
        )
        .bind(execution.id())
        .bind(execution.agent_id())
        .bind(execution.status().to_string())
        .bind(execution.started_at())
        .bind(execution.completed_at())
        .bind(execution.result().map(Json))
        .bind(execution.error())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update execution: {}", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(
        &self,
        agent_id: Uuid,
        execution_id: Uuid,
    ) -> Result<Option<Execution>, String> {
        let row = sqlx::query(
            r#"
            SELECT execution_id, agent_id, parameters, status,
                   submitted_at, started_at, completed_at, result, error
            FROM executions
            WHERE agent_id = $1 AND execution_id = $2
            "#,
        )
        .bind(agent_id)
        .bind(execution_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find execution by id: {}", e))?;

        row.as_ref().map(execution_from_row).transpose()
    }

    async fn find_by_agent(&self, agent_id: Uuid) -> Result<Vec<Execution>, String> {
        let rows = sqlx::query(
            r#"
            SELECT execution_id, agent_id, parameters, status,
                   submitted_at, started_at, completed_at, result, error
            FROM executions
            WHERE agent_id = $1
            ORDER BY submitted_at ASC
            "#,
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find executions by agent: {}", e))?;

        rows.iter().map(execution_from_row).collect()
    }

    async fn delete_by_agent(&self, agent_id: Uuid) -> Result<(), String> {
        sqlx::query("DELETE FROM executions WHERE agent_id = $1")
            .bind(agent_id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete executions: {}", e))?;

        Ok(())
    }
}
