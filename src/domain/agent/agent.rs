use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{AgentConfig, AgentStatus, AgentType};
use crate::domain::errors::{DomainError, DomainResult};

/// Request to register a new agent
///
/// Doubles as the `POST /api/agents` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterAgent {
    pub name: String,
    pub agent_type: AgentType,
    #[serde(default)]
    pub config: AgentConfig,
}

impl RegisterAgent {
    pub fn new(name: impl Into<String>, agent_type: AgentType, config: AgentConfig) -> Self {
        Self {
            name: name.into(),
            agent_type,
            config,
        }
    }
}

/// Partial update of an agent; absent fields are left untouched
///
/// Doubles as the `PUT /api/agents/:id` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAgent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<AgentConfig>,
}

impl UpdateAgent {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.config.is_none()
    }
}

/// Agent aggregate root
///
/// A named, typed, configurable unit of remote capability.
///
/// # Invariants
/// - Name cannot be empty
/// - `agent_id`, `agent_type` and `created_at` never change
/// - `updated_at` moves on every accepted mutation
///
/// # Example
/// ```
/// use agent_pipeline::domain::agent::{Agent, AgentConfig, AgentStatus, AgentType, RegisterAgent};
///
/// let agent = Agent::new(RegisterAgent::new(
///     "Flight Specialist",
///     AgentType::A2a,
///     AgentConfig::default(),
/// ))
/// .expect("valid agent");
///
/// assert_eq!(agent.name(), "Flight Specialist");
/// assert_eq!(agent.status(), AgentStatus::Created);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    agent_id: Uuid,
    name: String,
    agent_type: AgentType,
    config: AgentConfig,
    status: AgentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Agent {
    /// Creates a new Agent aggregate
    ///
    /// # Returns
    /// * `Ok(Agent)` - New agent with status `created`
    /// * `Err(DomainError::Validation)` - If the name is blank
    pub fn new(request: RegisterAgent) -> DomainResult<Self> {
        validate_name(&request.name)?;

        let now = Utc::now();
        Ok(Self {
            agent_id: Uuid::new_v4(),
            name: request.name,
            agent_type: request.agent_type,
            config: request.config,
            status: AgentStatus::Created,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update
    ///
    /// Validation happens before any field is touched, so a rejected update
    /// leaves the aggregate exactly as it was.
    pub fn apply(&mut self, update: UpdateAgent) -> DomainResult<()> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(config) = update.config {
            self.config = config;
        }
        self.status = AgentStatus::Updated;
        self.updated_at = Utc::now();

        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.agent_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs an Agent from persistence layer data
    ///
    /// Only to be used by repository implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        agent_id: Uuid,
        name: String,
        agent_type: AgentType,
        config: AgentConfig,
        status: AgentStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            agent_id,
            name,
            agent_type,
            config,
            status,
            created_at,
            updated_at,
        }
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("Agent name cannot be empty".to_string()));
    }
    Ok(())
}
