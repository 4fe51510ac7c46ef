use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{DomainError, DomainResult};

/// Kind of remote capability an agent stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentType {
    /// Model Context Protocol tool server
    #[serde(rename = "mcp")]
    Mcp,
    /// Agent-to-agent protocol peer
    #[serde(rename = "a2a")]
    A2a,
    /// Tool-calling agent built on an agent development kit
    #[serde(rename = "adk")]
    Adk,
    /// Orchestrating host for the financial assistant
    #[serde(rename = "financial_host")]
    FinancialHost,
    /// User-defined agent served in-process
    #[serde(rename = "custom_agent_type")]
    Custom,
}

impl AgentType {
    pub const ALL: [AgentType; 5] = [
        AgentType::Mcp,
        AgentType::A2a,
        AgentType::Adk,
        AgentType::FinancialHost,
        AgentType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Mcp => "mcp",
            AgentType::A2a => "a2a",
            AgentType::Adk => "adk",
            AgentType::FinancialHost => "financial_host",
            AgentType::Custom => "custom_agent_type",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("Unknown agent type: {}", s)))
    }
}

/// Lifecycle status of an agent
///
/// Statuses are assigned by the process that owns the agent; no transition
/// table is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Created,
    Ready,
    Running,
    Stopped,
    Error,
    Updated,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Created => write!(f, "created"),
            AgentStatus::Ready => write!(f, "ready"),
            AgentStatus::Running => write!(f, "running"),
            AgentStatus::Stopped => write!(f, "stopped"),
            AgentStatus::Error => write!(f, "error"),
            AgentStatus::Updated => write!(f, "updated"),
        }
    }
}

impl FromStr for AgentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(AgentStatus::Created),
            "ready" => Ok(AgentStatus::Ready),
            "running" => Ok(AgentStatus::Running),
            "stopped" => Ok(AgentStatus::Stopped),
            "error" => Ok(AgentStatus::Error),
            "updated" => Ok(AgentStatus::Updated),
            other => Err(DomainError::Validation(format!(
                "Unknown agent status: {}",
                other
            ))),
        }
    }
}

/// Agent configuration value object
///
/// A string-keyed map of arbitrary JSON values. The only rule enforced is
/// well-formedness: the text form must parse as a JSON object.
///
/// # Example
/// ```
/// use agent_pipeline::domain::agent::AgentConfig;
///
/// let config = AgentConfig::parse(r#"{"url": "http://localhost:8001"}"#).expect("valid config");
/// assert_eq!(config.get("url").and_then(|v| v.as_str()), Some("http://localhost:8001"));
/// assert!(AgentConfig::parse("{not json").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentConfig(Map<String, Value>);

impl AgentConfig {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parses config text; blank text is an empty config
    pub fn parse(text: &str) -> DomainResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(text)
            .map_err(|e| DomainError::Validation(format!("Config is not valid JSON: {}", e)))?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DomainError::Validation(format!(
                "Config must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Pretty JSON text, the form edited in pipeline nodes
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<Map<String, Value>> for AgentConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
