use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::agent::{Agent, AgentType};
use crate::domain::execution::ExecutionStatus;

/// Canvas coordinate; presentation only
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Denormalized view of an agent carried by a node
///
/// `generic_config` holds the config as JSON text because that is the form a
/// user edits; it is parsed whenever it has to leave the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<AgentType>,
    #[serde(default)]
    pub generic_config: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execution_status: Option<ExecutionStatus>,
}

impl NodeData {
    pub fn from_agent(agent: &Agent) -> Self {
        Self {
            label: agent.name().to_string(),
            agent_id: Some(agent.id()),
            agent_type: Some(agent.agent_type()),
            generic_config: agent.config().to_pretty_string(),
            last_execution_status: None,
        }
    }

    pub fn draft(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Overwrites the registry-owned fields, keeping local run state
    pub fn sync_from_agent(&mut self, agent: &Agent) {
        self.label = agent.name().to_string();
        self.agent_id = Some(agent.id());
        self.agent_type = Some(agent.agent_type());
        self.generic_config = agent.config().to_pretty_string();
    }

    pub fn merge(&mut self, patch: NodeDataPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(generic_config) = patch.generic_config {
            self.generic_config = generic_config;
        }
    }
}

/// Partial edit of a node's data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_config: Option<String>,
}

impl NodeDataPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            generic_config: None,
        }
    }

    pub fn generic_config(text: impl Into<String>) -> Self {
        Self {
            label: None,
            generic_config: Some(text.into()),
        }
    }
}

/// A graph position referencing an agent, or a draft awaiting registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineNode {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    pub data: NodeData,
}

impl PipelineNode {
    pub fn for_agent(agent: &Agent, position: Position) -> Self {
        Self {
            id: agent.id().to_string(),
            position,
            data: NodeData::from_agent(agent),
        }
    }

    pub fn draft(label: impl Into<String>, position: Position) -> Self {
        Self {
            id: format!("draft-{}", Uuid::new_v4()),
            position,
            data: NodeData::draft(label),
        }
    }

    pub fn agent_id(&self) -> Option<Uuid> {
        self.data.agent_id
    }

    pub fn is_draft(&self) -> bool {
        self.data.agent_id.is_none()
    }
}
