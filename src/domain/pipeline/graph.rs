use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::edge::PipelineEdge;
use super::node::{NodeDataPatch, PipelineNode, Position};
use crate::domain::agent::Agent;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::execution::ExecutionStatus;

/// Pipeline graph: agent nodes plus informational edges
///
/// # Invariants
/// - Node ids are unique
/// - Edge ids are unique
/// - Every edge's `source` and `target` name a node of this graph
///
/// Serialization is the `{nodes, edges}` document used for export and for
/// dispatch. Node and edge order is insertion order, so serializing an
/// unchanged graph twice yields identical output.
///
/// # Example
/// ```
/// use agent_pipeline::domain::pipeline::{PipelineGraph, Position};
///
/// let mut graph = PipelineGraph::new();
/// let a = graph.add_draft_node("Planner", Position::new(0.0, 0.0)).id.clone();
/// let b = graph.add_draft_node("Writer", Position::new(200.0, 0.0)).id.clone();
/// graph.connect(&a, &b).expect("both nodes exist");
///
/// assert!(graph.connect(&a, "missing").is_err());
/// assert_eq!(graph.edges().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineGraph {
    #[serde(default)]
    nodes: Vec<PipelineNode>,
    #[serde(default)]
    edges: Vec<PipelineEdge>,
}

impl PipelineGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from parts, rejecting anything that breaks an invariant
    pub fn from_parts(nodes: Vec<PipelineNode>, edges: Vec<PipelineEdge>) -> DomainResult<Self> {
        let graph = Self { nodes, edges };
        graph.validate()?;
        Ok(graph)
    }

    /// Parses and validates a serialized graph
    pub fn from_json(text: &str) -> DomainResult<Self> {
        let graph: PipelineGraph = serde_json::from_str(text)
            .map_err(|e| DomainError::Validation(format!("Invalid pipeline document: {}", e)))?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn to_json(&self) -> DomainResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Validation(format!("Failed to serialize pipeline: {}", e)))
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> PipelineGraph {
        self.clone()
    }

    pub fn nodes(&self) -> &[PipelineNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[PipelineEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&PipelineNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut PipelineNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    // ===== Nodes =====

    /// Adds a node backed by a registered agent
    ///
    /// The node id is the agent id. Adding the same agent twice re-syncs the
    /// existing node instead of creating a duplicate.
    pub fn add_agent_node(&mut self, agent: &Agent, position: Position) -> &PipelineNode {
        let id = agent.id().to_string();
        let index = match self.node_index(&id) {
            Some(index) => {
                self.nodes[index].data.sync_from_agent(agent);
                index
            }
            None => {
                self.nodes.push(PipelineNode::for_agent(agent, position));
                self.nodes.len() - 1
            }
        };
        &self.nodes[index]
    }

    /// Adds a draft node with a locally generated id
    pub fn add_draft_node(&mut self, label: impl Into<String>, position: Position) -> &PipelineNode {
        self.nodes.push(PipelineNode::draft(label, position));
        let index = self.nodes.len() - 1;
        &self.nodes[index]
    }

    /// Merges a partial edit into a node's local data
    pub fn update_node_data(&mut self, id: &str, patch: NodeDataPatch) -> DomainResult<&PipelineNode> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Node not found: {}", id)))?;
        node.data.merge(patch);
        Ok(node)
    }

    /// Refreshes the node backed by `agent` from the registry record
    ///
    /// Returns false when no node references the agent.
    pub fn sync_node_from_agent(&mut self, agent: &Agent) -> bool {
        let id = agent.id().to_string();
        match self.node_mut(&id) {
            Some(node) => {
                node.data.sync_from_agent(agent);
                true
            }
            None => false,
        }
    }

    /// Records the last observed execution status of a node
    pub fn set_execution_status(&mut self, id: &str, status: ExecutionStatus) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.data.last_execution_status = Some(status);
                true
            }
            None => false,
        }
    }

    /// Removes a node together with every edge touching it
    pub fn remove_node(&mut self, id: &str) -> DomainResult<PipelineNode> {
        let index = self
            .node_index(id)
            .ok_or_else(|| DomainError::NotFound(format!("Node not found: {}", id)))?;
        self.edges.retain(|e| !e.touches(id));
        Ok(self.nodes.remove(index))
    }

    // ===== Edges =====

    /// Connects two existing nodes
    ///
    /// Self-loops are accepted. A missing endpoint leaves the edge set unchanged.
    pub fn connect(&mut self, source: &str, target: &str) -> DomainResult<&PipelineEdge> {
        let edge = PipelineEdge::new(source, target);
        for endpoint in [source, target] {
            if !self.contains_node(endpoint) {
                return Err(DomainError::InvalidReference {
                    edge: edge.id,
                    node: endpoint.to_string(),
                });
            }
        }
        if edge.is_self_loop() {
            tracing::debug!(node_id = %source, "Connecting node to itself");
        }

        self.edges.push(edge);
        let index = self.edges.len() - 1;
        Ok(&self.edges[index])
    }

    pub fn disconnect(&mut self, edge_id: &str) -> DomainResult<PipelineEdge> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or_else(|| DomainError::NotFound(format!("Edge not found: {}", edge_id)))?;
        Ok(self.edges.remove(index))
    }

    // ===== Whole-graph operations =====

    /// Checks every invariant of the graph
    pub fn validate(&self) -> DomainResult<()> {
        let mut node_ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err(DomainError::Validation("Node id cannot be empty".to_string()));
            }
            if !node_ids.insert(node.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "Duplicate node id: {}",
                    node.id
                )));
            }
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "Duplicate edge id: {}",
                    edge.id
                )));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(DomainError::InvalidReference {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Replaces nodes and edges wholesale with a validated graph
    ///
    /// On failure the current graph is kept as is.
    pub fn load(&mut self, preset: PipelineGraph) -> DomainResult<()> {
        preset.validate()?;
        *self = preset;
        Ok(())
    }
}
