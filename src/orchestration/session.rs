use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::dispatcher::ExecutionDispatcher;
use super::errors::{PipelineError, PipelineResult};
use super::outcome::RunReport;
use crate::client::AgentGateway;
use crate::domain::agent::{Agent, AgentConfig, RegisterAgent, UpdateAgent};
use crate::domain::pipeline::{
    presets, NodeDataPatch, PipelineEdge, PipelineGraph, PipelineNode, Position,
};

/// An editable pipeline kept in step with the agent registry
///
/// Registry mutations go through the gateway first; node data is re-synced
/// from the agent the service returns.
pub struct PipelineSession {
    gateway: Arc<dyn AgentGateway>,
    dispatcher: ExecutionDispatcher,
    graph: PipelineGraph,
}

impl PipelineSession {
    pub fn new(gateway: Arc<dyn AgentGateway>) -> Self {
        let dispatcher = ExecutionDispatcher::new(gateway.clone());
        Self::with_dispatcher(dispatcher)
    }

    pub fn with_dispatcher(dispatcher: ExecutionDispatcher) -> Self {
        Self {
            gateway: dispatcher.gateway().clone(),
            dispatcher,
            graph: PipelineGraph::new(),
        }
    }

    pub fn graph(&self) -> &PipelineGraph {
        &self.graph
    }

    // ===== Nodes =====

    /// Registers a new agent, then adds a node for it
    ///
    /// Nothing is added when registration fails.
    pub async fn create_agent_node(
        &mut self,
        request: RegisterAgent,
        position: Position,
    ) -> PipelineResult<&PipelineNode> {
        let agent = self.gateway.create_agent(&request).await?;
        info!(agent_id = %agent.id(), name = %agent.name(), "Agent node created");
        Ok(self.graph.add_agent_node(&agent, position))
    }

    pub fn add_agent_node(&mut self, agent: &Agent, position: Position) -> &PipelineNode {
        self.graph.add_agent_node(agent, position)
    }

    pub fn add_draft_node(&mut self, label: impl Into<String>, position: Position) -> &PipelineNode {
        self.graph.add_draft_node(label, position)
    }

    /// Edits a node locally, then persists the edit when the node is backed
    ///
    /// The local edit is kept even when persisting fails. A label becomes the
    /// agent name; generic config text must parse to a JSON object.
    pub async fn update_node_data(
        &mut self,
        node_id: &str,
        patch: NodeDataPatch,
    ) -> PipelineResult<&PipelineNode> {
        let agent_id = self.graph.update_node_data(node_id, patch.clone())?.agent_id();

        if let Some(agent_id) = agent_id {
            let update = UpdateAgent {
                name: patch.label,
                config: patch
                    .generic_config
                    .as_deref()
                    .map(AgentConfig::parse)
                    .transpose()?,
            };
            if !update.is_empty() {
                let agent = self.gateway.update_agent(agent_id, &update).await?;
                self.sync_from_agent(&agent);
            }
        }

        self.node(node_id)
    }

    /// Re-syncs the node backed by `agent`; false when there is none
    pub fn sync_from_agent(&mut self, agent: &Agent) -> bool {
        self.graph.sync_node_from_agent(agent)
    }

    pub fn remove_node(&mut self, node_id: &str) -> PipelineResult<PipelineNode> {
        Ok(self.graph.remove_node(node_id)?)
    }

    /// Refreshes every backed node from the registry
    ///
    /// Returns the ids of nodes whose agent no longer exists.
    pub async fn reconcile_with_registry(&mut self) -> PipelineResult<Vec<String>> {
        let agents: HashMap<Uuid, Agent> = self
            .gateway
            .list_agents()
            .await?
            .into_iter()
            .map(|agent| (agent.id(), agent))
            .collect();

        let mut stale = Vec::new();
        let backed: Vec<(String, Uuid)> = self
            .graph
            .nodes()
            .iter()
            .filter_map(|node| node.agent_id().map(|id| (node.id.clone(), id)))
            .collect();
        for (node_id, agent_id) in backed {
            match agents.get(&agent_id) {
                Some(agent) => {
                    self.graph.sync_node_from_agent(agent);
                }
                None => stale.push(node_id),
            }
        }

        if !stale.is_empty() {
            warn!(count = stale.len(), "Nodes reference agents missing from the registry");
        }
        Ok(stale)
    }

    // ===== Edges =====

    pub fn connect(&mut self, source: &str, target: &str) -> PipelineResult<&PipelineEdge> {
        Ok(self.graph.connect(source, target)?)
    }

    pub fn disconnect(&mut self, edge_id: &str) -> PipelineResult<PipelineEdge> {
        Ok(self.graph.disconnect(edge_id)?)
    }

    // ===== Whole graph =====

    /// Current `{nodes, edges}` state
    pub fn serialize(&self) -> PipelineGraph {
        self.graph.snapshot()
    }

    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(self.graph.to_json()?)
    }

    /// Replaces the graph; a graph that fails validation leaves it untouched
    pub fn load_preset(&mut self, preset: PipelineGraph) -> PipelineResult<()> {
        self.graph.load(preset)?;
        Ok(())
    }

    pub fn load_named_preset(&mut self, name: &str) -> PipelineResult<()> {
        self.load_preset(presets::by_name(name)?)
    }

    /// Dispatches a snapshot of the graph and records each node's status
    pub async fn run(&mut self) -> PipelineResult<RunReport> {
        let snapshot = self.graph.snapshot();
        let report = self.dispatcher.run(&snapshot).await?;

        for outcome in &report.outcomes {
            self.graph
                .set_execution_status(&outcome.node_id, outcome.status);
        }
        Ok(report)
    }

    fn node(&self, node_id: &str) -> PipelineResult<&PipelineNode> {
        self.graph
            .node(node_id)
            .ok_or_else(|| PipelineError::NotFound(format!("Node not found: {}", node_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AppState;
    use crate::client::LocalGateway;
    use crate::config::Settings;
    use crate::domain::agent::AgentType;
    use crate::domain::execution::ExecutionStatus;
    use serde_json::json;
    use std::time::Duration;

    fn session() -> PipelineSession {
        let gateway: Arc<dyn AgentGateway> =
            Arc::new(LocalGateway::from(AppState::in_memory(&Settings::default())));
        let dispatcher = ExecutionDispatcher::new(gateway)
            .with_polling(Duration::from_millis(5), Duration::from_secs(5));
        PipelineSession::with_dispatcher(dispatcher)
    }

    fn register(name: &str) -> RegisterAgent {
        RegisterAgent::new(name, AgentType::Adk, AgentConfig::default())
    }

    #[tokio::test]
    async fn failed_registration_adds_no_node() {
        let mut session = session();
        let err = session
            .create_agent_node(register(" "), Position::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::RemoteDispatch(_)));
        assert!(session.graph().nodes().is_empty());
    }

    #[tokio::test]
    async fn label_edit_renames_agent() {
        let mut session = session();
        let node_id = session
            .create_agent_node(register("Planner"), Position::default())
            .await
            .unwrap()
            .id
            .clone();

        let node = session
            .update_node_data(&node_id, NodeDataPatch::label("Trip Planner"))
            .await
            .unwrap();
        assert_eq!(node.data.label, "Trip Planner");

        let agents = session.gateway.list_agents().await.unwrap();
        assert_eq!(agents[0].name(), "Trip Planner");
    }

    #[tokio::test]
    async fn config_edit_is_normalized_from_the_registry() {
        let mut session = session();
        let node_id = session
            .create_agent_node(register("Planner"), Position::default())
            .await
            .unwrap()
            .id
            .clone();

        let node = session
            .update_node_data(&node_id, NodeDataPatch::generic_config(r#"{"model":"small"}"#))
            .await
            .unwrap()
            .clone();

        let agent = &session.gateway.list_agents().await.unwrap()[0];
        assert_eq!(agent.config().get("model"), Some(&json!("small")));
        assert_eq!(node.data.generic_config, agent.config().to_pretty_string());
    }

    #[tokio::test]
    async fn unparseable_config_keeps_local_edit_only() {
        let mut session = session();
        let node_id = session
            .create_agent_node(register("Planner"), Position::default())
            .await
            .unwrap()
            .id
            .clone();
        let before = session.gateway.list_agents().await.unwrap()[0].clone();

        let err = session
            .update_node_data(&node_id, NodeDataPatch::generic_config("[1, 2"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));

        assert_eq!(session.graph().node(&node_id).unwrap().data.generic_config, "[1, 2");
        let after = session.gateway.list_agents().await.unwrap()[0].clone();
        assert_eq!(after.updated_at(), before.updated_at());
        assert_eq!(after.config(), before.config());
    }

    #[tokio::test]
    async fn draft_edits_stay_local() {
        let mut session = session();
        let id = session.add_draft_node("Draft", Position::default()).id.clone();

        let node = session
            .update_node_data(&id, NodeDataPatch::generic_config("not json"))
            .await
            .unwrap();
        assert_eq!(node.data.generic_config, "not json");
    }

    #[tokio::test]
    async fn run_records_node_status() {
        let mut session = session();
        let node_id = session
            .create_agent_node(register("Planner"), Position::default())
            .await
            .unwrap()
            .id
            .clone();
        session.add_draft_node("Draft", Position::default());

        let report = session.run().await.unwrap();

        assert_eq!(report.total(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(
            session.graph().node(&node_id).unwrap().data.last_execution_status,
            Some(ExecutionStatus::Completed)
        );
    }

    #[tokio::test]
    async fn reconcile_reports_stale_nodes() {
        let mut session = session();
        let live = session
            .create_agent_node(register("Live"), Position::default())
            .await
            .unwrap()
            .id
            .clone();
        let ghost = Agent::new(register("Ghost")).unwrap();
        let ghost_id = session.add_agent_node(&ghost, Position::default()).id.clone();

        let stale = session.reconcile_with_registry().await.unwrap();

        assert_eq!(stale, vec![ghost_id]);
        assert!(session.graph().contains_node(&live));
    }

    #[test]
    fn bad_connect_and_preset_leave_graph_alone() {
        let mut session = session();
        session.load_named_preset("travel_planner").unwrap();
        let before = session.serialize();

        assert!(matches!(
            session.connect("draft-routing-host", "nowhere"),
            Err(PipelineError::InvalidReference { .. })
        ));
        let json = r#"{"nodes":[],"edges":[{"id":"e","source":"x","target":"y"}]}"#;
        let broken: PipelineGraph = serde_json::from_str(json).unwrap();
        assert!(session.load_preset(broken).is_err());

        assert_eq!(session.serialize(), before);
        assert!(session.load_named_preset("unknown").is_err());
    }
}
