//! Bootstrap graphs for demos.
//!
//! Every preset is made of draft nodes; registering the agents behind them is
//! left to the session.

use super::edge::PipelineEdge;
use super::graph::PipelineGraph;
use super::node::{NodeData, PipelineNode, Position};
use crate::domain::errors::{DomainError, DomainResult};

pub const PRESET_NAMES: [&str; 2] = ["travel_planner", "financial_insights"];

/// Looks up a preset by name
pub fn by_name(name: &str) -> DomainResult<PipelineGraph> {
    match name {
        "travel_planner" => travel_planner(),
        "financial_insights" => financial_insights(),
        other => Err(DomainError::NotFound(format!("Preset not found: {}", other))),
    }
}

/// Routing host fanning out to flight and hotel specialists
pub fn travel_planner() -> DomainResult<PipelineGraph> {
    PipelineGraph::from_parts(
        vec![
            draft("draft-routing-host", "Routing Host", 250.0, 0.0),
            draft("draft-flight-specialist", "Flight Specialist", 100.0, 150.0),
            draft("draft-hotel-specialist", "Hotel Specialist", 400.0, 150.0),
        ],
        vec![
            edge("edge-host-flight", "draft-routing-host", "draft-flight-specialist"),
            edge("edge-host-hotel", "draft-routing-host", "draft-hotel-specialist"),
        ],
    )
}

/// Financial host orchestrating analysis, data and shopping agents
pub fn financial_insights() -> DomainResult<PipelineGraph> {
    PipelineGraph::from_parts(
        vec![
            draft("draft-financial-host", "Financial Host", 375.0, 0.0),
            draft("draft-analysis-loop", "Analysis Loop", 0.0, 150.0),
            draft("draft-pg-interface", "Database Interface", 250.0, 150.0),
            draft("draft-fin-interface", "Financial Data Interface", 500.0, 150.0),
            draft("draft-shopping", "Shopping", 750.0, 150.0),
        ],
        vec![
            edge("edge-host-analysis", "draft-financial-host", "draft-analysis-loop"),
            edge("edge-host-pg", "draft-financial-host", "draft-pg-interface"),
            edge("edge-host-fin", "draft-financial-host", "draft-fin-interface"),
            edge("edge-host-shopping", "draft-financial-host", "draft-shopping"),
            edge("edge-analysis-fin", "draft-analysis-loop", "draft-fin-interface"),
            edge("edge-analysis-pg", "draft-analysis-loop", "draft-pg-interface"),
        ],
    )
}

fn draft(id: &str, label: &str, x: f64, y: f64) -> PipelineNode {
    PipelineNode {
        id: id.to_string(),
        position: Position::new(x, y),
        data: NodeData::draft(label),
    }
}

fn edge(id: &str, source: &str, target: &str) -> PipelineEdge {
    PipelineEdge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_preset_is_valid() {
        for name in PRESET_NAMES {
            let graph = by_name(name).unwrap();
            assert!(graph.validate().is_ok(), "{} should validate", name);
            assert!(graph.nodes().iter().all(|n| n.is_draft()));
        }
    }

    #[test]
    fn travel_planner_shape() {
        let graph = travel_planner().unwrap();
        assert_eq!(graph.nodes().len(), 3);
        assert_eq!(graph.edges().len(), 2);
        assert!(graph.edges().iter().all(|e| e.source == "draft-routing-host"));
    }

    #[test]
    fn unknown_preset_is_not_found() {
        assert!(matches!(by_name("crypto"), Err(DomainError::NotFound(_))));
    }
}
