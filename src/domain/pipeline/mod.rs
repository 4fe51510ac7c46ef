// Pipeline domain module
// Contains the node/edge graph, its invariants, and demo presets

pub mod edge;
pub mod graph;
pub mod node;
pub mod presets;

pub use edge::PipelineEdge;
pub use graph::PipelineGraph;
pub use node::{NodeData, NodeDataPatch, PipelineNode, Position};
