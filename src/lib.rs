//! Agent Pipeline Library
//!
//! An agent registry with an execution service, plus the client side that
//! edits pipelines of agents and dispatches them through a gateway.

pub mod agents;
pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod orchestration;
