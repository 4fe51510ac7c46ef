// Agent domain module
// Contains the agent aggregate root and its value objects

#![allow(clippy::module_inception)]

pub mod agent;
pub mod value_objects;

pub use agent::{Agent, RegisterAgent, UpdateAgent};
pub use value_objects::{AgentConfig, AgentStatus, AgentType};
