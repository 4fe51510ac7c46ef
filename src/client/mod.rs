// Client side of the agent service
// The gateway trait is the port; HTTP and in-process adapters implement it

pub mod errors;
pub mod gateway;
pub mod http;
pub mod local;

pub use errors::{GatewayError, GatewayResult};
pub use gateway::AgentGateway;
pub use http::HttpAgentGateway;
pub use local::LocalGateway;
