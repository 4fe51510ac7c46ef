// Orchestration layer
// Client-side pipeline editing and dispatch over an AgentGateway

pub mod dispatcher;
pub mod errors;
pub mod outcome;
pub mod session;

pub use dispatcher::ExecutionDispatcher;
pub use errors::{PipelineError, PipelineResult};
pub use outcome::{ExecutionOutcome, RunReport};
pub use session::PipelineSession;
