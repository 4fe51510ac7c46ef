// Agent service modules
//
// Registry of agent definitions plus the machinery that executes them:
// executors per agent type, a reuse pool, and the execution runner.

pub mod errors;
pub mod executor;
pub mod pool;
pub mod registry;
pub mod runner;

// Re-export main types
pub use errors::ExecutorError;
pub use executor::{AgentExecutor, ExecutorFactory};
pub use pool::ExecutorPool;
pub use registry::AgentRegistry;
pub use runner::ExecutionRunner;
