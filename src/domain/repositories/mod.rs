pub mod agent_repository;
pub mod execution_repository;

pub use agent_repository::AgentRepository;
pub use execution_repository::ExecutionRepository;
