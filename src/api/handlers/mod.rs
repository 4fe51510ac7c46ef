pub mod agents;
pub mod executions;
pub mod health;
