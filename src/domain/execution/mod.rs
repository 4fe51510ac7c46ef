// Execution domain module
// Contains the execution aggregate root and its status lifecycle

#![allow(clippy::module_inception)]

pub mod execution;
pub mod value_objects;

pub use execution::{ExecuteAgent, Execution, ExecutionResult, Parameters};
pub use value_objects::ExecutionStatus;
