//! `engine` crate — job definitions and the per-item execution loop.

pub mod error;
pub mod executor;
pub mod models;

pub use error::EngineError;
pub use executor::{ExecutionResult, ExecutorConfig, ItemExecutor};
pub use models::JobDefinition;

#[cfg(test)]
mod executor_tests;
