//! `nodes` crate — the `ExecutableNode` trait, the item model and the
//! Cloudmersive Virus Scan node.
//!
//! The engine crate dispatches execution through [`ExecutableNode`], one
//! call per input item.

pub mod cloudmersive;
pub mod error;
pub mod item;
pub mod mock;
pub mod traits;

pub use error::{NodeError, ParameterError};
pub use item::{BinaryData, Item, OutputItem};
pub use traits::{ExecutableNode, ExecutionContext};
