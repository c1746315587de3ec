//! The `ExecutableNode` trait — the contract every node must fulfil.

use async_trait::async_trait;
use serde_json::Value;

use crate::cloudmersive::CloudmersiveCredentials;
use crate::{Item, NodeError};

/// Shared context passed to every node during execution.
///
/// Defined here (in the nodes crate) so both the engine and individual node
/// implementations can import it without a circular dependency.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// ID of the current execution run.
    pub execution_id: uuid::Uuid,
    /// API credentials used to authenticate outbound requests.
    pub credentials: CloudmersiveCredentials,
}

impl ExecutionContext {
    pub fn new(credentials: CloudmersiveCredentials) -> Self {
        Self {
            execution_id: uuid::Uuid::new_v4(),
            credentials,
        }
    }
}

/// The core node trait.
///
/// A node is invoked once per input item, strictly in order. It returns the
/// JSON payload of the matching output item.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    async fn execute(
        &self,
        item: &Item,
        index: usize,
        ctx: &ExecutionContext,
    ) -> Result<Value, NodeError>;
}
