//! Test doubles: `MockNode` for the executor and `MockTransport` for nodes.
//!
//! Useful in unit and integration tests where a live API is either
//! unavailable or irrelevant.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::cloudmersive::{CloudmersiveCredentials, ScanRequestDescriptor, ScanTransport};
use crate::{traits::ExecutionContext, ExecutableNode, Item, NodeError};

/// Behaviour injected into `MockNode` at construction time.
pub enum MockBehaviour {
    /// Return a specific JSON value for every item.
    ReturnValue(Value),
    /// Fail every item with the given error.
    Fail(NodeError),
    /// Fail only the listed item indices; echo the item otherwise.
    FailAt(HashSet<usize>, NodeError),
}

/// A mock node that records every item index it receives and returns a
/// programmer-specified result.
pub struct MockNode {
    /// Label used in test assertions.
    pub name: String,
    /// What the node will do when `execute` is called.
    pub behaviour: MockBehaviour,
    /// All item indices seen by this node (in call order).
    pub calls: Arc<Mutex<Vec<usize>>>,
}

impl MockNode {
    fn with_behaviour(name: impl Into<String>, behaviour: MockBehaviour) -> Self {
        Self {
            name: name.into(),
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always succeeds with the given value.
    pub fn returning(name: impl Into<String>, value: Value) -> Self {
        Self::with_behaviour(name, MockBehaviour::ReturnValue(value))
    }

    /// Create a mock that fails every item.
    pub fn failing(name: impl Into<String>, error: NodeError) -> Self {
        Self::with_behaviour(name, MockBehaviour::Fail(error))
    }

    /// Create a mock that fails only at the given item indices.
    pub fn failing_at(
        name: impl Into<String>,
        indices: impl IntoIterator<Item = usize>,
        error: NodeError,
    ) -> Self {
        Self::with_behaviour(
            name,
            MockBehaviour::FailAt(indices.into_iter().collect(), error),
        )
    }

    /// Number of times this node has been executed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Item indices in call order.
    pub fn seen(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutableNode for MockNode {
    async fn execute(
        &self,
        item: &Item,
        index: usize,
        _ctx: &ExecutionContext,
    ) -> Result<Value, NodeError> {
        self.calls.lock().unwrap().push(index);

        match &self.behaviour {
            MockBehaviour::ReturnValue(v) => {
                // Tag the output with the node name so tests can trace it.
                let mut out = json!({ "node": self.name });
                if let (Some(out_obj), Some(v_obj)) = (out.as_object_mut(), v.as_object()) {
                    for (k, val) in v_obj {
                        out_obj.insert(k.clone(), val.clone());
                    }
                }
                Ok(out)
            }
            MockBehaviour::Fail(err) => Err(err.clone()),
            MockBehaviour::FailAt(indices, err) if indices.contains(&index) => Err(err.clone()),
            MockBehaviour::FailAt(..) => Ok(json!({ "node": self.name, "echo": item.json })),
        }
    }
}

/// A transport that records descriptors instead of sending them.
pub struct MockTransport {
    response: Result<Value, NodeError>,
    requests: Mutex<Vec<ScanRequestDescriptor>>,
}

impl MockTransport {
    /// Answer every request with `value`.
    pub fn returning(value: Value) -> Self {
        Self { response: Ok(value), requests: Mutex::new(Vec::new()) }
    }

    /// Fail every request with `error`.
    pub fn failing(error: NodeError) -> Self {
        Self { response: Err(error), requests: Mutex::new(Vec::new()) }
    }

    /// Descriptors received so far, in order.
    pub fn requests(&self) -> Vec<ScanRequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanTransport for MockTransport {
    async fn send(
        &self,
        _credentials: &CloudmersiveCredentials,
        request: &ScanRequestDescriptor,
    ) -> Result<Value, NodeError> {
        self.requests.lock().unwrap().push(request.clone());
        self.response.clone()
    }
}
