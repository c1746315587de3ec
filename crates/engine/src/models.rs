//! Job definitions: what to run and on which items.
//!
//! A job file is plain JSON:
//!
//! ```json
//! {
//!   "name": "scan uploads",
//!   "parameters": { "resource": "file", "operation": "scan" },
//!   "items": [ { "json": {}, "binary": { "data": { "data": "UEsDBA==", "fileName": "a.docx" } } } ],
//!   "continueOnFail": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use nodes::Item;

use crate::EngineError;

/// A complete job definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Node parameter bag, validated when the node is built.
    pub parameters: Value,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Report per-item failures in the output instead of aborting.
    #[serde(default)]
    pub continue_on_fail: bool,
}

impl JobDefinition {
    pub fn from_json(content: &str) -> Result<Self, EngineError> {
        serde_json::from_str(content).map_err(|e| EngineError::InvalidJob(e.to_string()))
    }

    /// Items to run. A job without items runs once on an empty item, which is
    /// what URL, cloud storage and status jobs need.
    pub fn effective_items(&self) -> Vec<Item> {
        if self.items.is_empty() {
            vec![Item::empty()]
        } else {
            self.items.clone()
        }
    }
}
