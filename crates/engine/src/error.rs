//! Engine-level error types.

use nodes::NodeError;
use thiserror::Error;

/// Errors produced by the item executor and job loading.
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Job errors ------

    /// The job definition could not be parsed.
    #[error("invalid job definition: {0}")]
    InvalidJob(String),

    // ------ Execution errors ------

    /// An item failed and continue-on-fail is off; the whole run is aborted.
    #[error("item {index} failed: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: NodeError,
    },
}
