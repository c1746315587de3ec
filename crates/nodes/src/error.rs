//! Node-level error types.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Errors returned by a node's `execute` method.
///
/// None of these are retried: a failed item is either reported in the output
/// (continue-on-fail) or aborts the whole run.
#[derive(Debug, Error, Clone)]
pub enum NodeError {
    /// The node's parameters or the item's data could not be turned into a
    /// request.
    #[error("invalid parameters: {0}")]
    Parameter(#[from] ParameterError),

    /// The API answered with a non-2xx status.
    #[error("API request failed with status {status}: {message}")]
    Api {
        status: u16,
        message: String,
        /// Parsed response body, when the server sent JSON.
        body: Option<Value>,
    },

    /// The request never produced a response (connect, TLS, timeout, ...).
    /// `source` holds the HTTP client error when there is one; it sits behind
    /// an `Arc` so the error stays `Clone`.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Arc<reqwest::Error>>,
    },

    /// A 2xx response whose body was not JSON.
    #[error("invalid response body: {0}")]
    InvalidResponse(String),
}

impl NodeError {
    /// A transport failure with no underlying client error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), source: None }
    }
}

impl From<reqwest::Error> for NodeError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "HTTP request timed out".to_owned()
        } else {
            err.to_string()
        };
        Self::Transport { message, source: Some(Arc::new(err)) }
    }
}

/// Errors raised while validating a parameter bag or binding it to an item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// The bag did not deserialize (unknown resource, unsupported operation,
    /// wrong field type, ...).
    #[error("{0}")]
    Malformed(String),

    /// A required field is missing or empty.
    #[error("required parameter '{0}' is missing or empty")]
    MissingField(&'static str),

    /// The item has no binary attachment under the configured property.
    #[error("no binary data found in property '{0}'")]
    MissingBinary(String),
}
