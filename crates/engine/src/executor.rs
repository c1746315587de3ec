//! Item execution engine.
//!
//! `ItemExecutor` runs one node over a list of input items:
//! 1. Items are processed strictly in input order, one at a time.
//! 2. Each success yields `{json: <node output>, pairedItem: i}`.
//! 3. On failure the run either aborts (default) or, with
//!    `continue_on_fail`, records `{json: {error: <message>}, pairedItem: i}`
//!    and moves on.
//!
//! Failures are never retried.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use nodes::{ExecutableNode, ExecutionContext, Item, OutputItem};

use crate::EngineError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the executor.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Capture per-item failures in the output instead of aborting the run.
    pub continue_on_fail: bool,
}

// ---------------------------------------------------------------------------
// Output of a completed execution
// ---------------------------------------------------------------------------

/// The result of running a node over all items.
#[derive(Debug)]
pub struct ExecutionResult {
    pub execution_id: uuid::Uuid,
    /// One output item per input item, in input order.
    pub items: Vec<OutputItem>,
    /// Items that were recorded as errors (continue-on-fail only).
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// ItemExecutor
// ---------------------------------------------------------------------------

/// Stateless orchestrator for a single node run.
pub struct ItemExecutor {
    config: ExecutorConfig,
}

impl ItemExecutor {
    /// Create a new executor.
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Run `node` over `items` and collect the output items.
    ///
    /// # Errors
    /// Returns [`EngineError::ItemFailed`] for the first failing item unless
    /// continue-on-fail is enabled.
    #[instrument(skip_all, fields(execution_id = %ctx.execution_id, items = items.len()))]
    pub async fn run(
        &self,
        node: &dyn ExecutableNode,
        items: &[Item],
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, EngineError> {
        let started_at = Utc::now();
        let mut output = Vec::with_capacity(items.len());
        let mut failed = 0usize;

        for (index, item) in items.iter().enumerate() {
            match node.execute(item, index, ctx).await {
                Ok(json) => {
                    info!("item {} succeeded", index);
                    output.push(OutputItem { json, paired_item: index });
                }

                Err(err) if self.config.continue_on_fail => {
                    warn!("item {} failed, continuing: {}", index, err);
                    failed += 1;
                    output.push(OutputItem {
                        json: json!({ "error": err.to_string() }),
                        paired_item: index,
                    });
                }

                Err(err) => {
                    error!("item {} failed, aborting run: {}", index, err);
                    return Err(EngineError::ItemFailed { index, source: err });
                }
            }
        }

        info!(
            "execution {} finished: {} items, {} failed",
            ctx.execution_id,
            output.len(),
            failed
        );

        Ok(ExecutionResult {
            execution_id: ctx.execution_id,
            items: output,
            failed,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
