//! Pre-commit hook
//!
//! Runs the `pre-commit` command list. An empty list is a successful no-op.

use super::HookContext;
use crate::config::PRE_COMMIT;
use crate::execution::{EventSink, RunSummary};
use anyhow::Result;
use std::sync::Arc;

/// Execute pre-commit hook
pub async fn execute(context: &HookContext, sink: Arc<dyn EventSink>) -> Result<RunSummary> {
    let summary = super::run(PRE_COMMIT, context, sink).await?;

    if summary.total_units == 0 {
        tracing::info!("no pre-commit commands configured");
    }

    Ok(summary)
}
