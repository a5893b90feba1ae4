//! Git hook execution
//!
//! A hook is just a named command list from the configuration. Running it hands
//! the list to the execution orchestrator in the configured mode:
//!
//! ```json
//! "huskier": {
//!   "parallel": true,
//!   "hooks": {
//!     "pre-commit": ["cargo fmt --check", ["cargo build", "cargo test"]]
//!   }
//! }
//! ```

pub mod pre_commit;

use crate::config::HuskierConfig;
use crate::execution::{self, EventSink, ExecutionMode, ProcessRunner, RunSummary};
use anyhow::Result;
use std::sync::Arc;

/// Everything a hook run needs
#[derive(Debug, Clone)]
pub struct HookContext {
    pub config: HuskierConfig,
    pub mode: ExecutionMode,
    pub runner: ProcessRunner,
}

impl HookContext {
    /// Context using the mode and shell from the configuration
    pub fn new(config: HuskierConfig) -> Self {
        let mode = ExecutionMode::from_parallel_flag(config.parallel);
        let runner = ProcessRunner::new(config.shell.clone());
        Self {
            config,
            mode,
            runner,
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_runner(mut self, runner: ProcessRunner) -> Self {
        self.runner = runner;
        self
    }
}

/// Run a configured hook by name
///
/// Errors only when the hook is not configured. Failing commands are reported
/// through the returned summary.
pub async fn run(hook_name: &str, context: &HookContext, sink: Arc<dyn EventSink>) -> Result<RunSummary> {
    let specs = context.config.hook(hook_name)?;
    tracing::info!(
        "running {} hook ({} entries, {})",
        hook_name,
        specs.len(),
        context.mode.name()
    );

    Ok(execution::execute(specs, context.mode, &context.runner, sink).await)
}
