//! Command execution orchestrator
//!
//! Runs the command list of a hook under one of two strategies:
//!
//! - **Sequential**: units run one at a time in configuration order. The first
//!   failed unit stops the run and nothing after it is started.
//! - **Parallel**: every top-level spec runs in its own task. A spec that is a
//!   sub-sequence runs its members in order inside that task. The first failed
//!   unit anywhere stops the run without waiting for the other tasks.
//!
//! Data flows one way:
//!
//! ```text
//! ProcessRunner ──▶ executor (sequential | parallel) ──▶ RunSummary ──▶ Report
//!                         │
//!                         └──▶ EventSink (started / succeeded / failed / summary)
//! ```
//!
//! Executors never terminate the process. They return a [`RunSummary`] and the
//! caller decides what to do with [`RunSummary::exit_code`].
//!
//! # Example
//!
//! ```rust,no_run
//! use huskier::execution::{CommandSpec, ExecutionMode, ProcessRunner, SilentSink, execute};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let specs = vec![
//!     CommandSpec::from("cargo fmt --check"),
//!     CommandSpec::from(vec!["cargo build", "cargo test"]),
//! ];
//! let summary = execute(&specs, ExecutionMode::Parallel, &ProcessRunner::default(), Arc::new(SilentSink)).await;
//! std::process::exit(summary.exit_code());
//! # }
//! ```

pub mod events;
pub mod outcome;
pub mod parallel;
pub mod process;
pub mod report;
pub mod sequential;
pub mod unit;

pub use events::{EventSink, RecordingSink, RunEvent, SilentSink};
pub use outcome::{ExecutionOutcome, FailureKind, OutcomeStatus, RunStatistics, RunStatus, RunSummary};
pub use parallel::run_parallel;
pub use process::{OutputMode, ProcessRunner};
pub use report::{Report, ReportLine, ReportTotals};
pub use sequential::run_sequential;
pub use unit::{CommandSpec, CommandUnit, expand, total_units};

use std::sync::Arc;
use tracing::Instrument;

/// Execution strategy for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

impl ExecutionMode {
    pub fn from_parallel_flag(parallel: bool) -> Self {
        if parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
        }
    }
}

/// Run `specs` under `mode`
pub async fn execute(
    specs: &[CommandSpec],
    mode: ExecutionMode,
    runner: &ProcessRunner,
    sink: Arc<dyn EventSink>,
) -> RunSummary {
    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("run", id = %run_id, mode = mode.name());

    async move {
        tracing::info!("running {} command(s)", total_units(specs));
        let summary = match mode {
            ExecutionMode::Sequential => run_sequential(specs, runner, sink.as_ref()).await,
            ExecutionMode::Parallel => run_parallel(specs, runner, sink).await,
        };
        tracing::info!(
            "run finished: {} succeeded, {} failed in {}ms",
            summary.statistics.succeeded,
            summary.statistics.failed,
            summary.statistics.elapsed_ms
        );
        summary
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(ExecutionMode::from_parallel_flag(true), ExecutionMode::Parallel);
        assert_eq!(ExecutionMode::from_parallel_flag(false), ExecutionMode::Sequential);
        assert_eq!(ExecutionMode::default(), ExecutionMode::Sequential);
    }

    #[tokio::test]
    async fn test_exit_status_matches_failures_in_both_modes() {
        let runner = ProcessRunner::default().with_output(OutputMode::Silent);
        let passing = vec![CommandSpec::from("true"), CommandSpec::from(vec!["true", "true"])];
        let failing = vec![CommandSpec::from("true"), CommandSpec::from(vec!["true", "false"])];

        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            let ok = execute(&passing, mode, &runner, Arc::new(SilentSink)).await;
            assert_eq!(ok.exit_code(), 0, "{} run should pass", mode.name());
            assert_eq!(ok.outcomes.len(), 3);

            let bad = execute(&failing, mode, &runner, Arc::new(SilentSink)).await;
            assert_eq!(bad.exit_code(), 1, "{} run should fail", mode.name());
            assert!(bad.outcomes.iter().any(ExecutionOutcome::is_failed));
        }
    }
}
