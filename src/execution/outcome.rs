//! Per-unit outcomes and the running statistics built from them

use super::unit::CommandUnit;

/// Why a unit failed
///
/// Spawn failures are kept distinct from non-zero exits so they can be logged
/// differently, but both count as a failed unit everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Process exited with a non-zero code
    ExitCode(i32),
    /// Process was terminated by a signal
    Signal,
    /// Process could not be started at all
    Spawn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    Failed(FailureKind),
}

/// Result of running one unit. Produced once, never mutated
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub unit: CommandUnit,
    pub status: OutcomeStatus,
    pub elapsed_ms: u64,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success)
    }

    pub fn is_failed(&self) -> bool {
        !self.is_success()
    }

    pub fn failure(&self) -> Option<&FailureKind> {
        match &self.status {
            OutcomeStatus::Failed(kind) => Some(kind),
            OutcomeStatus::Success => None,
        }
    }
}

/// Running totals for one invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub started: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
}

impl RunStatistics {
    pub fn record(&mut self, outcome: &ExecutionOutcome) {
        self.started += 1;
        self.elapsed_ms += outcome.elapsed_ms;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn from_outcomes(outcomes: &[ExecutionOutcome]) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            stats.record(outcome);
        }
        stats
    }
}

/// Overall result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    Failed,
}

/// Everything an executor hands back to its caller
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Outcomes in the order they were recorded
    pub outcomes: Vec<ExecutionOutcome>,
    pub statistics: RunStatistics,
    pub total_units: usize,
    /// Number of configured top-level specs
    pub top_level: usize,
    pub status: RunStatus,
}

impl RunSummary {
    pub fn new(
        outcomes: Vec<ExecutionOutcome>,
        statistics: RunStatistics,
        total_units: usize,
        top_level: usize,
    ) -> Self {
        let status = if outcomes.iter().any(ExecutionOutcome::is_failed) {
            RunStatus::Failed
        } else {
            RunStatus::Passed
        };
        Self {
            outcomes,
            statistics,
            total_units,
            top_level,
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Passed
    }

    /// Process exit code the caller should terminate with
    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Passed => 0,
            RunStatus::Failed => 1,
        }
    }
}
