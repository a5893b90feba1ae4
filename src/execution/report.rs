//! Final run report
//!
//! Parallel runs record outcomes in completion order. The report is where that
//! order is normalized back to configuration order, so rendering is stable
//! regardless of how the scheduler interleaved the units.

use super::outcome::{ExecutionOutcome, OutcomeStatus, RunStatistics};
use std::fmt;

/// Aggregate totals printed after the unit lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTotals {
    /// Units the configuration expands into
    pub configured: usize,
    pub executed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
}

impl ReportTotals {
    pub fn new(statistics: &RunStatistics, configured: usize) -> Self {
        Self {
            configured,
            executed: statistics.started,
            succeeded: statistics.succeeded,
            failed: statistics.failed,
            elapsed_ms: statistics.elapsed_ms,
        }
    }
}

/// One rendered unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub top_level_index: usize,
    /// Number of configured top-level specs, the `n` in `i/n`
    pub top_level: usize,
    pub sub_index: Option<usize>,
    pub sub_sequence_length: Option<usize>,
    pub command: String,
    pub status: OutcomeStatus,
    pub elapsed_ms: u64,
}

impl ReportLine {
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub lines: Vec<ReportLine>,
    pub totals: ReportTotals,
}

impl Report {
    /// Build a report from outcomes recorded in any order
    pub fn build(outcomes: &[ExecutionOutcome], total_units: usize, top_level: usize) -> Self {
        let mut sorted: Vec<&ExecutionOutcome> = outcomes.iter().collect();
        sorted.sort_by_key(|outcome| outcome.unit.order_key());

        let lines = sorted
            .into_iter()
            .map(|outcome| ReportLine {
                top_level_index: outcome.unit.top_level_index,
                top_level,
                sub_index: outcome.unit.sub_index,
                sub_sequence_length: outcome.unit.sub_sequence_length,
                command: outcome.unit.command.clone(),
                status: outcome.status.clone(),
                elapsed_ms: outcome.elapsed_ms,
            })
            .collect();

        let statistics = RunStatistics::from_outcomes(outcomes);
        Self {
            lines,
            totals: ReportTotals::new(&statistics, total_units),
        }
    }

    pub fn failed_lines(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines.iter().filter(|line| !line.is_success())
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.is_success() { "SUCCESS" } else { "FAILED" };
        write!(f, "[{label}] ({}/{}", self.top_level_index + 1, self.top_level)?;
        if let (Some(sub), Some(len)) = (self.sub_index, self.sub_sequence_length) {
            write!(f, " {}/{}", sub + 1, len)?;
        }
        write!(f, ") {} ({}ms)", self.command, self.elapsed_ms)
    }
}

impl fmt::Display for ReportTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total commands: {}", self.configured)?;
        writeln!(f, "Total executed commands: {}", self.executed)?;
        writeln!(f, "Total execution time: {}ms", self.elapsed_ms)?;
        if self.succeeded > 0 {
            writeln!(f, "Total success commands: {}", self.succeeded)?;
        }
        if self.failed > 0 {
            writeln!(f, "Total failed commands: {}", self.failed)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "{}", self.totals)
    }
}
