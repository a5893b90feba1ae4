//! One-at-a-time execution with fail-fast

use super::events::{EventSink, RunEvent};
use super::outcome::{RunStatistics, RunSummary};
use super::process::ProcessRunner;
use super::report::ReportTotals;
use super::unit::{CommandSpec, expand, total_units};

/// Run every spec in order, stopping at the first failed unit
///
/// Specs are flattened into units up front, so sub-sequence members simply
/// follow each other. Units after a failure are never started and never
/// recorded.
pub async fn run_sequential(
    specs: &[CommandSpec],
    runner: &ProcessRunner,
    sink: &dyn EventSink,
) -> RunSummary {
    let total = total_units(specs);
    let of = specs.len();
    let mut outcomes = Vec::with_capacity(total);
    let mut statistics = RunStatistics::default();

    for unit in expand(specs) {
        sink.emit(RunEvent::Started {
            unit: unit.clone(),
            of,
        });

        let outcome = runner.run(&unit).await;
        statistics.record(&outcome);

        match outcome.failure() {
            None => sink.emit(RunEvent::Succeeded {
                unit,
                of,
                elapsed_ms: outcome.elapsed_ms,
            }),
            Some(failure) => sink.emit(RunEvent::Failed {
                unit,
                of,
                elapsed_ms: outcome.elapsed_ms,
                failure: failure.clone(),
            }),
        }

        let failed = outcome.is_failed();
        outcomes.push(outcome);
        if failed {
            tracing::debug!("aborting sequential run after {} unit(s)", outcomes.len());
            break;
        }
    }

    sink.emit(RunEvent::Summary(ReportTotals::new(&statistics, total)));
    RunSummary::new(outcomes, statistics, total, of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::events::RecordingSink;
    use crate::execution::process::OutputMode;

    fn runner() -> ProcessRunner {
        ProcessRunner::default().with_output(OutputMode::Silent)
    }

    fn specs(commands: &[&str]) -> Vec<CommandSpec> {
        commands.iter().map(|c| CommandSpec::from(*c)).collect()
    }

    #[tokio::test]
    async fn test_all_succeed() {
        let sink = RecordingSink::new();
        let summary = run_sequential(&specs(&["echo a", "echo b"]), &runner(), &sink).await;

        assert_eq!(summary.outcomes.len(), 2);
        assert!(summary.outcomes.iter().all(|o| o.is_success()));
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_mid_failure_stops_the_run() {
        let sink = RecordingSink::new();
        let summary = run_sequential(
            &specs(&["echo a", "exit 1", "echo c"]),
            &runner(),
            &sink,
        )
        .await;

        assert_eq!(summary.outcomes.len(), 2);
        assert!(summary.outcomes[0].is_success());
        assert!(summary.outcomes[1].is_failed());
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(summary.statistics.started, 2);

        let started = sink
            .events()
            .iter()
            .filter(|e| matches!(e, RunEvent::Started { .. }))
            .count();
        assert_eq!(started, 2);
    }

    #[tokio::test]
    async fn test_failing_sub_sequence_member_skips_the_rest() {
        let sink = RecordingSink::new();
        let specs = vec![
            CommandSpec::from(vec!["echo 1", "exit 1", "echo 3"]),
            CommandSpec::from("echo after"),
        ];
        let summary = run_sequential(&specs, &runner(), &sink).await;

        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.outcomes[0].unit.sub_index, Some(0));
        assert_eq!(summary.outcomes[1].unit.sub_index, Some(1));
        assert_eq!(summary.total_units, 4);
    }

    #[tokio::test]
    async fn test_events_bracket_each_unit_and_end_with_summary() {
        let sink = RecordingSink::new();
        run_sequential(&specs(&["true", "false"]), &runner(), &sink).await;
        let events = sink.events();

        assert!(matches!(events[0], RunEvent::Started { .. }));
        assert!(matches!(events[1], RunEvent::Succeeded { .. }));
        assert!(matches!(events[2], RunEvent::Started { .. }));
        assert!(matches!(events[3], RunEvent::Failed { .. }));
        match &events[4] {
            RunEvent::Summary(totals) => {
                assert_eq!(totals.configured, 2);
                assert_eq!(totals.executed, 2);
                assert_eq!(totals.failed, 1);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_spec_list_passes() {
        let sink = RecordingSink::new();
        let summary = run_sequential(&[], &runner(), &sink).await;

        assert!(summary.outcomes.is_empty());
        assert_eq!(summary.exit_code(), 0);
    }
}
