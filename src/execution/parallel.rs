//! Concurrent execution, one task per top-level spec
//!
//! Each spec gets its own tokio task. Sub-sequence members run in order inside
//! their task, independent slots run concurrently. Outcomes flow through a
//! channel to a single collector, which is the only writer of the statistics.
//! The first failed outcome is reported the moment the collector receives it
//! and cancels the run. The collector stops recording, so failures from other
//! slots are never reported. Remaining tasks are aborted and their child
//! processes killed, not awaited.

use super::events::{EventSink, RunEvent};
use super::outcome::{ExecutionOutcome, RunStatistics, RunSummary};
use super::process::{OutputMode, ProcessRunner};
use super::report::ReportTotals;
use super::unit::{CommandSpec, CommandUnit, total_units};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Run every spec concurrently, stopping at the first failed unit
pub async fn run_parallel(
    specs: &[CommandSpec],
    runner: &ProcessRunner,
    sink: Arc<dyn EventSink>,
) -> RunSummary {
    let total = total_units(specs);
    let of = specs.len();

    // Interleaved output needs to say where each line came from
    let runner = match runner.output_mode() {
        OutputMode::Stream => runner.clone().with_output(OutputMode::Prefixed),
        _ => runner.clone(),
    };

    let cancel = CancellationToken::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<ExecutionOutcome>();
    let mut tasks = JoinSet::new();

    for (index, spec) in specs.iter().enumerate() {
        let units = spec.units(index);
        if units.is_empty() {
            continue;
        }
        tasks.spawn(run_slot(
            units,
            of,
            runner.clone(),
            Arc::clone(&sink),
            tx.clone(),
            cancel.clone(),
        ));
    }
    // The channel closes once every slot has finished
    drop(tx);

    let mut outcomes = Vec::with_capacity(total);
    let mut statistics = RunStatistics::default();

    while let Some(outcome) = rx.recv().await {
        statistics.record(&outcome);
        let failed = outcome.is_failed();

        if let Some(failure) = outcome.failure() {
            // Only the recorded failure is reported, later ones are discarded
            sink.emit(RunEvent::Failed {
                unit: outcome.unit.clone(),
                of,
                elapsed_ms: outcome.elapsed_ms,
                failure: failure.clone(),
            });
        }
        outcomes.push(outcome);

        if failed {
            tracing::debug!(
                "first failure after {} outcome(s), cancelling {} slot(s)",
                outcomes.len(),
                tasks.len()
            );
            cancel.cancel();
            break;
        }
    }
    // Cancel whatever is still in flight. Children are killed on drop, their
    // exit is never awaited
    tasks.shutdown().await;

    flush_successes(&outcomes, of, sink.as_ref());
    sink.emit(RunEvent::Summary(ReportTotals::new(&statistics, total)));

    RunSummary::new(outcomes, statistics, total, of)
}

/// Run one top-level slot. Members run strictly in order
async fn run_slot(
    units: Vec<CommandUnit>,
    of: usize,
    runner: ProcessRunner,
    sink: Arc<dyn EventSink>,
    tx: mpsc::UnboundedSender<ExecutionOutcome>,
    cancel: CancellationToken,
) {
    for unit in units {
        if cancel.is_cancelled() {
            tracing::trace!("slot {} cancelled before `{}`", unit.top_level_index, unit.command);
            return;
        }

        sink.emit(RunEvent::Started {
            unit: unit.clone(),
            of,
        });
        let outcome = runner.run(&unit).await;
        let failed = outcome.is_failed();
        if tx.send(outcome).is_err() || failed {
            return;
        }
    }
}

/// Emit the buffered success notifications in configuration order
fn flush_successes(outcomes: &[ExecutionOutcome], of: usize, sink: &dyn EventSink) {
    let mut succeeded: Vec<&ExecutionOutcome> =
        outcomes.iter().filter(|outcome| outcome.is_success()).collect();
    succeeded.sort_by_key(|outcome| outcome.unit.order_key());

    for outcome in succeeded {
        sink.emit(RunEvent::Succeeded {
            unit: outcome.unit.clone(),
            of,
            elapsed_ms: outcome.elapsed_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::events::RecordingSink;
    use crate::execution::report::Report;
    use std::time::{Duration, Instant};

    fn runner() -> ProcessRunner {
        ProcessRunner::default().with_output(OutputMode::Silent)
    }

    fn succeeded_order(events: &[RunEvent]) -> Vec<(usize, Option<usize>)> {
        events
            .iter()
            .filter_map(|event| match event {
                RunEvent::Succeeded { unit, .. } => Some((unit.top_level_index, unit.sub_index)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_report_order_ignores_completion_order() {
        let sink = Arc::new(RecordingSink::new());
        let specs = vec![
            CommandSpec::from("sleep 0.2 && echo a"),
            CommandSpec::from("echo b"),
        ];
        let summary = run_parallel(&specs, &runner(), sink.clone()).await;

        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.exit_code(), 0);
        // The fast unit is recorded first
        assert_eq!(summary.outcomes[0].unit.top_level_index, 1);

        let report = Report::build(&summary.outcomes, summary.total_units, summary.top_level);
        let order: Vec<usize> = report.lines.iter().map(|l| l.top_level_index).collect();
        assert_eq!(order, vec![0, 1]);
        assert_eq!(succeeded_order(&sink.events()), vec![(0, None), (1, None)]);
    }

    #[tokio::test]
    async fn test_failure_terminates_without_waiting_for_slow_units() {
        let sink = Arc::new(RecordingSink::new());
        let specs = vec![
            CommandSpec::from("echo a"),
            CommandSpec::from("exit 1"),
            CommandSpec::from("sleep 5 && echo c"),
        ];

        let start = Instant::now();
        let summary = run_parallel(&specs, &runner(), sink.clone()).await;

        assert!(start.elapsed() < Duration::from_secs(3));
        assert_eq!(summary.exit_code(), 1);
        assert!(summary.outcomes.iter().any(|o| o.is_failed()));
        assert!(summary.outcomes.iter().all(|o| o.unit.top_level_index != 2));

        let failed = sink
            .events()
            .iter()
            .filter(|e| matches!(e, RunEvent::Failed { .. }))
            .count();
        assert_eq!(failed, 1);
    }

    #[tokio::test]
    async fn test_sub_sequence_runs_in_order_beside_other_slots() {
        let sink = Arc::new(RecordingSink::new());
        let specs = vec![
            CommandSpec::from("echo a"),
            CommandSpec::from(vec!["echo b1", "echo b2"]),
        ];
        let summary = run_parallel(&specs, &runner(), sink.clone()).await;

        assert_eq!(summary.outcomes.len(), 3);
        let members: Vec<&ExecutionOutcome> = summary
            .outcomes
            .iter()
            .filter(|o| o.unit.top_level_index == 1)
            .collect();
        assert_eq!(members[0].unit.sub_index, Some(0));
        assert_eq!(members[1].unit.sub_index, Some(1));
        assert!(members.iter().all(|m| m.unit.sub_sequence_length == Some(2)));
        assert_eq!(members[0].stdout, "b1\n");

        assert_eq!(
            succeeded_order(&sink.events()),
            vec![(0, None), (1, Some(0)), (1, Some(1))]
        );
    }

    #[tokio::test]
    async fn test_failed_member_stops_its_sub_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("third-ran");
        let specs = vec![CommandSpec::Sequence(vec![
            "true".to_string(),
            "exit 1".to_string(),
            format!("touch {}", marker.display()),
        ])];

        let summary = run_parallel(&specs, &runner(), Arc::new(RecordingSink::new())).await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.exit_code(), 1);
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_cancelled_slots_never_start_their_next_member() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("second-ran");
        let specs = vec![
            CommandSpec::from("exit 1"),
            CommandSpec::Sequence(vec![
                "sleep 0.3".to_string(),
                format!("touch {}", marker.display()),
            ]),
        ];

        let summary = run_parallel(&specs, &runner(), Arc::new(RecordingSink::new())).await;
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(summary.exit_code(), 1);
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_simultaneous_failures_report_only_the_recorded_one() {
        let specs = vec![
            CommandSpec::from("exit 1"),
            CommandSpec::from("exit 2"),
            CommandSpec::from("exit 3"),
        ];

        for _ in 0..20 {
            let sink = Arc::new(RecordingSink::new());
            let summary = run_parallel(&specs, &runner(), sink.clone()).await;
            let events = sink.events();

            let failed_events = events
                .iter()
                .filter(|e| matches!(e, RunEvent::Failed { .. }))
                .count();
            let totals = match events.last() {
                Some(RunEvent::Summary(totals)) => *totals,
                other => panic!("expected summary, got {other:?}"),
            };

            assert_eq!(summary.statistics.failed, 1);
            assert_eq!(totals.failed, 1);
            assert_eq!(failed_events, totals.failed);
        }
    }

    #[tokio::test]
    async fn test_repeated_runs_produce_same_statuses() {
        let specs = vec![
            CommandSpec::from("true"),
            CommandSpec::from(vec!["true", "true"]),
            CommandSpec::from("echo done"),
        ];

        for _ in 0..3 {
            let summary = run_parallel(&specs, &runner(), Arc::new(RecordingSink::new())).await;
            assert_eq!(summary.statistics.succeeded, 4);
            assert_eq!(summary.statistics.failed, 0);
        }
    }

    #[tokio::test]
    async fn test_summary_is_last_event() {
        let sink = Arc::new(RecordingSink::new());
        run_parallel(&[CommandSpec::from("true")], &runner(), sink.clone()).await;

        match sink.events().last() {
            Some(RunEvent::Summary(totals)) => assert_eq!(totals.succeeded, 1),
            other => panic!("expected summary, got {other:?}"),
        }
    }
}
