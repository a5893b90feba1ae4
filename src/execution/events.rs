//! Semantic run events
//!
//! Executors never print status lines themselves. They emit unstyled events
//! to an [`EventSink`], and the presentation layer decides how they look.

use super::outcome::FailureKind;
use super::report::ReportTotals;
use super::unit::CommandUnit;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Started {
        unit: CommandUnit,
        of: usize,
    },
    Succeeded {
        unit: CommandUnit,
        of: usize,
        elapsed_ms: u64,
    },
    Failed {
        unit: CommandUnit,
        of: usize,
        elapsed_ms: u64,
        failure: FailureKind,
    },
    Summary(ReportTotals),
}

/// Receiver of run events, shared by every concurrent task of a run
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RunEvent);
}

/// Sink that keeps every event, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: RunEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl EventSink for SilentSink {
    fn emit(&self, _event: RunEvent) {}
}
