use std::sync::Arc;

use tracing::debug;

use super::aggregate::{RunningAverage, average};
use super::{EventKind, EventSink, LogItem, RunEvent, RunResult};

/// Run state owned by the orchestrator's completion loop.
///
/// Every completion goes through [`RunAccumulator::complete`], which appends
/// and publishes in one step, so sinks always see logs that include the
/// event's own entry.
#[derive(Debug, Default)]
pub(super) struct RunAccumulator {
    results: Vec<f64>,
    logs: Vec<Arc<LogItem>>,
    running: RunningAverage,
    seen: Vec<bool>,
}

impl RunAccumulator {
    pub(super) fn new(iterations: usize) -> Self {
        Self {
            results: Vec::with_capacity(iterations),
            logs: Vec::with_capacity(iterations),
            running: RunningAverage::default(),
            seen: vec![false; iterations],
        }
    }

    pub(super) fn complete(&mut self, log: LogItem, sink: &dyn EventSink) {
        if let Some(slot) = self.seen.get_mut(log.index) {
            *slot = true;
        }
        if let Some(duration) = log.success_duration() {
            self.results.push(duration);
            self.running.push(duration);
        }
        debug!(
            "Attempt {} settled ({} done, running average {:.2}ms)",
            log.index,
            self.logs.len().saturating_add(1),
            self.running.value()
        );
        let kind = EventKind::for_log(&log);
        let log = Arc::new(log);
        self.logs.push(Arc::clone(&log));
        sink.emit(RunEvent::Response {
            kind,
            log,
            logs: self.logs.clone(),
        });
    }

    /// Indices dispatched but never reported back.
    pub(super) fn missing(&self) -> Vec<usize> {
        self.seen
            .iter()
            .enumerate()
            .filter_map(|(index, seen)| (!seen).then_some(index))
            .collect()
    }

    pub(super) const fn completed(&self) -> usize {
        self.logs.len()
    }

    pub(super) fn into_result(self, cancelled: bool) -> RunResult {
        let average = average(&self.results);
        RunResult {
            results: self.results,
            logs: self.logs,
            average,
            cancelled,
        }
    }
}
