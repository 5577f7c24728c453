use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::trace;

use super::LogItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    ResponseOk,
    ResponseFailed,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::ResponseOk => "RESPONSE_OK",
            EventKind::ResponseFailed => "RESPONSE_FAILED",
        }
    }

    #[must_use]
    pub const fn for_log(log: &LogItem) -> Self {
        if log.failed {
            EventKind::ResponseFailed
        } else {
            EventKind::ResponseOk
        }
    }
}

/// Lifecycle and per-attempt notifications published during a run.
#[derive(Debug, Clone)]
pub enum RunEvent {
    Started {
        iterations: usize,
        parallel: bool,
    },
    /// One attempt completed. `logs` holds every attempt completed so far,
    /// in completion order, including `log` as its last element.
    Response {
        kind: EventKind,
        log: Arc<LogItem>,
        logs: Vec<Arc<LogItem>>,
    },
    Finished {
        completed: usize,
        average: f64,
        cancelled: bool,
    },
}

impl RunEvent {
    #[must_use]
    pub const fn kind(&self) -> Option<EventKind> {
        match self {
            RunEvent::Response { kind, .. } => Some(*kind),
            RunEvent::Started { .. } | RunEvent::Finished { .. } => None,
        }
    }
}

/// Receiver side of the run's event stream.
///
/// `emit` runs inline in the run's completion loop and must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RunEvent);
}

impl EventSink for mpsc::UnboundedSender<RunEvent> {
    fn emit(&self, event: RunEvent) {
        if self.send(event).is_err() {
            trace!("Run event receiver dropped; event discarded.");
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: RunEvent) {}
}

/// Adapts a plain callback into a sink.
pub struct CallbackSink<F>(F);

impl<F> CallbackSink<F>
where
    F: Fn(&RunEvent) + Send + Sync,
{
    #[must_use]
    pub const fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> EventSink for CallbackSink<F>
where
    F: Fn(&RunEvent) + Send + Sync,
{
    fn emit(&self, event: RunEvent) {
        (self.0)(&event);
    }
}
