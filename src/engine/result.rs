use std::sync::Arc;

use super::LogItem;

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Validating,
    Rejected,
    Dispatching,
    Completing,
    Done,
}

impl RunPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::Validating => "validating",
            RunPhase::Rejected => "rejected",
            RunPhase::Dispatching => "dispatching",
            RunPhase::Completing => "completing",
            RunPhase::Done => "done",
        }
    }
}

/// Final state of a run, in completion order.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Durations of non-failed attempts only.
    pub results: Vec<f64>,
    pub logs: Vec<Arc<LogItem>>,
    pub average: f64,
    /// Set when the run stopped early; `logs` then holds fewer than
    /// `iterations` entries.
    pub cancelled: bool,
}

impl RunResult {
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.logs.iter().filter(|log| log.failed).count()
    }
}
