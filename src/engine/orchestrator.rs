use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::http::{Transport, execute};

use super::accumulator::RunAccumulator;
use super::{EventSink, LogItem, RunEvent, RunPhase, RunResult, RunSettings, validate_settings};

/// Drives the attempts of a run against an injected [`Transport`].
#[derive(Clone)]
pub struct RunOrchestrator {
    transport: Arc<dyn Transport>,
    cancel: Option<watch::Receiver<bool>>,
}

enum ParallelStep {
    Joined(Option<Result<LogItem, JoinError>>),
    Cancelled,
    CancelClosed,
}

impl RunOrchestrator {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cancel: None,
        }
    }

    /// Stops the run once the watched value becomes `true`. Sequential runs
    /// dispatch nothing further; outstanding parallel attempts are detached
    /// and left to finish on their own.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Validates `settings`, fires every attempt, and returns the collected
    /// result. Each completed attempt is published to `sink` as it lands.
    ///
    /// # Errors
    ///
    /// Returns a validation error, before anything is dispatched or emitted,
    /// when the url, verb, or iteration count is unusable. No error is
    /// returned once dispatch has begun.
    pub async fn run(&self, settings: RunSettings, sink: &dyn EventSink) -> AppResult<RunResult> {
        let mut phase = RunPhase::Idle;
        transition(&mut phase, RunPhase::Validating);
        if let Err(err) = validate_settings(&settings).into_result() {
            transition(&mut phase, RunPhase::Rejected);
            warn!("Run rejected: {}", err);
            return Err(AppError::validation(err));
        }

        transition(&mut phase, RunPhase::Dispatching);
        info!(
            "Firing {} {} request(s) at {} ({})",
            settings.iterations,
            settings.verb,
            settings.url,
            settings.mode_label()
        );
        let settings = Arc::new(settings);
        let mut accumulator = RunAccumulator::new(settings.iterations);
        sink.emit(RunEvent::Started {
            iterations: settings.iterations,
            parallel: settings.parallel,
        });

        let cancelled = if settings.parallel {
            self.run_parallel(&settings, &mut accumulator, sink).await
        } else {
            self.run_sequential(&settings, &mut accumulator, sink).await
        };

        transition(&mut phase, RunPhase::Completing);
        let completed = accumulator.completed();
        let result = accumulator.into_result(cancelled);
        sink.emit(RunEvent::Finished {
            completed,
            average: result.average,
            cancelled,
        });
        transition(&mut phase, RunPhase::Done);
        Ok(result)
    }

    async fn run_sequential(
        &self,
        settings: &RunSettings,
        accumulator: &mut RunAccumulator,
        sink: &dyn EventSink,
    ) -> bool {
        for index in 0..settings.iterations {
            if self.is_cancelled() {
                info!("Run cancelled after {} attempt(s).", index);
                return true;
            }
            let log = execute(index, settings, self.transport.as_ref()).await;
            accumulator.complete(log, sink);
        }
        false
    }

    async fn run_parallel(
        &self,
        settings: &Arc<RunSettings>,
        accumulator: &mut RunAccumulator,
        sink: &dyn EventSink,
    ) -> bool {
        if self.is_cancelled() {
            info!("Run cancelled before dispatch.");
            return true;
        }

        let mut attempts = JoinSet::new();
        for index in 0..settings.iterations {
            let settings = Arc::clone(settings);
            let transport = Arc::clone(&self.transport);
            attempts.spawn(async move { execute(index, &settings, transport.as_ref()).await });
        }
        debug!("Dispatched {} attempt(s).", settings.iterations);

        let mut cancel = self.cancel.clone();
        let mut join_errors: Vec<JoinError> = Vec::new();
        loop {
            let step = match cancel.as_mut() {
                Some(cancel_rx) => tokio::select! {
                    biased;
                    changed = cancel_rx.wait_for(|cancelled| *cancelled) => {
                        if changed.is_ok() {
                            ParallelStep::Cancelled
                        } else {
                            ParallelStep::CancelClosed
                        }
                    }
                    joined = attempts.join_next() => ParallelStep::Joined(joined),
                },
                None => ParallelStep::Joined(attempts.join_next().await),
            };

            match step {
                ParallelStep::Joined(None) => break,
                ParallelStep::Joined(Some(Ok(log))) => accumulator.complete(log, sink),
                ParallelStep::Joined(Some(Err(err))) => {
                    error!("Attempt task ended unexpectedly: {}", err);
                    join_errors.push(err);
                }
                ParallelStep::Cancelled => {
                    info!(
                        "Run cancelled; abandoning {} outstanding attempt(s).",
                        attempts.len()
                    );
                    attempts.detach_all();
                    return true;
                }
                ParallelStep::CancelClosed => cancel = None,
            }
        }

        backfill_join_errors(accumulator, join_errors, sink);
        false
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|cancel_rx| *cancel_rx.borrow())
    }
}

/// Logs a failure for each attempt whose task died before reporting. A
/// [`JoinError`] carries no attempt index, so they are matched to the
/// unreported indices in order.
pub(super) fn backfill_join_errors(
    accumulator: &mut RunAccumulator,
    join_errors: Vec<JoinError>,
    sink: &dyn EventSink,
) {
    if join_errors.is_empty() {
        return;
    }
    let now = chrono::Utc::now();
    for (index, err) in accumulator.missing().into_iter().zip(join_errors) {
        let log = LogItem::failed(
            index,
            None,
            format!("Unexpected executor error: {}", err),
            now,
            now,
        );
        accumulator.complete(log, sink);
    }
}

fn transition(phase: &mut RunPhase, next: RunPhase) {
    debug!("Run phase {} -> {}", phase.as_str(), next.as_str());
    *phase = next;
}

/// Runs `settings` once without cancellation.
///
/// # Errors
///
/// Returns a validation error when the settings are rejected.
pub async fn run(
    settings: RunSettings,
    transport: Arc<dyn Transport>,
    sink: &dyn EventSink,
) -> AppResult<RunResult> {
    RunOrchestrator::new(transport).run(settings, sink).await
}
