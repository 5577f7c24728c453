//! Run engine: settings, validation, orchestration, and aggregation.
//!
//! A run fires `iterations` attempts at one endpoint, either all at once or
//! strictly one after another, and publishes a [`RunEvent`] for every
//! completed attempt before returning the final [`RunResult`].
mod accumulator;
mod aggregate;
mod events;
mod log;
mod orchestrator;
mod result;
mod settings;
mod summary;
mod validate;


pub use aggregate::{RunningAverage, average};
pub use events::{CallbackSink, EventKind, EventSink, NoopSink, RunEvent};
pub use log::{LogItem, LogMetas};
pub use orchestrator::{RunOrchestrator, run};
pub use result::{RunPhase, RunResult};
pub use settings::{FailurePolicy, RunSettings};
pub use summary::{FailureGroup, LatencyGrade, RunProgress, RunSummary};
pub use validate::{Validation, validate, validate_settings};
