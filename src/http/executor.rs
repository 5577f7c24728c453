use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use chrono::Utc;
use futures_util::FutureExt;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::engine::{FailurePolicy, LogItem, RunSettings};
use crate::error::TransportError;

use super::transport::{AttemptRequest, AttemptResponse, Transport};

/// Performs attempt `index` of a run and returns its log entry.
///
/// Never fails: transport errors, deadline expiry, and panics raised inside
/// the transport all come back as a failed [`LogItem`].
pub async fn execute(index: usize, settings: &RunSettings, transport: &dyn Transport) -> LogItem {
    let request = AttemptRequest::from_settings(settings);
    let start_date = Utc::now();
    let started = Instant::now();
    debug!("Dispatching attempt {} ({} {})", index, request.method, request.url);

    let outcome = AssertUnwindSafe(dispatch(transport, &request, settings.deadline()))
        .catch_unwind()
        .await;

    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    let end_date = Utc::now();

    match outcome {
        Ok(Ok(AttemptResponse { status, .. })) => {
            let status_ok = (200..300).contains(&status);
            if !status_ok && settings.failure_policy == FailurePolicy::NonSuccessStatus {
                warn!("Attempt {} returned status {}", index, status);
                return LogItem::failed(
                    index,
                    Some(status),
                    format!("Request failed with status code {}", status),
                    start_date,
                    end_date,
                );
            }
            LogItem::completed(index, status, duration_ms, start_date, end_date)
        }
        Ok(Err(err)) => {
            warn!("Attempt {} failed: {}", index, err);
            LogItem::failed(index, None, err.to_string(), start_date, end_date)
        }
        Err(panic) => {
            let message = format!("Unexpected executor error: {}", panic_message(panic.as_ref()));
            error!("Attempt {}: {}", index, message);
            LogItem::failed(index, None, message, start_date, end_date)
        }
    }
}

async fn dispatch(
    transport: &dyn Transport,
    request: &AttemptRequest<'_>,
    deadline: Option<Duration>,
) -> Result<AttemptResponse, TransportError> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, transport.send(request))
            .await
            .map_err(|_elapsed| {
                TransportError::Timeout(format!("no response within {}ms", limit.as_millis()))
            })?,
        None => transport.send(request).await,
    }
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload.downcast_ref::<&str>().map_or_else(
        || {
            payload
                .downcast_ref::<String>()
                .map_or_else(|| "panic with non-string payload".to_owned(), Clone::clone)
        },
        |message| (*message).to_owned(),
    )
}
