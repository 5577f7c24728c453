use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-attempt details kept alongside the top-level log fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetas {
    pub index: usize,
    /// 1-based position, for display.
    pub number: usize,
    pub duration: Option<f64>,
    pub status_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Immutable record of one attempt's outcome and timing.
///
/// `duration` is wall time in milliseconds and is only present when the
/// attempt was not failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogItem {
    pub index: usize,
    pub duration: Option<f64>,
    pub failed: bool,
    pub status_ok: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub metas: LogMetas,
}

impl LogItem {
    pub(crate) fn completed(
        index: usize,
        status: u16,
        duration_ms: f64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        let status_ok = (200..300).contains(&status);
        Self {
            index,
            duration: Some(duration_ms),
            failed: false,
            status_ok,
            start_date,
            end_date,
            metas: LogMetas {
                index,
                number: index.saturating_add(1),
                duration: Some(duration_ms),
                status_ok,
                status: Some(status),
                error_message: None,
            },
        }
    }

    pub(crate) const fn failed(
        index: usize,
        status: Option<u16>,
        message: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            index,
            duration: None,
            failed: true,
            status_ok: false,
            start_date,
            end_date,
            metas: LogMetas {
                index,
                number: index.saturating_add(1),
                duration: None,
                status_ok: false,
                status,
                error_message: Some(message),
            },
        }
    }

    /// Duration contributed to the run average, if any.
    #[must_use]
    pub const fn success_duration(&self) -> Option<f64> {
        if self.failed { None } else { self.duration }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.metas.error_message.as_deref()
    }
}
