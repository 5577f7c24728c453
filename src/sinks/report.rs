use serde::Serialize;

use crate::args::HttpMethod;
use crate::engine::{
    EventKind, FailurePolicy, LogItem, RunEvent, RunProgress, RunResult, RunSettings, RunSummary,
};
use crate::error::AppResult;

use super::format::{format_ms, to_json, write_line};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsReport<'run> {
    url: &'run str,
    verb: HttpMethod,
    iterations: usize,
    parallel: bool,
    timeout_ms: u128,
    failure_policy: FailurePolicy,
}

impl<'run> SettingsReport<'run> {
    fn new(settings: &'run RunSettings) -> Self {
        Self {
            url: &settings.url,
            verb: settings.verb,
            iterations: settings.iterations,
            parallel: settings.parallel,
            timeout_ms: settings.timeout.as_millis(),
            failure_policy: settings.failure_policy,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'run> {
    settings: SettingsReport<'run>,
    summary: &'run RunSummary,
    results: &'run [f64],
    logs: Vec<&'run LogItem>,
}

#[derive(Debug, Serialize)]
struct JsonlResponse<'run> {
    event: EventKind,
    completed: usize,
    iterations: usize,
    log: &'run LogItem,
}

#[derive(Debug, Serialize)]
struct JsonlSummary<'run> {
    event: &'static str,
    summary: &'run RunSummary,
}

/// One terminal line for a completed attempt.
#[must_use]
pub fn progress_line(log: &LogItem, progress: RunProgress) -> String {
    let outcome = match (log.failed, log.metas.status, log.duration) {
        (false, Some(status), Some(duration)) => format!("OK {} {}", status, format_ms(duration)),
        (false, _, _) => "OK".to_owned(),
        (true, _, _) => format!("FAILED {}", log.error_message().unwrap_or("Unknown error")),
    };
    format!(
        "[{:>3}%] #{:<4} {}",
        progress.percent(),
        log.metas.number,
        outcome
    )
}

/// Human-readable summary of a finished run.
///
/// # Errors
///
/// Returns an error if the output buffer cannot be written.
pub fn summary_text(settings: &RunSettings, summary: &RunSummary) -> AppResult<String> {
    let mut output = String::new();
    write_line(
        &mut output,
        &format!(
            "{} {} x{} ({})",
            settings.verb,
            settings.url,
            settings.iterations,
            settings.mode_label()
        ),
    )?;
    if summary.cancelled {
        write_line(
            &mut output,
            &format!(
                "Cancelled after {}/{} request(s).",
                summary.completed, summary.iterations
            ),
        )?;
    }
    write_line(
        &mut output,
        &format!(
            "Requests: {} ok, {} failed, {} total",
            summary.succeeded, summary.failed, summary.completed
        ),
    )?;

    if summary.all_failed {
        write_line(&mut output, "All requests failed.")?;
    } else {
        write_line(
            &mut output,
            &format!(
                "Average: {} ({})",
                format_ms(summary.average_ms),
                summary.grade.as_str()
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "Min/Max: {} / {}",
                format_ms(summary.min_ms),
                format_ms(summary.max_ms)
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "P50/P90/P99: {} / {} / {}",
                format_ms(summary.p50_ms),
                format_ms(summary.p90_ms),
                format_ms(summary.p99_ms)
            ),
        )?;
    }

    if !summary.common_failures.is_empty() {
        write_line(&mut output, "Common failures:")?;
        for group in &summary.common_failures {
            write_line(&mut output, &format!("  {}x {}", group.count, group.message))?;
        }
    }
    Ok(output)
}

/// Full machine-readable report: settings, summary, durations, and logs.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn json_report(
    settings: &RunSettings,
    result: &RunResult,
    summary: &RunSummary,
) -> AppResult<String> {
    let report = JsonReport {
        settings: SettingsReport::new(settings),
        summary,
        results: &result.results,
        logs: result.logs.iter().map(|log| &**log).collect(),
    };
    to_json(&report, true)
}

/// JSON line for a per-attempt event; lifecycle events produce nothing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn jsonl_event(event: &RunEvent, iterations: usize) -> AppResult<Option<String>> {
    match event {
        RunEvent::Response { kind, log, logs } => {
            let line = JsonlResponse {
                event: *kind,
                completed: logs.len(),
                iterations,
                log: &**log,
            };
            to_json(&line, false).map(Some)
        }
        RunEvent::Started { .. } | RunEvent::Finished { .. } => Ok(None),
    }
}

/// Closing JSON line carrying the run summary.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn jsonl_summary(summary: &RunSummary) -> AppResult<String> {
    to_json(
        &JsonlSummary {
            event: "SUMMARY",
            summary,
        },
        false,
    )
}
