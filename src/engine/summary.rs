use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::metrics::{LatencyHistogram, Percentiles};

use super::RunResult;

/// Coarse bucket for an average latency, by whole seconds rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyGrade {
    Fast,
    Moderate,
    Slow,
    VerySlow,
    /// Beyond three seconds.
    Critical,
}

impl LatencyGrade {
    #[must_use]
    pub fn from_ms(duration_ms: f64) -> Self {
        match (duration_ms / 1000.0).round() as u64 {
            0 => LatencyGrade::Fast,
            1 => LatencyGrade::Moderate,
            2 => LatencyGrade::Slow,
            3 => LatencyGrade::VerySlow,
            _ => LatencyGrade::Critical,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LatencyGrade::Fast => "fast",
            LatencyGrade::Moderate => "moderate",
            LatencyGrade::Slow => "slow",
            LatencyGrade::VerySlow => "very slow",
            LatencyGrade::Critical => "critical",
        }
    }
}

/// A failure message and how many attempts reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureGroup {
    pub message: String,
    pub count: usize,
}

/// Completion of a run in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunProgress {
    pub completed: usize,
    pub iterations: usize,
}

impl RunProgress {
    #[must_use]
    pub const fn new(completed: usize, iterations: usize) -> Self {
        Self {
            completed,
            iterations,
        }
    }

    /// Rounded completion percentage, 0..=100.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.iterations == 0 {
            return 100;
        }
        let percent = (self.completed as f64 * 100.0 / self.iterations as f64).round();
        percent.clamp(0.0, 100.0) as u8
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed >= self.iterations
    }
}

/// Figures derived from a finished run for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub iterations: usize,
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub average_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
    pub all_failed: bool,
    pub cancelled: bool,
    pub grade: LatencyGrade,
    pub common_failures: Vec<FailureGroup>,
}

impl RunSummary {
    #[must_use]
    pub fn from_result(result: &RunResult, iterations: usize) -> Self {
        let failed = result.failed_count();
        let completed = result.logs.len();
        let min_ms = result.results.iter().copied().reduce(f64::min).unwrap_or(0.0);
        let max_ms = result.results.iter().copied().reduce(f64::max).unwrap_or(0.0);
        let percentiles = percentiles(&result.results);

        Self {
            iterations,
            completed,
            succeeded: completed.saturating_sub(failed),
            failed,
            average_ms: result.average,
            min_ms,
            max_ms,
            p50_ms: percentiles.p50,
            p90_ms: percentiles.p90,
            p99_ms: percentiles.p99,
            all_failed: completed > 0 && failed == completed,
            cancelled: result.cancelled,
            grade: LatencyGrade::from_ms(result.average),
            common_failures: common_failures(result),
        }
    }
}

fn percentiles(results: &[f64]) -> Percentiles {
    let mut hist = match LatencyHistogram::new() {
        Ok(hist) => hist,
        Err(err) => {
            warn!("{}", err);
            return Percentiles::default();
        }
    };
    for duration in results {
        if let Err(err) = hist.record_ms(*duration) {
            warn!("{}", err);
        }
    }
    hist.percentiles()
}

/// Failure messages grouped with counts, most frequent first, then by message.
fn common_failures(result: &RunResult) -> Vec<FailureGroup> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for log in result.logs.iter().filter(|log| log.failed) {
        let message = log.error_message().unwrap_or("Unknown error");
        let count = counts.entry(message).or_insert(0);
        *count = count.saturating_add(1);
    }
    let mut groups: Vec<FailureGroup> = counts
        .into_iter()
        .map(|(message, count)| FailureGroup {
            message: message.to_owned(),
            count,
        })
        .collect();
    groups.sort_by(|left, right| {
        right
            .count
            .cmp(&left.count)
            .then_with(|| left.message.cmp(&right.message))
    });
    groups
}
