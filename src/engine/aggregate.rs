/// Arithmetic mean of successful durations in milliseconds; 0 when empty.
#[must_use]
pub fn average(results: &[f64]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let sum: f64 = results.iter().sum();
    sum / results.len() as f64
}

/// Incremental form of [`average`], updated as durations arrive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningAverage {
    sum: f64,
    count: usize,
}

impl RunningAverage {
    pub fn push(&mut self, duration_ms: f64) {
        self.sum += duration_ms;
        self.count = self.count.saturating_add(1);
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}
