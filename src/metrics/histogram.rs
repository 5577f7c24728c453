use hdrhistogram::Histogram;

/// Latency distribution recorded at microsecond resolution.
#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

/// Latency percentiles in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Percentiles {
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, String> {
        let hist = Histogram::<u64>::new(3)
            .map_err(|err| format!("Failed to create histogram: {}", err))?;
        Ok(Self { hist })
    }

    /// Record a latency value in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record_ms(&mut self, latency_ms: f64) -> Result<(), String> {
        let micros = (latency_ms.max(0.0) * 1000.0).round() as u64;
        self.hist
            .record(micros.max(1))
            .map_err(|err| format!("Failed to record latency: {}", err))
    }

    #[must_use]
    pub fn percentiles(&self) -> Percentiles {
        if self.count() == 0 {
            return Percentiles::default();
        }

        Percentiles {
            p50: micros_to_ms(self.hist.value_at_quantile(0.5)),
            p90: micros_to_ms(self.hist.value_at_quantile(0.9)),
            p99: micros_to_ms(self.hist.value_at_quantile(0.99)),
        }
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}

fn micros_to_ms(micros: u64) -> f64 {
    micros as f64 / 1000.0
}
