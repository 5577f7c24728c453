//! Latency distribution helpers.
mod histogram;

pub use histogram::{LatencyHistogram, Percentiles};
