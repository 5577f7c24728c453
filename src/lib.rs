//! Core library for the `clobbr` CLI.
//!
//! The [`engine`] fires a configured number of HTTP requests at one endpoint,
//! in parallel or in sequence, publishes an event as each one completes, and
//! returns per-request logs with the average latency. The remaining modules
//! supply the command-line surface around it: argument and config parsing,
//! the `reqwest`-backed transport, and report rendering.
pub mod args;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod http;
pub mod metrics;
pub mod shutdown;
pub mod sinks;
pub mod system;
