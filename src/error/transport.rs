use thiserror::Error;

/// Why a single attempt produced no HTTP response.
///
/// These are recorded on the attempt's log entry instead of aborting the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("DNS resolution failed: {0}")]
    Dns(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Transport error: {0}")]
    Other(String),
}
