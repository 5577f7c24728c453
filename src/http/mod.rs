//! HTTP transport and single-attempt execution.
mod client;
mod executor;
mod transport;


pub use client::{ClientOptions, build_client};
pub use executor::execute;
pub use transport::{AttemptRequest, AttemptResponse, ReqwestTransport, Transport};
