//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::RunArgs;
pub use types::{HttpMethod, OutputFormat, PositiveUsize};

pub(crate) use defaults::{DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};
pub(crate) use parsers::parse_timeout_value;
#[cfg(test)]
pub(crate) use test_support::parse_test_args;
