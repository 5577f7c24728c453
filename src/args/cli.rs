use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_bool_env, parse_header, parse_positive_usize, parse_timeout_arg};
use super::types::{HttpMethod, OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "clobbr",
    version,
    about = "Fire a batch of HTTP requests at an endpoint, in parallel or in sequence, and report per-request timings and the average latency."
)]
pub struct RunArgs {
    /// Target URL (a missing scheme defaults to https://, see --no-ssl)
    #[arg(long, short)]
    pub url: Option<String>,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Number of requests to fire
    #[arg(long, short = 'n', default_value = "10", value_parser = parse_positive_usize)]
    pub iterations: PositiveUsize,

    /// Upper bound for --iterations; larger counts are clamped
    #[arg(long = "max-iterations", default_value = "1000", value_parser = parse_positive_usize)]
    pub max_iterations: PositiveUsize,

    /// Send requests one after another instead of all at once
    #[arg(long, short = 's')]
    pub sequential: bool,

    /// Per-request timeout (bare numbers are ms; supports ms/s/m/h; 0 disables)
    #[arg(long, short = 't', default_value = "10000", value_parser = parse_timeout_arg)]
    pub timeout: Duration,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body (ignored for GET/HEAD/OPTIONS)
    #[arg(long, short)]
    pub data: Option<String>,

    /// Use http:// instead of https:// for URLs typed without a scheme
    #[arg(long = "no-ssl")]
    pub no_ssl: bool,

    /// Count non-2xx responses as failed attempts
    #[arg(long = "fail-on-status")]
    pub fail_on_status: bool,

    /// Output format for the run report
    #[arg(long = "output-format", short = 'o', default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Print each response as it completes
    #[arg(long)]
    pub stream: bool,

    /// Path to config file (TOML/JSON). Defaults to ./clobbr.toml or ./clobbr.json if present.
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by CLOBBR_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
