use std::collections::BTreeMap;

use http::header::{HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::args::RunArgs;
use crate::engine::{FailurePolicy, RunSettings};
use crate::error::{AppError, AppResult, HttpError, ValidationError};

/// Turns parsed arguments into the immutable settings for one run.
///
/// Clamps the iteration count to `--max-iterations`, drops headers with an
/// empty name, and ignores a body for methods that do not send one. URL and
/// verb are left for the run's own validation.
///
/// # Errors
///
/// Returns an error when no URL was given or a header is not valid HTTP.
pub fn settings_from_args(args: &RunArgs) -> AppResult<RunSettings> {
    let raw_url = args
        .url
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
    let url = resolve_request_url(raw_url, !args.no_ssl);

    let requested = args.iterations.get();
    let max = args.max_iterations.get();
    let iterations = if requested > max {
        warn!(
            "Requested {} iterations; clamping to the maximum of {}.",
            requested, max
        );
        max
    } else {
        requested
    };

    let body = match args.data.as_ref() {
        Some(_) if args.method.is_bodyless() => {
            warn!("Ignoring request body for {} requests.", args.method);
            None
        }
        data => data.cloned(),
    };

    let failure_policy = if args.fail_on_status {
        FailurePolicy::NonSuccessStatus
    } else {
        FailurePolicy::TransportOnly
    };

    let mut settings = RunSettings::new(url, args.method, iterations)
        .parallel(!args.sequential)
        .with_timeout(args.timeout)
        .with_failure_policy(failure_policy);
    settings.headers = collect_headers(&args.headers)?;
    settings.body = body;
    Ok(settings)
}

/// Prefixes a scheme onto URLs typed without one: `https://` when `ssl` is
/// set, `http://` otherwise. URLs that already carry a scheme are untouched.
#[must_use]
pub fn resolve_request_url(input: &str, ssl: bool) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        return trimmed.to_owned();
    }
    let scheme = if ssl { "https" } else { "http" };
    format!("{}://{}", scheme, trimmed)
}

fn collect_headers(pairs: &[(String, String)]) -> AppResult<BTreeMap<String, String>> {
    let mut headers = BTreeMap::new();
    for (key, value) in pairs {
        let key = key.trim();
        if key.is_empty() {
            debug!("Skipping header with an empty name.");
            continue;
        }
        HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderName {
                header: key.to_owned(),
                source: err,
            })
        })?;
        HeaderValue::from_str(value).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderValue {
                header: key.to_owned(),
                source: err,
            })
        })?;
        headers.insert(key.to_owned(), value.clone());
    }
    Ok(headers)
}
