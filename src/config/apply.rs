use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, RunArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

/// Fills every argument not given on the command line from the config file.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(args: &mut RunArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "iterations")
        && let Some(iterations) = config.iterations
    {
        args.iterations = ensure_positive_usize(iterations, "iterations")?;
    }

    if !is_cli(matches, "max_iterations")
        && let Some(max_iterations) = config.max_iterations
    {
        args.max_iterations = ensure_positive_usize(max_iterations, "max_iterations")?;
    }

    if !is_cli(matches, "sequential")
        && let Some(parallel) = config.parallel
    {
        args.sequential = !parallel;
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = timeout
            .to_duration()
            .map_err(|err| AppError::config(ConfigError::InvalidTimeout { source: err }))?;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        args.headers = headers
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
    }

    if !is_cli(matches, "data")
        && let Some(data) = config.data.clone()
    {
        args.data = Some(data);
    }

    if !is_cli(matches, "no_ssl")
        && let Some(ssl) = config.ssl
    {
        args.no_ssl = !ssl;
    }

    if !is_cli(matches, "fail_on_status")
        && let Some(value) = config.fail_on_status
    {
        args.fail_on_status = value;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "stream")
        && let Some(value) = config.stream
    {
        args.stream = value;
    }

    if matches.value_source("no_color") != Some(ValueSource::CommandLine)
        && matches.value_source("no_color") != Some(ValueSource::EnvVariable)
        && let Some(value) = config.no_color
    {
        args.no_color = value;
    }

    Ok(())
}
