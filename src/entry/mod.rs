//! Command-line front end: arguments and config in, report out.
mod execute;
mod mapper;


use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::RunArgs;
use crate::config::{apply_config, default_config_path, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::system::logger::init_logging;

pub use execute::execute_run;
pub use mapper::{resolve_request_url, settings_from_args};

/// Parses the process arguments, runs once, and prints the report.
///
/// # Errors
///
/// Returns an error for unusable arguments or config, rejected run settings,
/// or output failures.
pub fn run() -> AppResult<()> {
    let Some((mut args, matches)) = parse_args()? else {
        return Ok(());
    };

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    init_logging(args.verbose, args.no_color);

    let settings = settings_from_args(&args)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(execute_run(&args, settings))
}

fn parse_args() -> AppResult<Option<(RunArgs, ArgMatches)>> {
    let mut cmd = RunArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = RunArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    default_config_path().is_none()
}
