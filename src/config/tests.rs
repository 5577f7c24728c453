use super::{
    ConfigFormat, apply_config, load_config, load_config_file,
    types::{ConfigFile, TimeoutValue},
};
use clap::{CommandFactory, FromArgMatches};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

use crate::args::{HttpMethod, OutputFormat, RunArgs};
use crate::error::{AppError, ConfigError};

fn args_from(argv: &[&str]) -> Result<(RunArgs, clap::ArgMatches), String> {
    let matches = RunArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("parse args failed: {}", err))?;
    let args =
        RunArgs::from_arg_matches(&matches).map_err(|err| format!("parse args failed: {}", err))?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("clobbr.toml");
    let content = r#"
url = "http://localhost:3000/health"
verb = "post"
iterations = 25
parallel = false
timeout = "3s"
data = "{\"ping\":true}"
output_format = "json"

[headers]
Authorization = "Bearer token"
"X-Empty" = ""
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;

    if config.url.as_deref() != Some("http://localhost:3000/health") {
        return Err("Unexpected url".to_owned());
    }
    if config.method != Some(HttpMethod::Post) {
        return Err("Expected verb alias to parse as POST".to_owned());
    }
    if config.iterations != Some(25) || config.parallel != Some(false) {
        return Err("Unexpected iterations/parallel".to_owned());
    }
    let timeout = config.timeout.as_ref().ok_or("Expected timeout")?;
    if timeout.to_duration().map_err(|err| err.to_string())? != Duration::from_secs(3) {
        return Err("Unexpected timeout".to_owned());
    }
    let headers = config.headers.as_ref().ok_or("Expected headers")?;
    if headers.get("Authorization").map(String::as_str) != Some("Bearer token")
        || headers.get("X-Empty").map(String::as_str) != Some("")
    {
        return Err(format!("Unexpected headers: {:?}", headers));
    }
    if config.output_format != Some(OutputFormat::Json) {
        return Err("Unexpected output_format".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("clobbr.json");
    let content = r#"{
  "url": "api.example.com/items",
  "method": "delete",
  "timeout": 2500,
  "ssl": false,
  "fail_on_status": true
}"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;

    if config.method != Some(HttpMethod::Delete) {
        return Err("Unexpected method".to_owned());
    }
    match config.timeout {
        Some(TimeoutValue::Millis(2500)) => {}
        other => return Err(format!("Unexpected timeout: {:?}", other)),
    }
    if config.ssl != Some(false) || config.fail_on_status != Some(true) {
        return Err("Unexpected ssl/fail_on_status".to_owned());
    }
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("clobbr.toml");
    std::fs::write(&path, "url = \"http://x\"\nconcurrency = 4\n")
        .map_err(|err| format!("write failed: {}", err))?;

    if load_config_file(&path).is_ok() {
        return Err("Expected unknown key to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let yaml = dir.path().join("clobbr.yaml");
    let bare = dir.path().join("clobbr");
    for path in [&yaml, &bare] {
        std::fs::write(path, "url: http://x\n").map_err(|err| format!("write failed: {}", err))?;
        if load_config_file(path).is_ok() {
            return Err(format!("Expected {} to be rejected", path.display()));
        }
    }
    Ok(())
}

#[test]
fn apply_config_fills_unset_arguments() -> Result<(), String> {
    let mut headers = BTreeMap::new();
    headers.insert("X-Trace".to_owned(), "abc".to_owned());
    let config = ConfigFile {
        url: Some("http://localhost:8080".to_owned()),
        method: Some(HttpMethod::Patch),
        iterations: Some(40),
        max_iterations: Some(50),
        parallel: Some(false),
        timeout: Some(TimeoutValue::Text("1m".to_owned())),
        headers: Some(headers),
        data: Some("body".to_owned()),
        ssl: Some(false),
        fail_on_status: Some(true),
        output_format: Some(OutputFormat::Jsonl),
        stream: Some(true),
        no_color: None,
    };
    let (mut args, matches) = args_from(&["clobbr"])?;

    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    let checks = [
        (args.url.as_deref() == Some("http://localhost:8080"), "url"),
        (args.method == HttpMethod::Patch, "method"),
        (args.iterations.get() == 40, "iterations"),
        (args.max_iterations.get() == 50, "max_iterations"),
        (args.sequential, "sequential"),
        (args.timeout == Duration::from_secs(60), "timeout"),
        (
            args.headers == vec![("X-Trace".to_owned(), "abc".to_owned())],
            "headers",
        ),
        (args.data.as_deref() == Some("body"), "data"),
        (args.no_ssl, "no_ssl"),
        (args.fail_on_status, "fail_on_status"),
        (args.output_format == OutputFormat::Jsonl, "output_format"),
        (args.stream, "stream"),
    ];
    for (ok, field) in checks {
        if !ok {
            return Err(format!("Config value not applied: {}", field));
        }
    }
    Ok(())
}

#[test]
fn cli_values_win_over_config() -> Result<(), String> {
    let config = ConfigFile {
        url: Some("http://from-config".to_owned()),
        iterations: Some(40),
        parallel: Some(false),
        timeout: Some(TimeoutValue::Millis(1)),
        ..ConfigFile::default()
    };
    let (mut args, matches) = args_from(&[
        "clobbr",
        "-u",
        "http://from-cli",
        "-n",
        "3",
        "--timeout",
        "750ms",
    ])?;

    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.url.as_deref() != Some("http://from-cli") {
        return Err("CLI url was overwritten".to_owned());
    }
    if args.iterations.get() != 3 {
        return Err("CLI iterations were overwritten".to_owned());
    }
    if args.timeout != Duration::from_millis(750) {
        return Err("CLI timeout was overwritten".to_owned());
    }
    if !args.sequential {
        return Err("Config parallel=false should still apply".to_owned());
    }
    Ok(())
}

#[test]
fn apply_config_rejects_zero_iterations() -> Result<(), String> {
    let config = ConfigFile {
        iterations: Some(0),
        ..ConfigFile::default()
    };
    let (mut args, matches) = args_from(&["clobbr"])?;

    if apply_config(&mut args, &matches, &config).is_ok() {
        return Err("Expected zero iterations to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn apply_config_rejects_bad_timeout() -> Result<(), String> {
    let config = ConfigFile {
        timeout: Some(TimeoutValue::Text("soon".to_owned())),
        ..ConfigFile::default()
    };
    let (mut args, matches) = args_from(&["clobbr"])?;

    if apply_config(&mut args, &matches, &config).is_ok() {
        return Err("Expected invalid timeout to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn config_format_follows_extension() -> Result<(), String> {
    let cases = [
        ("run.toml", Some(ConfigFormat::Toml)),
        ("nested/run.json", Some(ConfigFormat::Json)),
        ("run.yaml", None),
        ("run", None),
    ];
    for (name, expected) in cases {
        let format = ConfigFormat::from_path(Path::new(name)).ok();
        if format != expected {
            return Err(format!("{}: expected {:?}, got {:?}", name, expected, format));
        }
    }
    match ConfigFormat::from_path(Path::new("run")) {
        Err(ConfigError::MissingExtension) => Ok(()),
        other => Err(format!("Expected MissingExtension, got {:?}", other)),
    }
}

#[test]
fn explicit_config_path_is_loaded() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("custom.json");
    std::fs::write(&path, r#"{"iterations": 7}"#)
        .map_err(|err| format!("write failed: {}", err))?;
    let explicit = path.to_str().ok_or("Expected a UTF-8 temp path")?;

    let config = load_config(Some(explicit)).map_err(|err| err.to_string())?;

    match config {
        Some(loaded) if loaded.iterations == Some(7) => Ok(()),
        other => Err(format!("Expected the explicit file, got {:?}", other)),
    }
}

#[test]
fn missing_explicit_config_is_a_read_error() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("absent.toml");
    let explicit = path.to_str().ok_or("Expected a UTF-8 temp path")?;

    match load_config(Some(explicit)) {
        Err(AppError::Config(ConfigError::ReadConfig { .. })) => Ok(()),
        other => Err(format!("Expected ReadConfig, got {:?}", other)),
    }
}
