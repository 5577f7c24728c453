use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::args::{HttpMethod, OutputFormat, parse_timeout_value};
use crate::error::ValidationError;

/// Run defaults read from `clobbr.toml` / `clobbr.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    #[serde(alias = "verb")]
    pub method: Option<HttpMethod>,
    pub iterations: Option<usize>,
    pub max_iterations: Option<usize>,
    pub parallel: Option<bool>,
    pub timeout: Option<TimeoutValue>,
    pub headers: Option<BTreeMap<String, String>>,
    pub data: Option<String>,
    pub ssl: Option<bool>,
    pub fail_on_status: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub stream: Option<bool>,
    pub no_color: Option<bool>,
}

/// Timeouts are either a number of milliseconds or a suffixed string ("10s").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeoutValue {
    Millis(u64),
    Text(String),
}

impl TimeoutValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            TimeoutValue::Millis(ms) => Ok(Duration::from_millis(*ms)),
            TimeoutValue::Text(text) => parse_timeout_value(text),
        }
    }
}
