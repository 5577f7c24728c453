use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::args::{DEFAULT_TIMEOUT_MS, HttpMethod};

/// How a completed HTTP exchange with a non-2xx status is classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Only transport-level errors fail an attempt; any status is a response.
    #[default]
    TransportOnly,
    /// Non-2xx responses are failed attempts as well.
    NonSuccessStatus,
}

/// Everything one run needs. Not modified once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub url: String,
    pub verb: HttpMethod,
    pub iterations: usize,
    /// Per-attempt deadline; zero disables it.
    pub timeout: Duration,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub parallel: bool,
    pub failure_policy: FailurePolicy,
}

impl RunSettings {
    #[must_use]
    pub fn new(url: impl Into<String>, verb: HttpMethod, iterations: usize) -> Self {
        Self {
            url: url.into(),
            verb,
            iterations,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            headers: BTreeMap::new(),
            body: None,
            parallel: true,
            failure_policy: FailurePolicy::default(),
        }
    }

    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }

    #[must_use]
    pub const fn mode_label(&self) -> &'static str {
        if self.parallel { "parallel" } else { "sequential" }
    }
}
