use std::time::Duration;

use reqwest::{Client, redirect};

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError};

/// Connection-level knobs for the shared client. Per-request deadlines are
/// applied by the executor, not here.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub user_agent: String,
    pub redirect_limit: usize,
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            redirect_limit: 10,
            connect_timeout: None,
        }
    }
}

/// Builds the pooled HTTP client used by every attempt in a run.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialized.
pub fn build_client(options: &ClientOptions) -> AppResult<Client> {
    let mut builder = Client::builder()
        .user_agent(options.user_agent.as_str())
        .redirect(redirect::Policy::limited(options.redirect_limit));
    if let Some(timeout) = options.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
