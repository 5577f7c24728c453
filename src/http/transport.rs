use std::collections::BTreeMap;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;

use crate::args::HttpMethod;
use crate::engine::RunSettings;
use crate::error::TransportError;

/// One HTTP call as handed to a [`Transport`]. Borrows from the run settings.
#[derive(Debug, Clone, Copy)]
pub struct AttemptRequest<'settings> {
    pub method: HttpMethod,
    pub url: &'settings str,
    pub headers: &'settings BTreeMap<String, String>,
    pub body: Option<&'settings str>,
}

impl<'settings> AttemptRequest<'settings> {
    #[must_use]
    pub fn from_settings(settings: &'settings RunSettings) -> Self {
        Self {
            method: settings.verb,
            url: settings.url.as_str(),
            headers: &settings.headers,
            body: settings.body.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptResponse {
    pub status: u16,
    pub response_bytes: u64,
}

/// Performs a single HTTP call. Implementations are shared across
/// concurrently running attempts.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &AttemptRequest<'_>) -> Result<AttemptResponse, TransportError>;
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &AttemptRequest<'_>) -> Result<AttemptResponse, TransportError> {
        let mut builder = self
            .client
            .request(reqwest::Method::from(request.method), request.url);
        for (key, value) in request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body.to_owned());
        }

        let response = builder.send().await.map_err(|err| classify_error(&err))?;
        let status = response.status().as_u16();
        let response_bytes = drain_response_body(response)
            .await
            .map_err(|err| classify_error(&err))?;
        Ok(AttemptResponse {
            status,
            response_bytes,
        })
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

pub(super) fn classify_error(err: &reqwest::Error) -> TransportError {
    let message = error_chain(err);
    if err.is_timeout() {
        TransportError::Timeout(message)
    } else if err.is_connect() {
        if is_dns_failure(&message) {
            TransportError::Dns(message)
        } else {
            TransportError::Connect(message)
        }
    } else if err.is_request() || err.is_body() || err.is_decode() || err.is_redirect() {
        TransportError::Protocol(message)
    } else {
        TransportError::Other(message)
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub(super) fn is_dns_failure(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("name or service not known")
        || lower.contains("no such host")
}
