use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;

use super::LintTransport;
use crate::errors::LintError;
use crate::schema::validate::LintRequest;
use crate::settings::Settings;

const USER_AGENT_VALUE: &str = concat!("lintpad/", env!("CARGO_PKG_VERSION"));

/// JSON-over-HTTP transport for `POST {api}/lint`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    retries: u32,
    retry_delay: Duration,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Result<Self, LintError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| LintError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: settings.lint_endpoint(),
            retries: settings.retries,
            retry_delay: settings.retry_delay,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn attempt(&self, request: &LintRequest) -> Result<Value, LintError> {
        tracing::debug!(endpoint = %self.endpoint, syntax = ?request.syntax, "lint request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "lint request failed without a response");
                LintError::network()
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read lint response body");
            LintError::network()
        })?;
        let body = decode_body(&bytes);
        tracing::debug!(status = status.as_u16(), "lint response");

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "lint api returned an error");
            return Err(LintError::api(status.as_u16(), body));
        }

        match body {
            Some(Value::String(_)) | None => Err(LintError::MalformedResponse {
                message: "response body is not JSON".to_string(),
            }),
            Some(value) => Ok(value),
        }
    }
}

#[async_trait]
impl LintTransport for HttpTransport {
    async fn send(&self, request: &LintRequest) -> Result<Value, LintError> {
        with_retries(self.retries, self.retry_delay, || self.attempt(request)).await
    }
}

/// JSON bodies decode as-is; anything else is kept as text.
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
}

/// Runs `op`, retrying up to `retries` more times while the error is
/// retryable.
async fn with_retries<F, Fut>(retries: u32, delay: Duration, mut op: F) -> Result<Value, LintError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Value, LintError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(e) if e.is_retryable() && attempt < retries => {
                attempt += 1;
                tracing::warn!(attempt, error = %e, "retrying lint request");
                tokio::time::sleep(delay).await;
            }
            outcome => return outcome,
        }
    }
}
