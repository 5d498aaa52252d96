//! Client side of the remote lint engine.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::LintError;
use crate::schema::validate::{build_request, parse_response, LintRequest};
use crate::types::{LintConfig, LintResult, Syntax};

pub use http::HttpTransport;

/// Delivers a lint request and returns the decoded JSON body.
///
/// Implementations classify failures as [`LintError::Network`] (no response)
/// or [`LintError::Api`] (non-success status), and may retry internally.
#[async_trait]
pub trait LintTransport: Send + Sync {
    async fn send(&self, request: &LintRequest) -> Result<Value, LintError>;
}

/// Validates the request, sends it, and checks the response envelope.
#[derive(Clone)]
pub struct LintService {
    transport: Arc<dyn LintTransport>,
}

impl LintService {
    pub fn new(transport: Arc<dyn LintTransport>) -> Self {
        Self { transport }
    }

    /// Lints `code` with `config`.
    ///
    /// Returns `Ok(None)` when the server answered but the body yielded no
    /// usable result (null content or a malformed envelope).
    pub async fn lint_code(
        &self,
        code: &str,
        config: &LintConfig,
        syntax: Syntax,
    ) -> Result<Option<LintResult>, LintError> {
        let request = build_request(code, config, syntax)?;

        let body = match self.transport.send(&request).await {
            Ok(body) => body,
            Err(e @ LintError::MalformedResponse { .. }) => {
                tracing::error!(error = %e, "lint response could not be decoded");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match parse_response(body) {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::error!(error = %e, "invalid lint response format");
                Ok(None)
            }
        }
    }
}
