use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::ValidationIssue;

const GENERIC_VALIDATION_MESSAGE: &str = "Please check your input";
const NETWORK_MESSAGE: &str = "Unable to connect to the lint server";

/// Error taxonomy shared by the stores, the lint service and the orchestrator.
///
/// Serialized with a `kind` tag so the presentation layer can branch on it:
///
/// ```json
/// { "kind": "api", "status": 502, "message": "...", "payload": null }
/// ```
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LintError {
    /// Rejected locally before any network call.
    #[error("validation failed: {} issue(s)", .errors.len())]
    LocalValidation { errors: Vec<ValidationIssue> },

    /// No HTTP response was obtained.
    #[error("network error: {message}")]
    Network { message: String },

    /// Non-success HTTP status from the backend.
    #[error("api error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    /// Response envelope did not match the expected shape.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("preset capacity of {max} reached")]
    Capacity { max: usize },

    #[error("a preset named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("preset name is empty")]
    EmptyName,

    #[error("preset name exceeds {max} characters")]
    NameTooLong { max: usize },

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl From<StorageError> for LintError {
    fn from(err: StorageError) -> Self {
        LintError::Storage {
            message: err.to_string(),
        }
    }
}

impl LintError {
    pub fn validation(path: &str, message: impl Into<String>, code: &str) -> Self {
        LintError::LocalValidation {
            errors: vec![ValidationIssue::new(path, message, code)],
        }
    }

    pub fn network() -> Self {
        LintError::Network {
            message: NETWORK_MESSAGE.to_string(),
        }
    }

    /// Builds an [`LintError::Api`] from a status and the raw response body,
    /// preferring a backend-provided `message` field.
    pub fn api(status: u16, payload: Option<Value>) -> Self {
        let message = payload
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Server error ({})", status));

        LintError::Api {
            status,
            message,
            payload,
        }
    }

    /// The one string shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            LintError::LocalValidation { errors } => errors
                .first()
                .map(|issue| issue.message.clone())
                .unwrap_or_else(|| GENERIC_VALIDATION_MESSAGE.to_string()),
            LintError::Network { message } | LintError::Api { message, .. } => message.clone(),
            LintError::MalformedResponse { .. } => {
                "The lint server returned an unexpected response".to_string()
            }
            LintError::Capacity { max } => {
                format!("You can save at most {} presets. Delete one to save a new preset.", max)
            }
            LintError::DuplicateName { name } => {
                format!("A preset named '{}' already exists.", name)
            }
            LintError::EmptyName => "Please enter a preset name.".to_string(),
            LintError::NameTooLong { max } => {
                format!("Preset names can be at most {} characters.", max)
            }
            LintError::Storage { .. } => "Your settings could not be saved.".to_string(),
        }
    }

    /// Whether the transport should try again before surfacing this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            LintError::Network { .. } => true,
            LintError::Api { status, .. } => {
                matches!(status, 408 | 409 | 425 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

/// Failures of the durable key-value store.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("storage quota exceeded writing {key} ({limit} bytes)")]
    QuotaExceeded { key: String, limit: usize },

    #[error("invalid storage key: {key}")]
    InvalidKey { key: String },

    #[error("storage i/o failed for {key}: {message}")]
    Io { key: String, message: String },
}
