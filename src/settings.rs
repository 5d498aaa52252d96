use std::path::PathBuf;
use std::time::Duration;

use crate::platform::paths;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Runtime settings for the lint client, resolved from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the lint API; requests go to `{api_base_url}/lint`.
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Extra attempts after the first for retryable failures.
    pub retries: u32,
    pub retry_delay: Duration,
    pub data_dir: PathBuf,
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retries: DEFAULT_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            data_dir: paths::resolve_data_dir(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Reads `LINTPAD_*` variables, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_base_url: non_empty("LINTPAD_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            request_timeout: parse_number(&lookup, "LINTPAD_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            retries: parse_number(&lookup, "LINTPAD_RETRIES")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.retries),
            retry_delay: parse_number(&lookup, "LINTPAD_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
            data_dir: defaults.data_dir,
            log_level: non_empty("LINTPAD_LOG").unwrap_or(defaults.log_level),
        }
    }

    pub fn lint_endpoint(&self) -> String {
        format!("{}/lint", self.api_base_url)
    }
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(name, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
