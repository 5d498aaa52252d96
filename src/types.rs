use std::collections::BTreeMap;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Source language of the code being linted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    #[default]
    Css,
    Html,
}

impl Syntax {
    pub fn label(self) -> &'static str {
        match self {
            Syntax::Css => "CSS",
            Syntax::Html => "HTML",
        }
    }
}

/// Formatting style the lint engine applies to its `output`.
///
/// `Default` serializes as the empty string and is omitted from requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputStyle {
    #[default]
    #[serde(rename = "")]
    Default,
    #[serde(rename = "nested")]
    Nested,
    #[serde(rename = "compact")]
    Compact,
}

impl OutputStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputStyle::Default => "",
            OutputStyle::Nested => "nested",
            OutputStyle::Compact => "compact",
        }
    }
}

/// A single rule setting.
///
/// Raw UI text is converted with [`RuleValue::coerce`]; JSON input maps
/// directly onto the variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<String>),
}

impl RuleValue {
    /// Converts raw text: `"true"`/`"false"` become booleans, numeric text
    /// becomes a number, anything else stays a string.
    ///
    /// Blank text is kept as a string rather than read as zero.
    pub fn coerce(raw: &str) -> RuleValue {
        match raw {
            "true" => return RuleValue::Bool(true),
            "false" => return RuleValue::Bool(false),
            _ => {}
        }

        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if let Ok(int) = trimmed.parse::<i64>() {
                return RuleValue::Number(Number::from(int));
            }
            if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                return RuleValue::Number(number);
            }
        }

        RuleValue::Text(raw.to_string())
    }

    /// Parses a JSON value into a rule value, or `None` if it has an
    /// unsupported shape (null, object, or a list with non-string entries).
    pub fn from_json(value: &Value) -> Option<RuleValue> {
        match value {
            Value::Bool(b) => Some(RuleValue::Bool(*b)),
            Value::Number(n) => Some(RuleValue::Number(n.clone())),
            Value::String(s) => Some(RuleValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(RuleValue::List),
            Value::Null | Value::Object(_) => None,
        }
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Bool(value)
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        RuleValue::Number(Number::from(value))
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for RuleValue {
    fn from(value: Vec<String>) -> Self {
        RuleValue::List(value)
    }
}

/// Rule key -> setting. Always complete once it lives in a store.
pub type Rules = BTreeMap<String, RuleValue>;

/// The full rule set plus output-style preference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintConfig {
    #[serde(default)]
    pub output_style: OutputStyle,
    pub rules: Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding reported by the lint engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub line: NonZeroU32,
    pub column: u32,
    pub text: String,
    pub rule: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LintInfo {
    pub version: String,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

/// Payload of a successful lint invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    pub warnings: Vec<Warning>,
    pub info: LintInfo,
    pub output: String,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub has_syntax_error: Option<bool>,
}

// Optional engine fields may be absent, but an explicit `null` is malformed.
fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Session flags for the lint panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintStatus {
    pub is_loaded: bool,
    pub is_loading: bool,
    pub is_show_rules: bool,
    pub is_css_syntax_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetId(String);

impl PresetId {
    pub fn generate() -> Self {
        PresetId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PresetId {
    fn from(value: &str) -> Self {
        PresetId(value.to_string())
    }
}

impl std::fmt::Display for PresetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, timestamped snapshot of a [`LintConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    pub config: LintConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single validation finding, surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
    pub code: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>, code: &str) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code: code.to_string(),
        }
    }
}
