use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::merge::complete_config;
use crate::errors::LintError;
use crate::types::{LintConfig, LintResult, OutputStyle, RuleValue, Rules, Syntax, ValidationIssue};

/// Outcome of checking a configuration.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// Body of a lint request, as sent to the lint service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintRequest {
    pub code: String,
    pub config: RequestConfig,
    pub syntax: Syntax,
}

/// Request-side view of a configuration: the default output style is
/// omitted rather than sent as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    pub rules: Rules,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_style: Option<OutputStyle>,
}

/// Checks a configuration for structural problems.
///
/// Pattern rules (`*-pattern` keys with a string value) are compiled as
/// regular expressions. The lint engine uses its own regex dialect, so a
/// pattern that fails here is only reported as a warning.
pub fn validate_config(config: &LintConfig) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (key, value) in &config.rules {
        if key.trim().is_empty() {
            errors.push(ValidationIssue::new(
                "config.rules",
                "Rule names must not be empty",
                "EMPTY_RULE_KEY",
            ));
            continue;
        }

        let RuleValue::Text(pattern) = value else {
            continue;
        };
        if key.ends_with("-pattern") {
            if let Err(e) = Regex::new(pattern) {
                warnings.push(ValidationIssue::new(
                    format!("config.rules.{}", key),
                    format!("Pattern for '{}' may be invalid: {}", key, e),
                    "INVALID_PATTERN",
                ));
            }
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Validates the outbound request shape and builds the request body.
///
/// Nothing leaves the process if this fails.
pub fn build_request(
    code: &str,
    config: &LintConfig,
    syntax: Syntax,
) -> Result<LintRequest, LintError> {
    let mut errors = Vec::new();
    if code.is_empty() {
        errors.push(ValidationIssue::new("code", "Please enter some code", "EMPTY_CODE"));
    }

    let report = validate_config(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, "{}", warning.message);
    }
    errors.extend(report.errors);

    if !errors.is_empty() {
        return Err(LintError::LocalValidation { errors });
    }

    let output_style = match config.output_style {
        OutputStyle::Default => None,
        style => Some(style),
    };

    Ok(LintRequest {
        code: code.to_string(),
        config: RequestConfig {
            rules: config.rules.clone(),
            output_style,
        },
        syntax,
    })
}

/// Parses the `{ content: LintResult | null }` envelope.
///
/// `Ok(None)` means the server explicitly returned no content.
pub fn parse_response(body: Value) -> Result<Option<LintResult>, LintError> {
    let Value::Object(mut envelope) = body else {
        return Err(malformed("response body is not an object"));
    };

    match envelope.remove("content") {
        None => Err(malformed("response is missing the `content` field")),
        Some(Value::Null) => Ok(None),
        Some(content) => serde_json::from_value::<LintResult>(content)
            .map(Some)
            .map_err(|e| malformed(&e.to_string())),
    }
}

fn malformed(message: &str) -> LintError {
    LintError::MalformedResponse {
        message: message.to_string(),
    }
}

/// Parses a user-supplied configuration blob (file contents or clipboard
/// text).
///
/// A structurally present, object-typed `rules` field is required. The
/// accepted configuration is completed against the default template.
pub fn parse_import(text: &str) -> Result<LintConfig, LintError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        LintError::validation(
            "",
            format!("Not a valid configuration file: {}", e),
            "INVALID_JSON",
        )
    })?;

    let Value::Object(object) = value else {
        return Err(LintError::validation(
            "",
            "Configuration must be a JSON object",
            "INVALID_TYPE",
        ));
    };

    let Some(Value::Object(raw_rules)) = object.get("rules") else {
        return Err(LintError::validation(
            "rules",
            "Configuration is missing a `rules` object",
            "MISSING_RULES",
        ));
    };

    let mut errors = Vec::new();
    let mut rules = Rules::new();
    for (key, raw) in raw_rules {
        match RuleValue::from_json(raw) {
            Some(value) => {
                rules.insert(key.clone(), value);
            }
            None => errors.push(ValidationIssue::new(
                format!("rules.{}", key),
                format!("Unsupported value for rule '{}'", key),
                "INVALID_RULE_VALUE",
            )),
        }
    }

    let output_style = match object.get("outputStyle") {
        None | Some(Value::Null) => OutputStyle::Default,
        Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_else(|_| {
            errors.push(ValidationIssue::new(
                "outputStyle",
                "outputStyle must be \"\", \"nested\" or \"compact\"",
                "INVALID_OUTPUT_STYLE",
            ));
            OutputStyle::Default
        }),
    };

    let config = LintConfig {
        output_style,
        rules,
    };
    errors.extend(validate_config(&config).errors);

    if !errors.is_empty() {
        return Err(LintError::LocalValidation { errors });
    }

    Ok(complete_config(config))
}
