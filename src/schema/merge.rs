use serde::Serialize;

use super::defaults::default_rules;
use crate::types::{LintConfig, RuleValue, Rules};

/// A partial rule map completed against the default template, with
/// attribution of which keys deviate from it.
#[derive(Debug, Serialize)]
pub struct MergedRules {
    /// The complete rule map: template values overlaid by the input.
    pub rules: Rules,
    /// Keys whose effective value differs from the template.
    pub overrides: Vec<Override>,
    /// Keys present in the input but unknown to the template. They are kept.
    pub unknown: Vec<String>,
}

/// A single rule whose value was changed from its default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    pub key: String,
    pub default_value: RuleValue,
    pub effective_value: RuleValue,
}

/// Overlays `input` on the template so that every default key is present.
///
/// Input values always win; the template only fills gaps.
pub fn complete_rules(input: &Rules) -> MergedRules {
    let template = default_rules();
    let mut rules = template.clone();
    let mut unknown = Vec::new();

    for (key, value) in input {
        if !template.contains_key(key) {
            unknown.push(key.clone());
        }
        rules.insert(key.clone(), value.clone());
    }

    let overrides = overrides_of(&rules);
    MergedRules {
        rules,
        overrides,
        unknown,
    }
}

/// Completes the rules of a configuration in place of the partial map.
pub fn complete_config(config: LintConfig) -> LintConfig {
    let merged = complete_rules(&config.rules);
    if !merged.unknown.is_empty() {
        tracing::debug!(keys = ?merged.unknown, "keeping rules unknown to the template");
    }
    LintConfig {
        output_style: config.output_style,
        rules: merged.rules,
    }
}

/// Lists template keys whose value in `rules` differs from the default.
pub fn overrides_of(rules: &Rules) -> Vec<Override> {
    default_rules()
        .iter()
        .filter_map(|(key, default_value)| {
            let effective = rules.get(key)?;
            (effective != default_value).then(|| Override {
                key: key.clone(),
                default_value: default_value.clone(),
                effective_value: effective.clone(),
            })
        })
        .collect()
}
