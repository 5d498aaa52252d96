use std::sync::LazyLock;

use crate::types::{LintConfig, OutputStyle, RuleValue, Rules};

/// Maximum number of saved presets.
pub const MAX_PRESETS: usize = 50;

/// Maximum preset name length, in characters, after trimming.
pub const MAX_PRESET_NAME_LEN: usize = 100;

/// Storage key holding the serialized [`LintConfig`].
pub const STORAGE_KEY_LINT_CONFIG: &str = "lintpad-lint-config";

/// Storage key holding the serialized preset list.
pub const STORAGE_KEY_PRESETS: &str = "lintpad-lint-presets";

/// Code offered by the "load sample" action.
pub const SAMPLE_CODE: &str = r#"<style>
#weather .tbl_weather .ico_yesterday .bar {color:#e0e0e0 !important;margin:0 1px}
#weather .tbl_weather .ico_yesterday .max {font:11PX "Dotum", dotum;color:#f73a40}
#weather .tbl_weather .ico_temp {display:block;position:absolute;left:0;overflow:hidden;width:35px;color:#444}
#weather .list_daily .ico_arrow {display:none;position:absolute;bottom:-7px;left:45%;width:11px;height:7px}
#weather .wrap_overlap .list_overlap {width:90%;float:left}
</style>
<div id="weatherFavor" class="wrap_favor" style="display:none;">
    <strong class="tit_favor">Favorites</strong>
    <span title="cloudy" class="ico_w20 ico_w4">cloudy</span> 13 <span class="screen_out">C</span>
</div>"#;

/// Declaration order enforced by `order/properties-order`.
const PROPERTIES_ORDER: &[&str] = &[
    "display",
    "overflow",
    "overflow-wrap",
    "overflow-x",
    "overflow-y",
    "float",
    "position",
    "top",
    "right",
    "bottom",
    "left",
    "z-index",
    "width",
    "max-width",
    "min-width",
    "height",
    "max-height",
    "min-height",
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "padding",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "border",
    "border-top",
    "border-right",
    "border-bottom",
    "border-left",
    "border-width",
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
    "border-style",
    "border-top-style",
    "border-right-style",
    "border-bottom-style",
    "border-left-style",
    "border-color",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
    "border-radius",
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-right-radius",
    "border-bottom-left-radius",
    "box-shadow",
    "border-spacing",
    "font",
    "font-style",
    "font-variant",
    "font-weight",
    "font-stretch",
    "font-size",
    "line-height",
    "font-family",
    "color",
    "background",
    "background-attachment",
    "background-blend-mode",
    "background-clip",
    "background-color",
    "background-image",
    "background-origin",
    "background-position",
    "background-repeat",
    "background-size",
];

/// Stylistic rules whose default is a plain keyword.
const KEYWORD_RULES: &[(&str, &str)] = &[
    ("color-named", "never"),
    ("stylistic/at-rule-name-case", "lower"),
    ("stylistic/at-rule-semicolon-newline-after", "always"),
    ("stylistic/block-closing-brace-newline-after", "always"),
    ("stylistic/block-opening-brace-space-after", "never-single-line"),
    ("stylistic/block-opening-brace-space-before", "never-single-line"),
    ("stylistic/color-hex-case", "lower"),
    ("stylistic/declaration-block-semicolon-space-after", "never"),
    ("stylistic/declaration-block-semicolon-space-before", "never"),
    ("stylistic/declaration-block-trailing-semicolon", "never"),
    ("stylistic/declaration-colon-space-after", "never"),
    ("stylistic/declaration-colon-space-before", "never"),
    ("stylistic/function-comma-space-after", "never"),
    ("stylistic/function-comma-space-before", "never"),
    ("stylistic/function-parentheses-space-inside", "never"),
    ("stylistic/property-case", "lower"),
    ("stylistic/selector-attribute-brackets-space-inside", "never"),
    ("stylistic/selector-attribute-operator-space-after", "never"),
    ("stylistic/selector-attribute-operator-space-before", "never"),
    ("stylistic/selector-combinator-space-after", "never"),
    ("stylistic/selector-combinator-space-before", "never"),
    ("stylistic/selector-list-comma-space-after", "never"),
    ("stylistic/selector-list-comma-space-before", "never"),
    ("stylistic/selector-pseudo-class-case", "lower"),
    ("stylistic/selector-pseudo-class-parentheses-space-inside", "never"),
    ("stylistic/selector-pseudo-element-case", "lower"),
    ("stylistic/string-quotes", "single"),
    ("stylistic/unit-case", "lower"),
    ("stylistic/value-list-comma-space-after", "always"),
    ("stylistic/value-list-comma-space-before", "never"),
];

const TOGGLE_RULES: &[(&str, bool)] = &[
    ("declaration-no-important", true),
    ("declaration-property-value-no-unknown", true),
    ("no-descending-specificity", false),
    ("selector-class-pattern", false),
    ("selector-id-pattern", false),
    ("stylistic/no-extra-semicolons", true),
];

static DEFAULT_RULES: LazyLock<Rules> = LazyLock::new(|| {
    let mut rules = Rules::new();
    for (key, value) in KEYWORD_RULES {
        rules.insert(key.to_string(), RuleValue::from(*value));
    }
    for (key, value) in TOGGLE_RULES {
        rules.insert(key.to_string(), RuleValue::Bool(*value));
    }
    rules.insert(
        "declaration-block-single-line-max-declarations".to_string(),
        RuleValue::from(99_i64),
    );
    rules.insert(
        "order/properties-order".to_string(),
        RuleValue::List(PROPERTIES_ORDER.iter().map(|p| p.to_string()).collect()),
    );
    rules
});

/// The read-only default rule template.
pub fn default_rules() -> &'static Rules {
    &DEFAULT_RULES
}

/// A fresh configuration built from an owned copy of the template.
pub fn default_config() -> LintConfig {
    LintConfig {
        output_style: OutputStyle::Default,
        rules: DEFAULT_RULES.clone(),
    }
}
