//! Built-in presets.
//!
//! A preset is a ruleset definition shipped with the tool. Configurations
//! reference presets from `extends` as `namespace:name`, and the CLI
//! selects one with `--ruleset`.

use serde_json::json;

use super::schema::{GuardianConfig, RuleSettings, RulesetDefinition};
use crate::rules::{RuleOverride, RuleSetting, Severity};

/// Names of the built-in presets, strictest first.
pub const PRESET_NAMES: [&str; 3] = ["strict", "standard", "lenient"];

/// Namespaces that resolve against the built-in presets.
pub const PRESET_NAMESPACES: [&str; 2] = ["api-guardian", "preset"];

/// Namespaces accepted in `extends` but not resolved.
pub const RESERVED_NAMESPACES: [&str; 1] = ["spectral"];

/// Names of all built-in presets.
pub fn available_presets() -> Vec<&'static str> {
    PRESET_NAMES.to_vec()
}

/// Look up a built-in preset by name.
pub fn preset(name: &str) -> Option<RulesetDefinition> {
    match name {
        "strict" => Some(strict()),
        "standard" => Some(standard()),
        "lenient" => Some(lenient()),
        _ => None,
    }
}

/// A ruleset definition as a configuration layer.
pub fn ruleset_layer(definition: &RulesetDefinition) -> GuardianConfig {
    GuardianConfig {
        rules: definition.rules.clone(),
        default_severity: definition.default_severity,
        ..Default::default()
    }
}

fn setting(severity: Option<Severity>, enabled: Option<bool>) -> RuleSetting {
    RuleSetting::Override(RuleOverride {
        severity,
        enabled,
        options: None,
    })
}

fn strict() -> RulesetDefinition {
    let mut rules = RuleSettings::new();
    for id in ["info-contact", "info-license"] {
        rules.insert(id.into(), setting(Some(Severity::Warning), None));
    }
    for id in ["operation-description", "operation-tags", "path-kebab-case"] {
        rules.insert(id.into(), setting(Some(Severity::Error), None));
    }
    rules.insert(
        "info-version-semver".into(),
        setting(Some(Severity::Warning), Some(true)),
    );
    rules.insert(
        "servers-https".into(),
        RuleSetting::Override(RuleOverride {
            options: json!({"allowLocalhost": false}).as_object().cloned(),
            ..Default::default()
        }),
    );

    RulesetDefinition {
        rules: Some(rules),
        extends: None,
        default_severity: Some(Severity::Error),
    }
}

/// Built-in defaults, as registered.
fn standard() -> RulesetDefinition {
    RulesetDefinition {
        rules: Some(RuleSettings::new()),
        extends: None,
        default_severity: Some(Severity::Warning),
    }
}

fn lenient() -> RulesetDefinition {
    let mut rules = RuleSettings::new();
    for id in [
        "info-contact",
        "info-license",
        "operation-tags",
        "path-kebab-case",
    ] {
        rules.insert(id.into(), RuleSetting::Toggle(false));
    }
    for id in ["operation-description", "security-schemes-defined"] {
        rules.insert(id.into(), setting(Some(Severity::Info), None));
    }
    rules.insert("servers-https".into(), setting(Some(Severity::Warning), None));

    RulesetDefinition {
        rules: Some(rules),
        extends: None,
        default_severity: Some(Severity::Info),
    }
}
