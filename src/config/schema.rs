//! Configuration schema definitions.
//!
//! These structs map to the `.api-guardian.yaml` / `.api-guardian.json`
//! file format. Every field is optional so that configurations can be
//! layered through `extends`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::output::OutputFormat;
use crate::rules::{RuleSetting, Severity};

/// Per-rule settings keyed by rule id.
pub type RuleSettings = BTreeMap<String, RuleSetting>;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuardianConfig {
    /// Presets (`namespace:name`) or files this configuration inherits from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Extends>,

    /// Rule overrides: `true`/`false` or `{severity, enabled, options}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleSettings>,

    /// Named, reusable bundles of rule overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rulesets: Option<BTreeMap<String, RulesetDefinition>>,

    /// File patterns to validate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FilePattern>>,

    /// Severity for rules that do not declare one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_severity: Option<Severity>,

    /// Treat warnings as failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_warnings: Option<bool>,

    /// Report info and hint issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_info: Option<bool>,

    /// Any other top-level keys, carried through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GuardianConfig {
    pub fn fail_on_warnings(&self) -> bool {
        self.fail_on_warnings.unwrap_or(false)
    }

    pub fn show_info(&self) -> bool {
        self.show_info.unwrap_or(true)
    }

    /// Extends entries in declaration order.
    pub fn extends_entries(&self) -> Vec<String> {
        self.extends
            .as_ref()
            .map(Extends::entries)
            .unwrap_or_default()
    }
}

/// The `extends` field: a single reference or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    pub fn entries(&self) -> Vec<String> {
        match self {
            Extends::One(entry) => vec![entry.clone()],
            Extends::Many(entries) => entries.clone(),
        }
    }
}

/// A named bundle of rule overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RulesetDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleSettings>,

    /// Another ruleset in the same configuration, or a `namespace:name` preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Extends>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_severity: Option<Severity>,
}

/// A set of file globs with paths to leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilePattern {
    pub patterns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
}

/// The baseline every `extends` chain starts from.
pub fn default_config() -> GuardianConfig {
    GuardianConfig {
        rules: Some(RuleSettings::new()),
        files: Some(vec![FilePattern {
            patterns: vec![
                "**/*.yaml".to_string(),
                "**/*.yml".to_string(),
                "**/*.json".to_string(),
            ],
            ignore: vec!["node_modules/**".to_string()],
        }]),
        fail_on_warnings: Some(false),
        show_info: Some(true),
        ..Default::default()
    }
}

/// A configuration after `extends` resolution and CLI overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    #[serde(flatten)]
    pub config: GuardianConfig,

    /// File the configuration was loaded from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,

    /// Ruleset selected on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_ruleset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    pub verbose: bool,
    pub watch: bool,
    pub fix: bool,
}

impl ResolvedConfig {
    /// Wrap a fully resolved configuration.
    pub fn new(config: GuardianConfig, config_path: Option<&Path>) -> Self {
        Self {
            config,
            config_path: config_path.map(Path::to_path_buf),
            ..Default::default()
        }
    }

    /// Baseline defaults, used when no configuration file exists.
    pub fn defaults() -> Self {
        Self::new(default_config(), None)
    }
}

/// JSON Schema for the configuration file.
pub fn config_json_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(GuardianConfig)).unwrap_or(Value::Null)
}
