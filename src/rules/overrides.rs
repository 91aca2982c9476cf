//! Rule overrides and effective rules.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::issue::RawIssue;
use super::rule::{Category, Rule, RuleCheck, RuleError, RuleId, RuleOptions, Severity};

/// Severity used when neither rule, override nor caller supplies one.
pub const FALLBACK_SEVERITY: Severity = Severity::Warning;

/// A partial modification applied to a rule at validation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Shallow-merged over the rule's own options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<RuleOptions>,
}

impl RuleOverride {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn severity(severity: Severity) -> Self {
        Self {
            severity: Some(severity),
            ..Default::default()
        }
    }
}

/// How a rule is configured: a bare toggle or a full override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RuleSetting {
    Toggle(bool),
    Override(RuleOverride),
}

impl RuleSetting {
    /// Expand the toggle sugar into an override.
    pub fn to_override(&self) -> RuleOverride {
        match self {
            RuleSetting::Toggle(enabled) => RuleOverride::enabled(*enabled),
            RuleSetting::Override(o) => o.clone(),
        }
    }
}

impl From<bool> for RuleSetting {
    fn from(enabled: bool) -> Self {
        RuleSetting::Toggle(enabled)
    }
}

impl From<RuleOverride> for RuleSetting {
    fn from(o: RuleOverride) -> Self {
        RuleSetting::Override(o)
    }
}

/// A rule with its override folded in. Computed on demand, never stored.
#[derive(Clone)]
pub struct EffectiveRule {
    pub id: RuleId,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub category: Category,
    pub enabled: bool,
    pub options: RuleOptions,
    check: Arc<dyn RuleCheck>,
}

impl EffectiveRule {
    /// Merge a rule with its (optional) override.
    ///
    /// Severity precedence: override, then the rule's own severity, then
    /// `default_severity`, then [`FALLBACK_SEVERITY`].
    pub fn resolve(
        rule: &Rule,
        rule_override: Option<&RuleOverride>,
        default_severity: Option<Severity>,
    ) -> Self {
        let mut options = rule.options.clone();
        if let Some(extra) = rule_override.and_then(|o| o.options.as_ref()) {
            for (key, value) in extra {
                options.insert(key.clone(), value.clone());
            }
        }

        Self {
            id: rule.id.clone(),
            name: rule.name.clone(),
            description: rule.description.clone(),
            severity: rule_override
                .and_then(|o| o.severity)
                .or(rule.severity)
                .or(default_severity)
                .unwrap_or(FALLBACK_SEVERITY),
            category: rule.category,
            enabled: rule_override
                .and_then(|o| o.enabled)
                .unwrap_or(rule.enabled),
            options,
            check: rule.check(),
        }
    }

    /// Run the rule body with the effective options.
    pub fn evaluate(&self, document: &Value) -> Result<Vec<RawIssue>, RuleError> {
        self.check.evaluate(document, &self.options)
    }
}

impl std::fmt::Debug for EffectiveRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectiveRule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("enabled", &self.enabled)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
