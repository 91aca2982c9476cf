//! Rule execution.
//!
//! The [`RuleEngine`] runs registered rules against a document, turns
//! their raw output into canonical [`Issue`]s and records per-rule
//! [`ExecutionStats`]. A rule that fails or panics is recorded in its
//! stats entry and contributes no issues; the rest of the batch runs on.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, debug_span, warn, Span};

use super::issue::{Issue, RawIssue, ROOT_PATH};
use super::overrides::EffectiveRule;
use super::registry::RuleRegistry;
use super::rule::{RuleId, Severity};

/// Statistics for one rule execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStats {
    pub rule_id: RuleId,
    pub executed: bool,
    pub issues_found: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub execution_time: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionStats {
    fn skipped(rule_id: &str) -> Self {
        Self {
            rule_id: RuleId::new(rule_id),
            executed: false,
            issues_found: 0,
            execution_time: Duration::ZERO,
            error: None,
        }
    }
}

/// Issues and stats from running a single rule.
#[derive(Debug, Clone)]
pub struct RuleExecution {
    pub issues: Vec<Issue>,
    pub stats: ExecutionStats,
}

/// Issues and stats from running a batch of rules.
#[derive(Debug, Clone, Default)]
pub struct BatchExecution {
    pub issues: Vec<Issue>,
    pub stats: Vec<ExecutionStats>,
    pub total_time: Duration,
}

impl BatchExecution {
    /// Number of rules whose body actually ran to completion.
    pub fn rules_executed(&self) -> usize {
        self.stats.iter().filter(|s| s.executed).count()
    }

    /// Sum of the per-rule execution times.
    pub fn execution_time(&self) -> Duration {
        self.stats.iter().map(|s| s.execution_time).sum()
    }

    /// Stats entries that recorded an error.
    pub fn failures(&self) -> impl Iterator<Item = &ExecutionStats> {
        self.stats.iter().filter(|s| s.error.is_some())
    }
}

/// Executes rules held by a [`RuleRegistry`].
pub struct RuleEngine<'a> {
    registry: &'a RuleRegistry,
    span: Span,
}

impl<'a> RuleEngine<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self {
            registry,
            span: debug_span!("rule_engine"),
        }
    }

    /// Execute one rule against the document.
    ///
    /// Never fails: a missing rule, a rule error or a panic are reported
    /// through `stats.error`.
    pub fn execute_rule(
        &self,
        id: &str,
        document: &Value,
        default_severity: Option<Severity>,
    ) -> RuleExecution {
        let _guard = self.span.enter();

        let Some(rule) = self.registry.get_effective_rule(id, default_severity) else {
            warn!(rule = id, "rule not found");
            let mut stats = ExecutionStats::skipped(id);
            stats.error = Some(format!("Rule '{}' not found", id));
            return RuleExecution {
                issues: vec![],
                stats,
            };
        };

        if !rule.enabled {
            debug!(rule = id, "rule disabled, skipping");
            return RuleExecution {
                issues: vec![],
                stats: ExecutionStats::skipped(id),
            };
        }

        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| rule.evaluate(document)));

        let (issues, error) = match outcome {
            Ok(Ok(raw)) => (normalize(raw, &rule), None),
            Ok(Err(err)) => (vec![], Some(err.message)),
            Err(payload) => (vec![], Some(panic_message(payload.as_ref()))),
        };
        let execution_time = start.elapsed();

        if let Some(ref message) = error {
            warn!(rule = id, error = %message, "rule execution failed");
        } else {
            debug!(rule = id, issues = issues.len(), ?execution_time, "rule executed");
        }

        RuleExecution {
            stats: ExecutionStats {
                rule_id: rule.id.clone(),
                executed: error.is_none(),
                issues_found: issues.len(),
                execution_time,
                error,
            },
            issues,
        }
    }

    /// Execute rules in order and concatenate their output.
    ///
    /// With `ids` of `None` every registered rule runs in registration
    /// order. Issues keep the order of the rules, then the order each rule
    /// reported them in.
    pub fn execute_all(
        &self,
        document: &Value,
        ids: Option<&[RuleId]>,
        default_severity: Option<Severity>,
    ) -> BatchExecution {
        let start = Instant::now();
        let ids = match ids {
            Some(ids) => ids.to_vec(),
            None => self.registry.get_all_ids(),
        };

        let mut batch = BatchExecution::default();
        for id in &ids {
            let execution = self.execute_rule(id.as_str(), document, default_severity);
            batch.issues.extend(execution.issues);
            batch.stats.push(execution.stats);
        }
        batch.total_time = start.elapsed();
        batch
    }
}

/// Project raw rule output onto canonical issues.
///
/// Records without a message are dropped. Fields the rule left empty are
/// filled from the effective rule.
pub fn normalize(raw: Vec<RawIssue>, rule: &EffectiveRule) -> Vec<Issue> {
    raw.into_iter()
        .filter_map(|item| {
            let message = item.message?;
            Some(Issue {
                rule_id: item.rule_id.unwrap_or_else(|| rule.id.to_string()),
                rule_description: item.rule_description.unwrap_or_else(|| rule.name.clone()),
                severity: item.severity.unwrap_or(rule.severity),
                path: item.path.unwrap_or_else(|| ROOT_PATH.to_string()),
                line: item.line,
                column: item.column,
                message,
                suggestion: item.suggestion,
                category: item.category,
            })
        })
        .collect()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "rule panicked".to_string()
    }
}

pub(crate) fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Category, Rule, RuleError, RuleOverride};
    use serde_json::json;

    fn registry_with(rules: Vec<Rule>) -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.register_batch(rules).unwrap();
        registry
    }

    fn emits(id: &str, messages: &'static [&'static str]) -> Rule {
        Rule::from_fn(id, Category::Documentation, move |_, _| {
            Ok(messages.iter().map(|m| RawIssue::new(*m)).collect())
        })
        .with_name(format!("{} name", id))
        .with_severity(Severity::Error)
    }

    #[test]
    fn missing_rule_reports_not_found() {
        let registry = RuleRegistry::new();
        let engine = RuleEngine::new(&registry);

        let result = engine.execute_rule("ghost", &json!({}), None);
        assert!(result.issues.is_empty());
        assert!(!result.stats.executed);
        assert!(result.stats.error.unwrap().contains("not found"));
    }

    #[test]
    fn disabled_rule_is_skipped_without_error() {
        let registry = registry_with(vec![emits("off", &["x"]).disabled()]);
        let engine = RuleEngine::new(&registry);

        let result = engine.execute_rule("off", &json!({}), None);
        assert!(result.issues.is_empty());
        assert!(!result.stats.executed);
        assert!(result.stats.error.is_none());
    }

    #[test]
    fn minimal_raw_issue_is_filled_from_effective_rule() {
        let registry = registry_with(vec![emits("r", &["x"])]);
        let engine = RuleEngine::new(&registry);

        let result = engine.execute_rule("r", &json!({}), None);
        assert!(result.stats.executed);
        assert_eq!(result.stats.issues_found, 1);

        let issue = &result.issues[0];
        assert_eq!(issue.rule_id, "r");
        assert_eq!(issue.rule_description, "r name");
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.path, "root");
        assert_eq!(issue.message, "x");
        assert!(issue.line.is_none());
        assert!(issue.suggestion.is_none());
        assert!(issue.category.is_none());
    }

    #[test]
    fn issue_severity_follows_override() {
        let mut registry = registry_with(vec![emits("r", &["x"])]);
        registry.set_override("r", RuleOverride::severity(Severity::Warning));
        let engine = RuleEngine::new(&registry);

        let result = engine.execute_rule("r", &json!({}), None);
        assert_eq!(result.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn raw_fields_override_engine_defaults() {
        let rule = Rule::from_fn("r", Category::Rest, |_, _| {
            Ok(vec![RawIssue {
                rule_id: Some("custom-id".into()),
                severity: Some(Severity::Hint),
                category: Some(Category::Rest),
                ..RawIssue::new("explicit").at("/paths")
            }])
        });
        let registry = registry_with(vec![rule]);
        let engine = RuleEngine::new(&registry);

        let issue = &engine.execute_rule("r", &json!({}), None).issues[0];
        assert_eq!(issue.rule_id, "custom-id");
        assert_eq!(issue.rule_description, "r");
        assert_eq!(issue.severity, Severity::Hint);
        assert_eq!(issue.path, "/paths");
        assert_eq!(issue.category, Some(Category::Rest));
    }

    #[test]
    fn records_without_message_are_dropped() {
        let rule = Rule::from_fn("r", Category::Rest, |_, _| {
            Ok(vec![
                RawIssue::default(),
                RawIssue::new("kept"),
                RawIssue {
                    path: Some("/info".into()),
                    ..Default::default()
                },
            ])
        });
        let registry = registry_with(vec![rule]);
        let engine = RuleEngine::new(&registry);

        let result = engine.execute_rule("r", &json!({}), None);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].message, "kept");
        assert!(result.stats.error.is_none());
    }

    #[test]
    fn failing_rule_is_isolated_from_the_batch() {
        let boom = Rule::from_fn("boom", Category::Rest, |_, _| Err(RuleError::new("boom")));
        let registry = registry_with(vec![boom, emits("ok", &["fine"])]);
        let engine = RuleEngine::new(&registry);

        let single = engine.execute_rule("boom", &json!({}), None);
        assert!(single.issues.is_empty());
        assert!(!single.stats.executed);
        assert_eq!(single.stats.error.as_deref(), Some("boom"));

        let batch = engine.execute_all(&json!({}), None, None);
        assert_eq!(batch.issues.len(), 1);
        assert_eq!(batch.issues[0].rule_id, "ok");
        assert_eq!(batch.stats.len(), 2);
        assert_eq!(batch.rules_executed(), 1);
        assert_eq!(batch.failures().count(), 1);
    }

    #[test]
    fn panicking_rule_is_recorded_as_error() {
        let panics = Rule::from_fn("panics", Category::Rest, |_, _| panic!("kaboom"));
        let registry = registry_with(vec![panics, emits("after", &["still here"])]);
        let engine = RuleEngine::new(&registry);

        let batch = engine.execute_all(&json!({}), None, None);
        assert_eq!(batch.stats[0].error.as_deref(), Some("kaboom"));
        assert_eq!(batch.issues.len(), 1);
        assert_eq!(batch.issues[0].message, "still here");
    }

    #[test]
    fn execute_all_follows_given_order() {
        let registry = registry_with(vec![emits("a", &["a1", "a2"]), emits("b", &["b1"])]);
        let engine = RuleEngine::new(&registry);

        let ids = [RuleId::new("b"), RuleId::new("a")];
        let batch = engine.execute_all(&json!({}), Some(&ids), None);
        let messages: Vec<_> = batch.issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, ["b1", "a1", "a2"]);
    }

    #[test]
    fn options_are_passed_to_the_check() {
        let rule = Rule::from_fn("opts", Category::Governance, |_, options| {
            let limit = options.get("limit").and_then(Value::as_u64).unwrap_or(0);
            Ok(vec![RawIssue::new(format!("limit {}", limit))])
        })
        .with_option("limit", 1);
        let mut registry = registry_with(vec![rule]);
        registry.set_override(
            "opts",
            RuleOverride {
                options: Some(json!({"limit": 7}).as_object().unwrap().clone()),
                ..Default::default()
            },
        );

        let engine = RuleEngine::new(&registry);
        assert_eq!(
            engine.execute_rule("opts", &json!({}), None).issues[0].message,
            "limit 7"
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let registry = registry_with(vec![emits("a", &["1", "2"]), emits("b", &["3"])]);
        let engine = RuleEngine::new(&registry);
        let doc = json!({"info": {}});

        let first = engine.execute_all(&doc, None, None);
        let second = engine.execute_all(&doc, None, None);
        assert_eq!(first.issues, second.issues);
    }
}
