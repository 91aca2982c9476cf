//! Validation orchestration.
//!
//! A [`Validator`] owns a populated [`RuleRegistry`] with the resolved
//! configuration's overrides applied, and runs the enabled rules against
//! one document per call to [`Validator::validate`].

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug_span, info, warn, Span};

use crate::config::{EffectiveSettings, ResolvedConfig};
use crate::document::{DocumentLoader, FileDocumentLoader};
use crate::error::Result;
use crate::rules::engine::serialize_millis;
use crate::rules::{ExecutionStats, Issue, Rule, RuleEngine, RuleRegistry, Severity};

/// Outcome of validating one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// The parsed document, absent when it could not be loaded.
    pub spec: Option<Value>,
    /// No error-severity issues were found and the document loaded.
    pub valid: bool,
    pub issues: Vec<Issue>,
    pub stats: ValidationStats,
    pub metadata: ValidationMetadata,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub rules_executed: usize,
    pub issues_found: usize,
    /// Sum of the per-rule execution times.
    #[serde(serialize_with = "serialize_millis")]
    pub execution_time: Duration,
    /// Wall time of the whole validation, loading included.
    #[serde(serialize_with = "serialize_millis")]
    pub total_time: Duration,
    /// Per-rule statistics in execution order.
    pub rules: Vec<ExecutionStats>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMetadata {
    pub validated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
    /// Number of rules selected for execution.
    pub rule_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    /// Number of issues with exactly this severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Whether the run should be reported as a failure.
    pub fn is_failure(&self, fail_on_warnings: bool) -> bool {
        !self.valid || (fail_on_warnings && self.warning_count() > 0)
    }
}

/// Builder for a [`Validator`].
pub struct ValidatorBuilder {
    include_builtins: bool,
    custom_rules: Vec<Rule>,
    loader: Box<dyn DocumentLoader>,
}

impl ValidatorBuilder {
    /// Skip registration of the built-in rules.
    pub fn without_builtins(mut self) -> Self {
        self.include_builtins = false;
        self
    }

    /// Register an additional rule after the built-ins.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.custom_rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.custom_rules.extend(rules);
        self
    }

    /// Replace the file-based document loader.
    pub fn with_loader(mut self, loader: impl DocumentLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Build the validator for a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRule` if a custom rule reuses a registered id, or
    /// a configuration error if the active ruleset cannot be flattened.
    pub fn build(self, config: ResolvedConfig) -> Result<Validator> {
        let span = debug_span!("validator");
        let _guard = span.enter();

        let settings = config.effective_settings()?;

        let mut registry = RuleRegistry::new();
        if self.include_builtins {
            registry.register_batch(crate::rules::builtin::all())?;
        }
        registry.register_batch(self.custom_rules)?;
        registry.apply_overrides(&settings.rules);

        info!(
            rules = registry.len(),
            ruleset = config.active_ruleset.as_deref().unwrap_or("-"),
            "Validator ready"
        );

        drop(_guard);
        Ok(Validator {
            registry,
            config,
            settings,
            loader: self.loader,
            span,
        })
    }
}

/// Validates API documents against the configured rule set.
///
/// # Example
///
/// ```
/// use api_guardian::config::ResolvedConfig;
/// use api_guardian::Validator;
/// use serde_json::json;
///
/// let validator = Validator::new(ResolvedConfig::defaults()).unwrap();
/// let result = validator.validate_document(json!({
///     "openapi": "3.0.3",
///     "info": {"title": "Pets", "version": "1.0.0"},
///     "paths": {"/pets": {"get": {"responses": {"200": {"description": "ok"}}}}}
/// }));
///
/// assert!(result.valid);
/// assert!(result.warning_count() > 0);
/// ```
pub struct Validator {
    registry: RuleRegistry,
    config: ResolvedConfig,
    settings: EffectiveSettings,
    loader: Box<dyn DocumentLoader>,
    span: Span,
}

impl Validator {
    /// A validator with the built-in rules and the file loader.
    pub fn new(config: ResolvedConfig) -> Result<Self> {
        Self::builder().build(config)
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder {
            include_builtins: true,
            custom_rules: Vec::new(),
            loader: Box::new(FileDocumentLoader::new()),
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Default severity in effect after the active ruleset is applied.
    pub fn default_severity(&self) -> Option<Severity> {
        self.settings.default_severity
    }

    /// Load and validate the document at `path`.
    ///
    /// Never fails: a document that cannot be loaded yields an invalid
    /// result carrying the load error in `metadata.error`.
    pub fn validate(&self, path: &Path) -> ValidationResult {
        let _guard = self.span.enter();
        let start = Instant::now();

        match self.loader.load(path) {
            Ok(document) => {
                let mut result = self.run(document, start);
                result.metadata.source = Some(path.to_path_buf());
                result
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Document could not be loaded");
                ValidationResult {
                    spec: None,
                    valid: false,
                    issues: vec![],
                    stats: ValidationStats {
                        total_time: start.elapsed(),
                        ..Default::default()
                    },
                    metadata: ValidationMetadata {
                        source: Some(path.to_path_buf()),
                        error: Some(err.to_string()),
                        ..self.metadata(0)
                    },
                }
            }
        }
    }

    /// Validate an already parsed document.
    pub fn validate_document(&self, document: Value) -> ValidationResult {
        let _guard = self.span.enter();
        self.run(document, Instant::now())
    }

    fn run(&self, document: Value, start: Instant) -> ValidationResult {
        let ids = self.registry.enabled_ids();
        let engine = RuleEngine::new(&self.registry);
        let batch = engine.execute_all(&document, Some(&ids), self.settings.default_severity);

        let mut metadata = self.metadata(ids.len());
        for failure in batch.failures() {
            metadata.warnings.push(format!(
                "Rule '{}' failed: {}",
                failure.rule_id,
                failure.error.as_deref().unwrap_or_default()
            ));
        }

        let valid = !batch
            .issues
            .iter()
            .any(|issue| issue.severity == Severity::Error);

        info!(
            rules = batch.rules_executed(),
            issues = batch.issues.len(),
            valid,
            "Validation complete"
        );

        ValidationResult {
            spec: Some(document),
            valid,
            stats: ValidationStats {
                rules_executed: batch.rules_executed(),
                issues_found: batch.issues.len(),
                execution_time: batch.execution_time(),
                total_time: start.elapsed(),
                rules: batch.stats,
            },
            issues: batch.issues,
            metadata,
        }
    }

    fn metadata(&self, rule_count: usize) -> ValidationMetadata {
        let warnings = self
            .registry
            .unknown_override_ids()
            .into_iter()
            .map(|id| format!("Override for unknown rule '{}'", id))
            .collect();

        ValidationMetadata {
            validated_at: Utc::now(),
            source: None,
            config_path: self.config.config_path.clone(),
            rule_count,
            warnings,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_config, GuardianConfig};
    use crate::error::GuardianError;
    use crate::rules::{Category, RawIssue, RuleError, RuleSetting};
    use serde_json::json;
    use tempfile::TempDir;

    fn clean_document() -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {
                "title": "Pets",
                "version": "1.0.0",
                "description": "Pet store",
                "contact": {"email": "api@example.com"},
                "license": {"name": "MIT"}
            },
            "servers": [{"url": "https://api.example.com"}],
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "description": "List pets",
                        "tags": ["pets"],
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        })
    }

    fn config(yaml: &str) -> ResolvedConfig {
        let config: GuardianConfig = serde_yaml::from_str(yaml).unwrap();
        ResolvedConfig::new(config, None)
    }

    #[test]
    fn clean_document_is_valid_without_issues() {
        let validator = Validator::new(ResolvedConfig::defaults()).unwrap();
        let result = validator.validate_document(clean_document());

        assert!(result.valid, "{:?}", result.issues);
        assert!(result.issues.is_empty(), "{:?}", result.issues);
        assert!(result.stats.rules_executed > 0);
        assert_eq!(result.metadata.rule_count, result.stats.rules_executed);
    }

    #[test]
    fn errors_make_document_invalid() {
        let validator = Validator::new(ResolvedConfig::defaults()).unwrap();
        let mut document = clean_document();
        document["servers"] = json!([{"url": "http://api.example.com"}]);

        let result = validator.validate_document(document);

        assert!(!result.valid);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.issues[0].rule_id, "servers-https");
    }

    #[test]
    fn warnings_only_are_valid_but_can_fail() {
        let validator = Validator::new(ResolvedConfig::defaults()).unwrap();
        let mut document = clean_document();
        document["paths"]["/pets"]["get"]["tags"] = json!([]);

        let result = validator.validate_document(document);

        assert!(result.valid);
        assert_eq!(result.warning_count(), 1);
        assert!(!result.is_failure(false));
        assert!(result.is_failure(true));
    }

    #[test]
    fn configuration_overrides_apply() {
        let validator =
            Validator::new(config("rules:\n  servers-https: {severity: warning}")).unwrap();
        let mut document = clean_document();
        document["servers"] = json!([{"url": "http://api.example.com"}]);

        let result = validator.validate_document(document);

        assert!(result.valid);
        assert_eq!(result.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn disabled_rules_are_not_run() {
        let validator = Validator::new(config("rules:\n  servers-https: false")).unwrap();
        let mut document = clean_document();
        document["servers"] = json!([{"url": "http://api.example.com"}]);

        let result = validator.validate_document(document);

        assert!(result.valid);
        assert!(result.stats.rules.iter().all(|s| s.rule_id.as_str() != "servers-https"));
    }

    #[test]
    fn custom_rules_run_after_builtins() {
        let validator = Validator::builder()
            .with_rule(
                Rule::from_fn("x-owner", Category::Governance, |doc, _| {
                    if doc.pointer("/info/x-owner").is_none() {
                        Ok(vec![RawIssue::new("No owner")])
                    } else {
                        Ok(vec![])
                    }
                })
                .with_severity(Severity::Error),
            )
            .build(ResolvedConfig::defaults())
            .unwrap();

        let result = validator.validate_document(clean_document());

        assert!(!result.valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].rule_id, "x-owner");
        assert_eq!(result.stats.rules.last().unwrap().rule_id.as_str(), "x-owner");
    }

    #[test]
    fn without_builtins_only_custom_rules_run() {
        let validator = Validator::builder()
            .without_builtins()
            .with_rule(Rule::from_fn("noop", Category::Structural, |_, _| Ok(vec![])))
            .build(ResolvedConfig::defaults())
            .unwrap();

        assert_eq!(validator.registry().len(), 1);
        let result = validator.validate_document(json!({}));
        assert_eq!(result.stats.rules_executed, 1);
    }

    #[test]
    fn duplicate_custom_rule_fails_to_build() {
        let err = Validator::builder()
            .with_rule(Rule::from_fn("openapi-version", Category::Structural, |_, _| {
                Ok(vec![])
            }))
            .build(ResolvedConfig::defaults())
            .err()
            .unwrap();
        assert!(matches!(err, GuardianError::DuplicateRule { .. }));
    }

    #[test]
    fn failing_rules_are_reported_in_metadata() {
        let validator = Validator::builder()
            .without_builtins()
            .with_rule(Rule::from_fn("boom", Category::Structural, |_, _| {
                Err(RuleError::new("kaput"))
            }))
            .build(ResolvedConfig::defaults())
            .unwrap();

        let result = validator.validate_document(json!({}));

        assert!(result.valid);
        assert_eq!(result.metadata.warnings, ["Rule 'boom' failed: kaput"]);
    }

    #[test]
    fn unknown_overrides_are_reported_in_metadata() {
        let validator = Validator::new(config("rules:\n  no-such-rule: false")).unwrap();
        let result = validator.validate_document(clean_document());
        assert_eq!(
            result.metadata.warnings,
            ["Override for unknown rule 'no-such-rule'"]
        );
    }

    #[test]
    fn active_ruleset_default_severity_applies() {
        let mut resolved = config(
            "rulesets:\n  quiet:\n    defaultSeverity: hint\n    rules:\n      servers-https: false",
        );
        resolved.active_ruleset = Some("quiet".into());
        let validator = Validator::new(resolved).unwrap();

        assert_eq!(validator.default_severity(), Some(Severity::Hint));
        assert!(!validator.registry().is_enabled("servers-https"));
    }

    #[test]
    fn strict_ruleset_enables_opt_in_rules() {
        let mut resolved = ResolvedConfig::new(default_config(), None);
        resolved.active_ruleset = Some("strict".into());
        let validator = Validator::new(resolved).unwrap();

        assert!(validator.registry().is_enabled("info-version-semver"));
        assert_eq!(
            validator.config().config.rules.as_ref().unwrap().get("info-version-semver"),
            None::<&RuleSetting>
        );
    }

    #[test]
    fn missing_document_yields_invalid_result() {
        let temp = TempDir::new().unwrap();
        let validator = Validator::new(ResolvedConfig::defaults()).unwrap();

        let result = validator.validate(&temp.path().join("missing.yaml"));

        assert!(result.spec.is_none());
        assert!(!result.valid);
        assert!(result.issues.is_empty());
        assert!(result.metadata.error.as_deref().unwrap().contains("missing.yaml"));
    }

    #[test]
    fn validates_document_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("api.json");
        std::fs::write(&path, clean_document().to_string()).unwrap();

        let validator = Validator::new(ResolvedConfig::defaults()).unwrap();
        let result = validator.validate(&path);

        assert!(result.valid);
        assert_eq!(result.metadata.source.as_deref(), Some(path.as_path()));
        assert!(result.spec.is_some());
    }

    #[test]
    fn custom_loader_is_used() {
        struct Fixed(Value);
        impl DocumentLoader for Fixed {
            fn load(&self, _: &Path) -> Result<Value> {
                Ok(self.0.clone())
            }
        }

        let validator = Validator::builder()
            .with_loader(Fixed(clean_document()))
            .build(ResolvedConfig::defaults())
            .unwrap();

        assert!(validator.validate(Path::new("virtual.yaml")).valid);
    }

    #[test]
    fn result_serializes_camel_case() {
        let validator = Validator::new(ResolvedConfig::defaults()).unwrap();
        let value = serde_json::to_value(validator.validate_document(clean_document())).unwrap();

        assert_eq!(value["valid"], true);
        assert!(value["stats"]["rulesExecuted"].as_u64().unwrap() > 0);
        assert!(value["stats"]["totalTime"].is_number());
        assert!(value["metadata"]["validatedAt"].is_string());
        assert!(value["metadata"].get("error").is_none());
    }
}
