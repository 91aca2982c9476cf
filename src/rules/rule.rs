//! Rule definitions.
//!
//! This module provides the core types for defining validation rules:
//!
//! - [`Rule`] - A registered check with identity, severity and options
//! - [`RuleCheck`] - The capability every rule body implements
//! - [`RuleId`] - Unique identifier for a rule
//! - [`Severity`] - Severity level for issues (Hint, Info, Warning, Error)
//! - [`Category`] - The area of API design a rule belongs to

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::issue::RawIssue;

/// Options passed to a rule check, an opaque key-value map.
pub type RuleOptions = serde_json::Map<String, Value>;

/// Unique identifier for a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub String);

impl RuleId {
    /// Create a new rule ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for RuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Severity level for validation issues.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suggestion, never affects validity.
    Hint,
    /// Informational finding.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that makes the document invalid.
    Error,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Hint,
    ];

    /// Parse a severity from its lowercase name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The area of API design a rule is concerned with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Structural,
    Documentation,
    Rest,
    Governance,
    Security,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Structural,
        Category::Documentation,
        Category::Rest,
        Category::Governance,
        Category::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Structural => "structural",
            Category::Documentation => "documentation",
            Category::Rest => "rest",
            Category::Governance => "governance",
            Category::Security => "security",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a rule check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
    pub message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for RuleError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// The body of a rule.
///
/// A check sees only the document and its effective options. It must not
/// keep hidden state between calls; the engine relies on that to isolate
/// one rule's failure from the rest of the run.
pub trait RuleCheck: Send + Sync {
    /// Inspect the document and report raw issues.
    fn evaluate(&self, document: &Value, options: &RuleOptions)
        -> Result<Vec<RawIssue>, RuleError>;
}

impl<F> RuleCheck for F
where
    F: Fn(&Value, &RuleOptions) -> Result<Vec<RawIssue>, RuleError> + Send + Sync,
{
    fn evaluate(
        &self,
        document: &Value,
        options: &RuleOptions,
    ) -> Result<Vec<RawIssue>, RuleError> {
        self(document, options)
    }
}

/// A registered validation rule.
///
/// Rules are immutable once registered. Overrides never touch the stored
/// rule; the registry derives an [`EffectiveRule`](super::EffectiveRule)
/// on demand instead.
#[derive(Clone)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub description: String,
    /// Baseline severity. `None` defers to the caller's default severity.
    pub severity: Option<Severity>,
    pub category: Category,
    pub enabled: bool,
    pub options: RuleOptions,
    check: Arc<dyn RuleCheck>,
}

impl Rule {
    /// Create an enabled rule with no explicit severity.
    ///
    /// The name defaults to the id and the description is empty.
    pub fn new(id: impl Into<String>, category: Category, check: impl RuleCheck + 'static) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: RuleId(id),
            description: String::new(),
            severity: None,
            category,
            enabled: true,
            options: RuleOptions::new(),
            check: Arc::new(check),
        }
    }

    /// Create a rule whose body is a plain function or closure.
    pub fn from_fn<F>(id: impl Into<String>, category: Category, check: F) -> Self
    where
        F: Fn(&Value, &RuleOptions) -> Result<Vec<RawIssue>, RuleError> + Send + Sync + 'static,
    {
        Self::new(id, category, check)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Register the rule switched off until an override enables it.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub(crate) fn check(&self) -> Arc<dyn RuleCheck> {
        Arc::clone(&self.check)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("severity", &self.severity)
            .field("category", &self.category)
            .field("enabled", &self.enabled)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
