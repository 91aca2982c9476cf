//! Validation issues.
//!
//! Rule checks produce [`RawIssue`]s, where every field is optional. The
//! engine turns the survivors into canonical [`Issue`]s, filling the gaps
//! from the rule that ran.

use serde::{Deserialize, Serialize};

use super::rule::{Category, Severity};

/// Path reported when a rule does not point anywhere more specific.
pub const ROOT_PATH: &str = "root";

/// An issue-like record as returned by a rule check.
///
/// Only `message` is mandatory; records without one are discarded during
/// normalization. Any other field left empty is filled by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawIssue {
    pub rule_id: Option<String>,
    pub rule_description: Option<String>,
    pub severity: Option<Severity>,
    pub path: Option<String>,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub message: Option<String>,
    pub suggestion: Option<String>,
    pub category: Option<Category>,
}

impl RawIssue {
    /// Create a raw issue carrying just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Point the issue at a location in the document.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// A canonical validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub rule_id: String,
    pub rule_description: String,
    pub severity: Severity,
    /// JSON pointer into the document, or `"root"`.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Build a JSON pointer from path segments, escaping `~` and `/`.
///
/// ```
/// use api_guardian::rules::json_pointer;
///
/// assert_eq!(json_pointer(&["paths", "/pets/{id}", "get"]), "/paths/~1pets~1{id}/get");
/// assert_eq!(json_pointer::<&str>(&[]), "root");
/// ```
pub fn json_pointer<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return ROOT_PATH.to_string();
    }
    segments.iter().fold(String::new(), |mut acc, segment| {
        acc.push('/');
        acc.push_str(&segment.as_ref().replace('~', "~0").replace('/', "~1"));
        acc
    })
}
