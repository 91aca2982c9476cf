//! REST conventions for paths and responses.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{operations, Rule};
use crate::rules::{json_pointer, Category, RawIssue, RuleError, RuleOptions, Severity};

/// A literal path segment in kebab-case, or a `{parameter}` placeholder.
static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-z0-9]+(?:-[a-z0-9]+)*|\{[^/{}]+\})$").unwrap());

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::from_fn("path-kebab-case", Category::Rest, path_kebab_case)
            .with_name("Kebab-case Paths")
            .with_description("Path segments use lowercase kebab-case")
            .with_severity(Severity::Warning),
        Rule::from_fn("path-no-trailing-slash", Category::Rest, path_no_trailing_slash)
            .with_name("No Trailing Slash")
            .with_description("Paths do not end with a slash")
            .with_severity(Severity::Warning),
        Rule::from_fn(
            "operation-success-response",
            Category::Rest,
            operation_success_response,
        )
        .with_name("Success Response")
        .with_description("Every operation declares at least one 2xx or 3xx response")
        .with_severity(Severity::Warning),
    ]
}

fn path_keys(document: &Value) -> Vec<&str> {
    document
        .get("paths")
        .and_then(Value::as_object)
        .map(|paths| paths.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

fn path_kebab_case(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    let mut issues = Vec::new();
    for path in path_keys(document) {
        let bad = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .find(|segment| !SEGMENT.is_match(segment));
        if let Some(segment) = bad {
            issues.push(
                RawIssue::new(format!(
                    "Path '{}' has segment '{}' that is not kebab-case",
                    path, segment
                ))
                .at(json_pointer(&["paths", path]))
                .with_suggestion(format!("Rename it to '{}'", to_kebab(segment))),
            );
        }
    }
    Ok(issues)
}

fn to_kebab(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    for (i, c) in segment.chars().enumerate() {
        if c == '_' || c == ' ' {
            out.push('-');
        } else if c.is_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn path_no_trailing_slash(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    Ok(path_keys(document)
        .into_iter()
        .filter(|path| path.len() > 1 && path.ends_with('/'))
        .map(|path| {
            RawIssue::new(format!("Path '{}' ends with a slash", path))
                .at(json_pointer(&["paths", path]))
                .with_suggestion(format!("Use '{}'", path.trim_end_matches('/')))
        })
        .collect())
}

fn operation_success_response(
    document: &Value,
    _: &RuleOptions,
) -> Result<Vec<RawIssue>, RuleError> {
    let mut issues = Vec::new();
    for op in operations(document) {
        let has_success = op
            .body
            .get("responses")
            .and_then(Value::as_object)
            .is_some_and(|responses| {
                responses
                    .keys()
                    .any(|code| code.starts_with('2') || code.starts_with('3'))
            });
        if !has_success {
            issues.push(
                RawIssue::new(format!(
                    "Operation {} {} declares no success response",
                    op.method.to_uppercase(),
                    op.path
                ))
                .at(json_pointer(&["paths", op.path, op.method, "responses"])),
            );
        }
    }
    Ok(issues)
}
