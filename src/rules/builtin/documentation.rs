//! Documentation rules: the API explains itself.

use serde_json::Value;

use super::{is_blank, operations, Rule};
use crate::rules::{json_pointer, Category, RawIssue, RuleError, RuleOptions, Severity};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::from_fn("info-description", Category::Documentation, info_description)
            .with_name("Info Description")
            .with_description("The info object has a non-empty description")
            .with_severity(Severity::Warning),
        Rule::from_fn("info-contact", Category::Documentation, info_contact)
            .with_name("Info Contact")
            .with_description("The info object names a contact")
            .with_severity(Severity::Info),
        Rule::from_fn(
            "operation-description",
            Category::Documentation,
            operation_description,
        )
        .with_name("Operation Description")
        .with_description("Every operation has a summary or a description of a minimum length")
        .with_severity(Severity::Warning)
        .with_option("minLength", 1),
    ]
}

fn info_description(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    let description = document.get("info").and_then(|info| info.get("description"));
    if is_blank(description) {
        return Ok(vec![RawIssue::new("API info is missing a description")
            .at(json_pointer(&["info"]))
            .with_suggestion("Describe what the API does in info.description")]);
    }
    Ok(vec![])
}

fn info_contact(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    let contact = document.get("info").and_then(|info| info.get("contact"));
    match contact.and_then(Value::as_object) {
        Some(contact) if !contact.is_empty() => Ok(vec![]),
        _ => Ok(vec![RawIssue::new("API info has no contact information")
            .at(json_pointer(&["info"]))
            .with_suggestion("Add info.contact with a name, url or email")]),
    }
}

fn operation_description(document: &Value, options: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    let min_length = match options.get("minLength") {
        None => 1,
        Some(value) => value
            .as_u64()
            .ok_or_else(|| RuleError::new("option 'minLength' must be a non-negative integer"))?
            as usize,
    };

    let mut issues = Vec::new();
    for op in operations(document) {
        let text = ["description", "summary"]
            .iter()
            .filter_map(|key| op.body.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .max_by_key(|s| s.chars().count())
            .unwrap_or("");

        if text.chars().count() < min_length.max(1) {
            issues.push(
                RawIssue::new(format!(
                    "Operation {} {} is not documented",
                    op.method.to_uppercase(),
                    op.path
                ))
                .at(json_pointer(&["paths", op.path, op.method])),
            );
        }
    }
    Ok(issues)
}
