//! Structural rules: the document has the shape of an OpenAPI definition.

use std::collections::HashMap;

use serde_json::Value;

use super::{operations, Rule};
use crate::rules::{json_pointer, Category, RawIssue, RuleError, RuleOptions, Severity};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::from_fn("openapi-version", Category::Structural, openapi_version)
            .with_name("OpenAPI Version")
            .with_description("Document declares a supported OpenAPI or Swagger version")
            .with_severity(Severity::Error),
        Rule::from_fn("paths-defined", Category::Structural, paths_defined)
            .with_name("Paths Defined")
            .with_description("Document defines at least one path")
            .with_severity(Severity::Error),
        Rule::from_fn("operation-id-unique", Category::Structural, operation_id_unique)
            .with_name("Unique Operation IDs")
            .with_description("Every operationId is used by exactly one operation")
            .with_severity(Severity::Error),
    ]
}

fn openapi_version(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    if let Some(version) = document.get("openapi") {
        return Ok(match version.as_str() {
            Some(v) if v.starts_with("3.") => vec![],
            Some(v) => vec![RawIssue::new(format!("Unsupported OpenAPI version '{}'", v))
                .at(json_pointer(&["openapi"]))
                .with_suggestion("Use an OpenAPI 3.x version such as \"3.0.3\"")],
            None => vec![RawIssue::new("The 'openapi' field must be a string")
                .at(json_pointer(&["openapi"]))],
        });
    }

    if let Some(version) = document.get("swagger") {
        return Ok(match version.as_str() {
            Some("2.0") => vec![],
            _ => vec![RawIssue::new("The 'swagger' field must be \"2.0\"")
                .at(json_pointer(&["swagger"]))],
        });
    }

    Ok(vec![RawIssue::new(
        "Document declares neither 'openapi' nor 'swagger'",
    )])
}

fn paths_defined(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    match document.get("paths") {
        None => Ok(vec![RawIssue::new("Document has no 'paths' object")
            .with_suggestion("Add a 'paths' object describing the API's endpoints")]),
        Some(Value::Object(paths)) if paths.is_empty() => {
            Ok(vec![RawIssue::new("The 'paths' object is empty").at(json_pointer(&["paths"]))])
        }
        Some(Value::Object(_)) => Ok(vec![]),
        Some(_) => Ok(vec![
            RawIssue::new("The 'paths' field must be an object").at(json_pointer(&["paths"]))
        ]),
    }
}

fn operation_id_unique(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    let mut first_seen: HashMap<&str, String> = HashMap::new();
    let mut issues = Vec::new();

    for op in operations(document) {
        let Some(id) = op.body.get("operationId").and_then(Value::as_str) else {
            continue;
        };
        let pointer = json_pointer(&["paths", op.path, op.method, "operationId"]);
        match first_seen.get(id) {
            Some(original) => issues.push(
                RawIssue::new(format!("Duplicate operationId '{}'", id))
                    .at(pointer)
                    .with_suggestion(format!("Already used at {}", original)),
            ),
            None => {
                first_seen.insert(id, pointer);
            }
        }
    }

    Ok(issues)
}
