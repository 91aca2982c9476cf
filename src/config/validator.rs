//! Structural validation of configuration files.
//!
//! Runs on the raw parsed value before it is deserialized, so that a
//! malformed file produces an error naming the property, the expected
//! shape and the offending value instead of a generic parse failure.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{GuardianError, Result};
use crate::rules::Severity;

/// Validate the shape of a parsed configuration document.
///
/// # Errors
///
/// Returns `InvalidConfigField` for the first property with the wrong shape.
pub fn validate_shape(value: &Value, path: &Path) -> Result<()> {
    let root = value
        .as_object()
        .ok_or_else(|| invalid(path, "<root>", "an object", value))?;

    if let Some(extends) = root.get("extends") {
        validate_extends(extends, "extends", path)?;
    }

    if let Some(rules) = root.get("rules") {
        validate_rules(rules, "rules", path)?;
    }

    if let Some(rulesets) = root.get("rulesets") {
        let rulesets = rulesets
            .as_object()
            .ok_or_else(|| invalid(path, "rulesets", "an object", rulesets))?;
        for (name, definition) in rulesets {
            validate_ruleset(definition, &format!("rulesets.{}", name), path)?;
        }
    }

    if let Some(files) = root.get("files") {
        let files = files
            .as_array()
            .ok_or_else(|| invalid(path, "files", "an array", files))?;
        for (index, entry) in files.iter().enumerate() {
            validate_file_pattern(entry, &format!("files[{}]", index), path)?;
        }
    }

    if let Some(severity) = root.get("defaultSeverity") {
        validate_severity(severity, "defaultSeverity", path)?;
    }

    for key in ["failOnWarnings", "showInfo"] {
        if let Some(flag) = root.get(key) {
            if !flag.is_boolean() {
                return Err(invalid(path, key, "a boolean", flag));
            }
        }
    }

    Ok(())
}

fn validate_extends(value: &Value, field: &str, path: &Path) -> Result<()> {
    const EXPECTED: &str = "a string or an array of strings";
    match value {
        Value::String(_) => Ok(()),
        Value::Array(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                if !entry.is_string() {
                    return Err(invalid(path, &format!("{}[{}]", field, index), "a string", entry));
                }
            }
            Ok(())
        }
        other => Err(invalid(path, field, EXPECTED, other)),
    }
}

fn validate_rules(value: &Value, field: &str, path: &Path) -> Result<()> {
    let rules = value
        .as_object()
        .ok_or_else(|| invalid(path, field, "an object", value))?;

    for (id, setting) in rules {
        let field = format!("{}.{}", field, id);
        match setting {
            Value::Bool(_) => {}
            Value::Object(fields) => validate_override(fields, &field, path)?,
            other => {
                return Err(invalid(
                    path,
                    &field,
                    "a boolean or an object with severity/enabled/options",
                    other,
                ))
            }
        }
    }
    Ok(())
}

fn validate_override(fields: &Map<String, Value>, field: &str, path: &Path) -> Result<()> {
    if let Some(severity) = fields.get("severity") {
        validate_severity(severity, &format!("{}.severity", field), path)?;
    }
    if let Some(enabled) = fields.get("enabled") {
        if !enabled.is_boolean() {
            return Err(invalid(path, &format!("{}.enabled", field), "a boolean", enabled));
        }
    }
    if let Some(options) = fields.get("options") {
        if !options.is_object() {
            return Err(invalid(path, &format!("{}.options", field), "an object", options));
        }
    }
    Ok(())
}

fn validate_ruleset(value: &Value, field: &str, path: &Path) -> Result<()> {
    let definition = value
        .as_object()
        .ok_or_else(|| invalid(path, field, "an object", value))?;

    if let Some(rules) = definition.get("rules") {
        validate_rules(rules, &format!("{}.rules", field), path)?;
    }
    if let Some(extends) = definition.get("extends") {
        validate_extends(extends, &format!("{}.extends", field), path)?;
    }
    if let Some(severity) = definition.get("defaultSeverity") {
        validate_severity(severity, &format!("{}.defaultSeverity", field), path)?;
    }
    Ok(())
}

fn validate_file_pattern(value: &Value, field: &str, path: &Path) -> Result<()> {
    let pattern = value
        .as_object()
        .ok_or_else(|| invalid(path, field, "an object with 'patterns'", value))?;

    for key in ["patterns", "ignore"] {
        if let Some(list) = pattern.get(key) {
            let all_strings = list
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string));
            if !all_strings {
                return Err(invalid(
                    path,
                    &format!("{}.{}", field, key),
                    "an array of strings",
                    list,
                ));
            }
        }
    }
    Ok(())
}

fn validate_severity(value: &Value, field: &str, path: &Path) -> Result<()> {
    match value.as_str().and_then(Severity::parse) {
        Some(_) => Ok(()),
        None => Err(invalid(
            path,
            field,
            "one of error, warning, info, hint",
            value,
        )),
    }
}

fn invalid(path: &Path, field: &str, expected: &str, found: &Value) -> GuardianError {
    GuardianError::InvalidConfigField {
        path: path.to_path_buf(),
        field: field.to_string(),
        expected: expected.to_string(),
        found: describe(found),
    }
}

/// Describe a value by kind and content, e.g. `number 42`.
fn describe(value: &Value) -> String {
    let kind = match value {
        Value::Null => return "null".to_string(),
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    let mut shown = value.to_string();
    if shown.len() > 60 {
        let cut = (0..=57).rev().find(|i| shown.is_char_boundary(*i)).unwrap_or(0);
        shown.truncate(cut);
        shown.push_str("...");
    }
    format!("{} {}", kind, shown)
}
