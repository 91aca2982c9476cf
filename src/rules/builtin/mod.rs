//! Built-in rules.
//!
//! Each submodule covers one [`Category`](crate::rules::Category). The
//! rules only read the parsed document; they never resolve `$ref`s.

mod documentation;
mod governance;
mod rest;
mod security;
mod structural;

use serde_json::{Map, Value};

use super::Rule;

/// HTTP methods that may appear as operations in a path item.
const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// All built-in rules, in registration order.
pub fn all() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(structural::rules());
    rules.extend(documentation::rules());
    rules.extend(rest::rules());
    rules.extend(security::rules());
    rules.extend(governance::rules());
    rules
}

/// An operation found under `paths`.
pub(crate) struct Operation<'a> {
    pub path: &'a str,
    pub method: &'a str,
    pub body: &'a Map<String, Value>,
}

/// Iterate over every operation of the document in document order.
pub(crate) fn operations(document: &Value) -> Vec<Operation<'_>> {
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return vec![];
    };

    let mut found = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for method in METHODS {
            if let Some(body) = item.get(method).and_then(Value::as_object) {
                found.push(Operation { path, method, body });
            }
        }
    }
    found
}

/// Whether a value is missing or a blank string.
pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_none_or(|s| s.trim().is_empty())
}
