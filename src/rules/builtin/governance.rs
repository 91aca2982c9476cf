//! Governance rules: ownership, licensing, versioning.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{is_blank, operations, Rule};
use crate::rules::{json_pointer, Category, RawIssue, RuleError, RuleOptions, Severity};

static SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?$")
        .unwrap()
});

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::from_fn("operation-tags", Category::Governance, operation_tags)
            .with_name("Operation Tags")
            .with_description("Every operation has at least one tag")
            .with_severity(Severity::Warning),
        Rule::from_fn("info-license", Category::Governance, info_license)
            .with_name("Info License")
            .with_description("The info object declares a license")
            .with_severity(Severity::Info),
        // Opt-in: only the strict preset turns this on.
        Rule::from_fn("info-version-semver", Category::Governance, info_version_semver)
            .with_name("Semantic Version")
            .with_description("info.version follows semantic versioning")
            .with_severity(Severity::Hint)
            .disabled(),
    ]
}

fn operation_tags(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    Ok(operations(document)
        .into_iter()
        .filter(|op| {
            op.body
                .get("tags")
                .and_then(Value::as_array)
                .is_none_or(|tags| tags.is_empty())
        })
        .map(|op| {
            RawIssue::new(format!(
                "Operation {} {} has no tags",
                op.method.to_uppercase(),
                op.path
            ))
            .at(json_pointer(&["paths", op.path, op.method]))
        })
        .collect())
}

fn info_license(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    let name = document.pointer("/info/license/name");
    if is_blank(name) {
        return Ok(vec![RawIssue::new("API info does not declare a license")
            .at(json_pointer(&["info"]))
            .with_suggestion("Add info.license with at least a name")]);
    }
    Ok(vec![])
}

fn info_version_semver(document: &Value, _: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    match document.pointer("/info/version").and_then(Value::as_str) {
        Some(version) if SEMVER.is_match(version) => Ok(vec![]),
        Some(version) => Ok(vec![RawIssue::new(format!(
            "info.version '{}' is not a semantic version",
            version
        ))
        .at(json_pointer(&["info", "version"]))]),
        None => Ok(vec![RawIssue::new("info.version is missing").at(json_pointer(&["info"]))]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn untagged_operations_are_flagged() {
        let doc = json!({"paths": {"/pets": {
            "get": {"tags": ["pets"]},
            "put": {"tags": []},
            "post": {}
        }}});
        assert_eq!(operation_tags(&doc, &RuleOptions::new()).unwrap().len(), 2);
    }

    #[test]
    fn license_name_required() {
        assert_eq!(
            info_license(&json!({"info": {"license": {}}}), &RuleOptions::new())
                .unwrap()
                .len(),
            1
        );
        assert!(
            info_license(&json!({"info": {"license": {"name": "MIT"}}}), &RuleOptions::new())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn semver_versions() {
        let check = |v: &str| {
            info_version_semver(&json!({"info": {"version": v}}), &RuleOptions::new())
                .unwrap()
                .is_empty()
        };
        assert!(check("1.2.3"));
        assert!(check("2.0.0-beta.1"));
        assert!(!check("v1"));
        assert!(!check("1.0"));
    }

    #[test]
    fn semver_rule_is_opt_in() {
        let rule = rules()
            .into_iter()
            .find(|r| r.id.as_str() == "info-version-semver")
            .unwrap();
        assert!(!rule.enabled);
    }
}
