//! Security rules.

use serde_json::Value;

use super::{operations, Rule};
use crate::rules::{json_pointer, Category, RawIssue, RuleError, RuleOptions, Severity};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::from_fn("servers-https", Category::Security, servers_https)
            .with_name("HTTPS Servers")
            .with_description("Server URLs use HTTPS")
            .with_severity(Severity::Error)
            .with_option("allowLocalhost", true),
        Rule::from_fn(
            "security-schemes-defined",
            Category::Security,
            security_schemes_defined,
        )
        .with_name("Security Schemes Defined")
        .with_description("Security requirements reference declared security schemes")
        .with_severity(Severity::Warning),
    ]
}

fn is_local(url: &str) -> bool {
    let rest = url.trim_start_matches("http://");
    rest.starts_with("localhost") || rest.starts_with("127.0.0.1")
}

fn servers_https(document: &Value, options: &RuleOptions) -> Result<Vec<RawIssue>, RuleError> {
    let allow_localhost = options
        .get("allowLocalhost")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let Some(servers) = document.get("servers").and_then(Value::as_array) else {
        return Ok(vec![]);
    };

    let mut issues = Vec::new();
    for (index, server) in servers.iter().enumerate() {
        let Some(url) = server.get("url").and_then(Value::as_str) else {
            continue;
        };
        if url.starts_with("http://") && !(allow_localhost && is_local(url)) {
            let index = index.to_string();
            issues.push(
                RawIssue::new(format!("Server URL '{}' does not use HTTPS", url))
                    .at(json_pointer(&["servers", index.as_str(), "url"]))
                    .with_suggestion(url.replacen("http://", "https://", 1)),
            );
        }
    }
    Ok(issues)
}

/// Names of declared schemes, for OpenAPI 3 and Swagger 2 documents.
fn declared_schemes(document: &Value) -> Vec<&str> {
    let schemes = document
        .pointer("/components/securitySchemes")
        .or_else(|| document.get("securityDefinitions"))
        .and_then(Value::as_object);
    schemes
        .map(|s| s.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

fn undeclared<'a>(requirements: &'a Value, declared: &[&str]) -> Vec<&'a str> {
    requirements
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flat_map(|requirement| requirement.keys())
        .map(String::as_str)
        .filter(|name| !declared.contains(name))
        .collect()
}

fn security_schemes_defined(
    document: &Value,
    _: &RuleOptions,
) -> Result<Vec<RawIssue>, RuleError> {
    let declared = declared_schemes(document);
    let mut issues = Vec::new();

    if let Some(global) = document.get("security") {
        for name in undeclared(global, &declared) {
            issues.push(
                RawIssue::new(format!("Security scheme '{}' is not declared", name))
                    .at(json_pointer(&["security"])),
            );
        }
    }

    for op in operations(document) {
        if let Some(security) = op.body.get("security") {
            for name in undeclared(security, &declared) {
                issues.push(
                    RawIssue::new(format!(
                        "Operation {} {} uses undeclared security scheme '{}'",
                        op.method.to_uppercase(),
                        op.path,
                        name
                    ))
                    .at(json_pointer(&["paths", op.path, op.method, "security"])),
                );
            }
        }
    }
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_servers_are_flagged() {
        let doc = json!({"servers": [
            {"url": "https://api.example.com"},
            {"url": "http://api.example.com"},
            {"url": "http://localhost:8080"}
        ]});
        let issues = servers_https(&doc, &RuleOptions::new()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path.as_deref(), Some("/servers/1/url"));
        assert_eq!(issues[0].suggestion.as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn localhost_can_be_disallowed() {
        let doc = json!({"servers": [{"url": "http://localhost:8080"}]});
        let options = json!({"allowLocalhost": false}).as_object().cloned().unwrap();
        assert_eq!(servers_https(&doc, &options).unwrap().len(), 1);
    }

    #[test]
    fn undeclared_schemes_are_reported() {
        let doc = json!({
            "components": {"securitySchemes": {"apiKey": {"type": "apiKey"}}},
            "security": [{"apiKey": []}, {"oauth": []}],
            "paths": {"/pets": {"get": {"security": [{"basic": []}]}}}
        });
        let issues = security_schemes_defined(&doc, &RuleOptions::new()).unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.as_deref().unwrap().contains("'oauth'"));
        assert_eq!(issues[1].path.as_deref(), Some("/paths/~1pets/get/security"));
    }

    #[test]
    fn swagger_security_definitions_count_as_declared() {
        let doc = json!({
            "securityDefinitions": {"basic": {"type": "basic"}},
            "security": [{"basic": []}]
        });
        assert!(security_schemes_defined(&doc, &RuleOptions::new())
            .unwrap()
            .is_empty());
    }
}
