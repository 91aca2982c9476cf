//! Integration tests for config module public API.

use api_guardian::config::{
    apply_overrides, default_config, find_config, merge_configs, CliOverrides, ConfigResolver,
    GuardianConfig,
};
use api_guardian::output::OutputFormat;
use api_guardian::rules::{RuleOverride, RuleSetting, Severity};
use api_guardian::GuardianError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn public_api_is_accessible() {
    let _config = GuardianConfig::default();
    let _resolver = ConfigResolver::new();
    let _overrides = CliOverrides::default();
}

#[test]
fn full_config_workflow() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "configs/org.json",
        r#"{"extends": "api-guardian:standard", "rules": {"operation-tags": {"severity": "error"}}}"#,
    );
    write(
        temp.path(),
        ".api-guardian.yaml",
        r#"
extends:
  - ./configs/org.json
  - spectral:oas
rules:
  info-contact: false
rulesets:
  release:
    extends: preset:strict
    rules:
      path-kebab-case: false
team: payments
"#,
    );
    let nested = temp.path().join("specs").join("v2");
    fs::create_dir_all(&nested).unwrap();

    let mut resolver = ConfigResolver::new();
    let resolved = resolver.discover(&nested).unwrap();
    let cli = CliOverrides {
        ruleset: Some("release".into()),
        ignore_paths: vec!["specs/drafts/**".into()],
        format: Some(OutputFormat::Json),
        ..Default::default()
    };
    let resolved = apply_overrides(resolved, &cli).unwrap();

    let rules = resolved.config.rules.as_ref().unwrap();
    assert_eq!(
        rules["operation-tags"],
        RuleSetting::Override(RuleOverride::severity(Severity::Error))
    );
    assert_eq!(rules["info-contact"], RuleSetting::Toggle(false));
    assert_eq!(resolved.config.extra["team"], "payments");
    assert!(resolved.config.files.as_ref().unwrap()[0]
        .ignore
        .contains(&"specs/drafts/**".to_string()));
    assert_eq!(resolved.format, Some(OutputFormat::Json));

    let settings = resolved.effective_settings().unwrap();
    assert_eq!(settings.rules["path-kebab-case"], RuleSetting::Toggle(false));
    assert!(settings.rules.contains_key("info-version-semver"));
    assert_eq!(settings.default_severity, Some(Severity::Error));
}

#[test]
fn merge_of_overrides_is_shallow() {
    let parent: GuardianConfig = serde_yaml::from_str(
        "rules:\n  r: {severity: error, options: {max: 3}}\n  keep: true",
    )
    .unwrap();
    let child: GuardianConfig = serde_yaml::from_str("rules:\n  r: {enabled: false}").unwrap();

    let merged = merge_configs(&parent, &child);
    let rules = merged.rules.unwrap();

    assert_eq!(rules["r"], RuleSetting::Override(RuleOverride::enabled(false)));
    assert_eq!(rules["keep"], RuleSetting::Toggle(true));
}

#[test]
fn three_level_chain_resolves_relative_to_each_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a/b/base.yaml", "defaultSeverity: hint\nshowInfo: false");
    write(temp.path(), "a/middle.yaml", "extends: ./b/base.yaml\nfailOnWarnings: true");
    let top = write(temp.path(), "top.yml", "extends: ./a/middle.yaml\ndefaultSeverity: info");

    let resolved = ConfigResolver::new().resolve(&top).unwrap();

    assert_eq!(resolved.config.default_severity, Some(Severity::Info));
    assert!(resolved.config.fail_on_warnings());
    assert!(!resolved.config.show_info());
}

#[test]
fn circular_chain_is_reported() {
    let temp = TempDir::new().unwrap();
    let a = write(temp.path(), "a.yaml", "extends: ./b.yaml");
    write(temp.path(), "b.yaml", "extends: ./c.yaml");
    write(temp.path(), "c.yaml", "extends: ./a.yaml");

    let err = ConfigResolver::new().resolve(&a).unwrap_err();

    assert!(err.is_configuration_error());
    let msg = err.to_string();
    assert!(msg.starts_with("Circular extends detected"));
    assert_eq!(msg.matches(" -> ").count(), 3);
}

#[test]
fn unknown_namespace_and_preset_fail() {
    let temp = TempDir::new().unwrap();
    let ns = write(temp.path(), "ns.yaml", "extends: acme:strict");
    let preset = write(temp.path(), "preset.yaml", "extends: api-guardian:paranoid");

    let mut resolver = ConfigResolver::new();
    assert!(matches!(
        resolver.resolve(&ns).unwrap_err(),
        GuardianError::UnknownNamespace { .. }
    ));
    assert!(matches!(
        resolver.resolve(&preset).unwrap_err(),
        GuardianError::UnknownPreset { .. }
    ));
}

#[test]
fn invalid_shapes_name_the_field() {
    let temp = TempDir::new().unwrap();
    let cases = [
        ("extends: {a: 1}", "'extends'"),
        ("rules: [a]", "'rules'"),
        ("rulesets: nope", "'rulesets'"),
        ("files: {}", "'files'"),
        ("failOnWarnings: 1", "'failOnWarnings'"),
        ("showInfo: maybe", "'showInfo'"),
        ("defaultSeverity: fatal", "'defaultSeverity'"),
    ];

    for (index, (content, field)) in cases.iter().enumerate() {
        let path = write(temp.path(), &format!("c{}.yaml", index), content);
        let err = ConfigResolver::new().resolve(&path).unwrap_err();
        assert!(
            matches!(err, GuardianError::InvalidConfigField { .. }),
            "{}: {}",
            content,
            err
        );
        assert!(err.to_string().contains(field), "{}: {}", content, err);
    }
}

#[test]
fn json_configuration_files_are_supported() {
    let temp = TempDir::new().unwrap();
    let path = write(
        temp.path(),
        ".api-guardian.json",
        r#"{"failOnWarnings": true, "rules": {"servers-https": false}}"#,
    );

    assert_eq!(find_config(temp.path()), Some(path.clone()));
    let resolved = ConfigResolver::new().resolve(&path).unwrap();
    assert!(resolved.config.fail_on_warnings());
}

#[test]
fn resolver_cache_can_be_invalidated() {
    let temp = TempDir::new().unwrap();
    let path = write(temp.path(), "c.yaml", "showInfo: true");
    let mut resolver = ConfigResolver::new();

    assert!(resolver.resolve(&path).unwrap().config.show_info());
    fs::write(&path, "showInfo: false").unwrap();
    assert!(resolver.resolve(&path).unwrap().config.show_info());

    resolver.invalidate(&path);
    assert!(!resolver.resolve(&path).unwrap().config.show_info());
}

#[test]
fn defaults_are_the_baseline() {
    let temp = TempDir::new().unwrap();
    let path = write(temp.path(), "empty.yaml", "");

    let resolved = ConfigResolver::new().resolve(&path).unwrap();

    assert_eq!(resolved.config, default_config());
}
