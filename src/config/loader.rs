//! Configuration file discovery, loading and `extends` resolution.
//!
//! [`ConfigResolver`] loads configuration files (JSON for `.json`, YAML
//! otherwise), validates their shape, caches them per path and flattens
//! their `extends` chains into a single configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, debug_span, info, Span};

use super::cache::{ConfigCache, DEFAULT_CAPACITY};
use super::extends::{resolve_preset, ExtendsRef, DEFAULT_MAX_DEPTH};
use super::merger::merge_configs;
use super::presets::ruleset_layer;
use super::schema::{default_config, GuardianConfig, ResolvedConfig};
use super::validator::validate_shape;
use crate::error::{GuardianError, Result};

/// Configuration file names, in discovery priority order.
pub const CONFIG_FILE_NAMES: [&str; 3] = [
    ".api-guardian.yaml",
    ".api-guardian.yml",
    ".api-guardian.json",
];

/// Find the nearest configuration file by walking up from `start`.
///
/// # Returns
///
/// The path to the configuration file, or None if not found.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        for name in CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Parse configuration content.
///
/// `source_path` selects the format (JSON for `.json`, YAML otherwise) and
/// is used for error reporting.
///
/// # Errors
///
/// Returns `ConfigParseError` if the content is not valid JSON/YAML and
/// `InvalidConfigField` if a property has the wrong shape.
pub fn parse_config(content: &str, source_path: &Path) -> Result<GuardianConfig> {
    let is_json = source_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed: std::result::Result<Value, String> = if content.trim().is_empty() {
        Ok(Value::Null)
    } else if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    };
    let mut value = parsed.map_err(|message| GuardianError::ConfigParseError {
        path: source_path.to_path_buf(),
        message,
    })?;

    // An empty document is an empty configuration.
    if value.is_null() {
        value = Value::Object(Default::default());
    }

    validate_shape(&value, source_path)?;

    serde_json::from_value(value).map_err(|e| GuardianError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads and resolves configuration files.
///
/// # Example
///
/// ```
/// use api_guardian::config::ConfigResolver;
/// use tempfile::TempDir;
/// use std::fs;
///
/// let temp = TempDir::new().unwrap();
/// fs::write(temp.path().join("base.yaml"), "failOnWarnings: true").unwrap();
/// fs::write(
///     temp.path().join(".api-guardian.yaml"),
///     "extends: ./base.yaml\nshowInfo: false",
/// )
/// .unwrap();
///
/// let mut resolver = ConfigResolver::new();
/// let resolved = resolver.discover(temp.path()).unwrap();
/// assert!(resolved.config.fail_on_warnings());
/// assert!(!resolved.config.show_info());
/// ```
#[derive(Debug)]
pub struct ConfigResolver {
    cache: ConfigCache,
    max_depth: usize,
    span: Span,
}

impl ConfigResolver {
    /// Create a resolver with default settings.
    pub fn new() -> Self {
        Self::with_options(DEFAULT_MAX_DEPTH, DEFAULT_CAPACITY)
    }

    /// Create a resolver with a custom max depth and cache capacity.
    pub fn with_options(max_depth: usize, cache_capacity: usize) -> Self {
        Self {
            cache: ConfigCache::with_capacity(cache_capacity),
            max_depth,
            span: debug_span!("config_resolver"),
        }
    }

    /// Get the maximum extends depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Load a single configuration file without resolving `extends`.
    ///
    /// Results are cached per path until invalidated.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file doesn't exist, otherwise the
    /// errors of [`parse_config`].
    pub fn load_config(&mut self, path: &Path) -> Result<GuardianConfig> {
        let span = self.span.clone();
        let _guard = span.enter();

        let key = cache_key(path);
        if let Some(config) = self.cache.get(&key) {
            debug!(path = %key.display(), "Configuration cache hit");
            return Ok(config.clone());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GuardianError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                GuardianError::Io(e)
            }
        })?;
        let config = parse_config(&content, path)?;

        debug!(path = %key.display(), "Loaded configuration");
        self.cache.insert(key, config.clone());
        Ok(config)
    }

    /// Resolve all `extends` references and merge configurations.
    ///
    /// File references are relative to `base_dir`. A configuration without
    /// `extends` is returned unchanged; otherwise the result starts from
    /// the default configuration, layers every extension in order, then
    /// the configuration itself, and has `extends` cleared.
    pub fn resolve_extends(
        &mut self,
        config: &GuardianConfig,
        base_dir: &Path,
    ) -> Result<GuardianConfig> {
        let span = self.span.clone();
        let _guard = span.enter();
        self.resolve_with_chain(config, base_dir, &mut Vec::new())
    }

    /// Load a configuration file and resolve it completely.
    pub fn resolve(&mut self, path: &Path) -> Result<ResolvedConfig> {
        let span = self.span.clone();
        let _guard = span.enter();

        let config = self.load_config(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut chain = vec![cache_key(path)];
        let resolved = self.resolve_with_chain(&config, base_dir, &mut chain)?;

        info!(path = %path.display(), "Resolved configuration");
        Ok(ResolvedConfig::new(
            merge_configs(&default_config(), &resolved),
            Some(path),
        ))
    }

    /// Find the nearest configuration file from `start` and resolve it.
    ///
    /// Falls back to the default configuration when none exists.
    pub fn discover(&mut self, start: &Path) -> Result<ResolvedConfig> {
        match find_config(start) {
            Some(path) => self.resolve(&path),
            None => {
                debug!(start = %start.display(), "No configuration file found, using defaults");
                Ok(ResolvedConfig::defaults())
            }
        }
    }

    /// Drop a cached file. Returns whether it was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.cache.invalidate(&cache_key(path))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    fn resolve_with_chain(
        &mut self,
        config: &GuardianConfig,
        base_dir: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<GuardianConfig> {
        let entries = config.extends_entries();
        if entries.is_empty() {
            return Ok(config.clone());
        }

        if chain.len() > self.max_depth {
            return Err(GuardianError::ConfigValidationError {
                message: format!(
                    "Config extends depth exceeds maximum of {}",
                    self.max_depth
                ),
            });
        }

        let mut merged = default_config();
        for entry in entries {
            match ExtendsRef::parse(&entry)? {
                ExtendsRef::File(relative) => {
                    let path = cache_key(&base_dir.join(relative));
                    if chain.contains(&path) {
                        chain.push(path);
                        return Err(GuardianError::CircularExtends {
                            chain: chain
                                .iter()
                                .map(|p| p.display().to_string())
                                .collect::<Vec<_>>()
                                .join(" -> "),
                        });
                    }

                    debug!(entry = %entry, path = %path.display(), "Extending configuration file");
                    let parent = self.load_config(&path)?;
                    let parent_dir = path
                        .parent()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| base_dir.to_path_buf());

                    chain.push(path);
                    let resolved = self.resolve_with_chain(&parent, &parent_dir, chain)?;
                    chain.pop();

                    merged = merge_configs(&merged, &resolved);
                }
                ExtendsRef::Preset { namespace, name } => {
                    if let Some(definition) = resolve_preset(&namespace, &name)? {
                        debug!(entry = %entry, "Extending preset");
                        merged = merge_configs(&merged, &ruleset_layer(&definition));
                    }
                }
            }
        }

        let mut result = merge_configs(&merged, config);
        result.extends = None;
        Ok(result)
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical form of a path where possible, so one file has one key.
fn cache_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleOverride, RuleSetting, Severity};
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
    fn parses_yaml_and_json_by_extension() {
        let yaml = parse_config("failOnWarnings: true", Path::new("c.yaml")).unwrap();
        assert_eq!(yaml.fail_on_warnings, Some(true));

        let json = parse_config(r#"{"showInfo": false}"#, Path::new("c.json")).unwrap();
        assert_eq!(json.show_info, Some(false));
    }

    #[test]
    fn empty_file_is_empty_config() {
        let config = parse_config("", Path::new("c.yaml")).unwrap();
        assert_eq!(config, GuardianConfig::default());
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = parse_config("{not json", Path::new("c.json")).unwrap_err();
        assert!(matches!(err, GuardianError::ConfigParseError { .. }));

        let err = parse_config("rules: [unclosed", Path::new("c.yaml")).unwrap_err();
        assert!(matches!(err, GuardianError::ConfigParseError { .. }));
    }

    #[test]
    fn shape_errors_name_the_field() {
        let err = parse_config("extends: 42", Path::new("c.yaml")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'extends'"));
        assert!(msg.contains("number 42"));
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let mut resolver = ConfigResolver::new();
        let err = resolver.load_config(&temp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, GuardianError::ConfigNotFound { .. }));
    }

    #[test]
    fn load_config_is_cached_until_invalidated() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "c.yaml", "failOnWarnings: true");
        let mut resolver = ConfigResolver::new();

        assert_eq!(resolver.load_config(&path).unwrap().fail_on_warnings, Some(true));
        fs::write(&path, "failOnWarnings: false").unwrap();
        assert_eq!(resolver.load_config(&path).unwrap().fail_on_warnings, Some(true));
        assert_eq!(resolver.cached_count(), 1);

        assert!(resolver.invalidate(&path));
        assert_eq!(resolver.load_config(&path).unwrap().fail_on_warnings, Some(false));

        resolver.clear_cache();
        assert_eq!(resolver.cached_count(), 0);
    }

    #[test]
    fn config_without_extends_unchanged() {
        let temp = TempDir::new().unwrap();
        let config = GuardianConfig {
            fail_on_warnings: Some(true),
            ..Default::default()
        };
        let mut resolver = ConfigResolver::new();
        assert_eq!(resolver.resolve_extends(&config, temp.path()).unwrap(), config);
    }

    #[test]
    fn extends_chain_merges_in_order() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "shared/base.yaml",
            "rules:\n  a: {severity: error}\nfailOnWarnings: false",
        );
        write(
            temp.path(),
            "shared/middle.yaml",
            "extends: ./base.yaml\nrules:\n  b: false\nshowInfo: false",
        );
        let top = write(
            temp.path(),
            ".api-guardian.yaml",
            "extends: ./shared/middle.yaml\nrules:\n  a: {severity: warning}\nfailOnWarnings: true",
        );

        let mut resolver = ConfigResolver::new();
        let resolved = resolver.resolve(&top).unwrap();
        let rules = resolved.config.rules.as_ref().unwrap();

        assert_eq!(
            rules["a"],
            RuleSetting::Override(RuleOverride::severity(Severity::Warning))
        );
        assert_eq!(rules["b"], RuleSetting::Toggle(false));
        assert!(resolved.config.fail_on_warnings());
        assert!(!resolved.config.show_info());
        assert!(resolved.config.extends.is_none());
        assert!(resolved.config.files.is_some());
        assert_eq!(resolved.config_path.as_deref(), Some(top.as_path()));
    }

    #[test]
    fn later_extends_win_over_earlier() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "one.yaml", "defaultSeverity: error");
        write(temp.path(), "two.yaml", "defaultSeverity: hint");
        let config: GuardianConfig =
            serde_yaml::from_str("extends: [one.yaml, two.yaml]").unwrap();

        let mut resolver = ConfigResolver::new();
        let resolved = resolver.resolve_extends(&config, temp.path()).unwrap();

        assert_eq!(resolved.default_severity, Some(Severity::Hint));
    }

    #[test]
    fn presets_merge_under_local_rules() {
        let temp = TempDir::new().unwrap();
        let config: GuardianConfig = serde_yaml::from_str(
            "extends: api-guardian:lenient\nrules:\n  operation-tags: true",
        )
        .unwrap();

        let mut resolver = ConfigResolver::new();
        let resolved = resolver.resolve_extends(&config, temp.path()).unwrap();
        let rules = resolved.rules.unwrap();

        assert_eq!(rules["operation-tags"], RuleSetting::Toggle(true));
        assert_eq!(rules["info-license"], RuleSetting::Toggle(false));
        assert_eq!(resolved.default_severity, Some(Severity::Info));
    }

    #[test]
    fn spectral_extends_are_skipped() {
        let temp = TempDir::new().unwrap();
        let config: GuardianConfig =
            serde_yaml::from_str("extends: spectral:oas\nshowInfo: false").unwrap();

        let mut resolver = ConfigResolver::new();
        let resolved = resolver.resolve_extends(&config, temp.path()).unwrap();

        assert_eq!(resolved.show_info, Some(false));
        assert_eq!(resolved.rules, Some(Default::default()));
    }

    #[test]
    fn circular_extends_detected() {
        let temp = TempDir::new().unwrap();
        let a = write(temp.path(), "a.yaml", "extends: ./b.yaml");
        write(temp.path(), "b.yaml", "extends: ./a.yaml");

        let mut resolver = ConfigResolver::new();
        let err = resolver.resolve(&a).unwrap_err();

        assert!(matches!(err, GuardianError::CircularExtends { .. }));
        let msg = err.to_string();
        assert!(msg.contains("a.yaml -> "));
        assert!(msg.contains("b.yaml"));
    }

    #[test]
    fn self_extends_detected() {
        let temp = TempDir::new().unwrap();
        let a = write(temp.path(), "a.yaml", "extends: ./a.yaml");

        let mut resolver = ConfigResolver::new();
        let err = resolver.resolve(&a).unwrap_err();
        assert!(matches!(err, GuardianError::CircularExtends { .. }));
    }

    #[test]
    fn depth_limit_enforced() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "c.yaml", "showInfo: true");
        write(temp.path(), "b.yaml", "extends: ./c.yaml");
        let a = write(temp.path(), "a.yaml", "extends: ./b.yaml");

        let mut resolver = ConfigResolver::with_options(1, DEFAULT_CAPACITY);
        let err = resolver.resolve(&a).unwrap_err();
        assert!(err.to_string().contains("depth"));

        let mut resolver = ConfigResolver::new();
        assert!(resolver.resolve(&a).is_ok());
    }

    #[test]
    fn unknown_preset_fails() {
        let temp = TempDir::new().unwrap();
        let config: GuardianConfig = serde_yaml::from_str("extends: preset:paranoid").unwrap();
        let mut resolver = ConfigResolver::new();
        let err = resolver.resolve_extends(&config, temp.path()).unwrap_err();
        assert!(matches!(err, GuardianError::UnknownPreset { .. }));
    }

    #[test]
    fn missing_extended_file_fails() {
        let temp = TempDir::new().unwrap();
        let config: GuardianConfig = serde_yaml::from_str("extends: ./missing.yaml").unwrap();
        let mut resolver = ConfigResolver::new();
        let err = resolver.resolve_extends(&config, temp.path()).unwrap_err();
        assert!(matches!(err, GuardianError::ConfigNotFound { .. }));
    }

    #[test]
    fn find_config_walks_up() {
        let temp = TempDir::new().unwrap();
        let config = write(temp.path(), ".api-guardian.json", "{}");
        let nested = temp.path().join("specs").join("v1");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), Some(config));
    }

    #[test]
    fn find_config_prefers_yaml() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".api-guardian.json", "{}");
        let yaml = write(temp.path(), ".api-guardian.yaml", "");
        assert_eq!(find_config(temp.path()), Some(yaml));
    }

    #[test]
    fn discover_without_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let mut resolver = ConfigResolver::new();
        let resolved = resolver.discover(temp.path()).unwrap();
        if resolved.config_path.is_none() {
            assert_eq!(resolved, ResolvedConfig::defaults());
        }
    }
}
