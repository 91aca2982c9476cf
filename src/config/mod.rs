//! Configuration loading, validation and resolution.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery, loading and `extends` resolution in [`loader`]
//! - Shape validation in [`validator`]
//! - Layer merging in [`merger`]
//! - Built-in presets in [`presets`]
//! - Command-line overrides in [`overrides`]
//!
//! # Example
//!
//! ```
//! use api_guardian::config::{apply_overrides, CliOverrides, ConfigResolver};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join(".api-guardian.yaml"),
//!     "extends: api-guardian:standard\nrules:\n  info-contact: false",
//! )
//! .unwrap();
//!
//! let mut resolver = ConfigResolver::new();
//! let resolved = resolver.discover(temp.path()).unwrap();
//! let cli = CliOverrides {
//!     ruleset: Some("strict".to_string()),
//!     ..Default::default()
//! };
//! let resolved = apply_overrides(resolved, &cli).unwrap();
//!
//! let settings = resolved.effective_settings().unwrap();
//! assert!(settings.rules.contains_key("info-version-semver"));
//! ```
//!
//! # Configuration File Locations
//!
//! The nearest of `.api-guardian.yaml`, `.api-guardian.yml` or
//! `.api-guardian.json`, searching from the working directory upwards.

pub mod cache;
pub mod extends;
pub mod loader;
pub mod merger;
pub mod overrides;
pub mod presets;
pub mod schema;
pub mod validator;

pub use cache::ConfigCache;
pub use extends::{flatten_ruleset, resolve_preset, ExtendsRef};
pub use loader::{find_config, parse_config, ConfigResolver, CONFIG_FILE_NAMES};
pub use merger::{merge_all, merge_configs};
pub use overrides::{apply_overrides, CliOverrides, EffectiveSettings};
pub use presets::{available_presets, preset};
pub use schema::{
    config_json_schema, default_config, Extends, FilePattern, GuardianConfig, ResolvedConfig,
    RuleSettings, RulesetDefinition,
};
pub use validator::validate_shape;
