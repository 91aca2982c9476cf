//! Command-line overrides, the final configuration layer.

use tracing::debug;

use super::extends::{available_rulesets, flatten_ruleset};
use super::presets;
use super::schema::{ResolvedConfig, RuleSettings};
use crate::error::{GuardianError, Result};
use crate::output::OutputFormat;
use crate::rules::Severity;

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub ruleset: Option<String>,
    pub ignore_paths: Vec<String>,
    pub format: Option<OutputFormat>,
    pub verbose: Option<bool>,
    pub watch: Option<bool>,
    pub fix: Option<bool>,
}

/// Apply command-line overrides to a resolved configuration.
///
/// A selected ruleset becomes the active ruleset; when it names a built-in
/// preset that the configuration does not define itself, the preset is
/// added to `rulesets`. Ignore paths are appended to every file pattern.
///
/// # Errors
///
/// Returns `UnknownPreset` if the ruleset is neither a preset nor defined
/// in the configuration.
pub fn apply_overrides(mut resolved: ResolvedConfig, cli: &CliOverrides) -> Result<ResolvedConfig> {
    if let Some(name) = &cli.ruleset {
        let rulesets = resolved.config.rulesets.get_or_insert_with(Default::default);
        if !rulesets.contains_key(name) {
            let definition = presets::preset(name).ok_or_else(|| GuardianError::UnknownPreset {
                name: name.clone(),
                available: available_rulesets(rulesets).join(", "),
            })?;
            rulesets.insert(name.clone(), definition);
        }
        debug!(ruleset = %name, "Activated ruleset");
        resolved.active_ruleset = Some(name.clone());
    }

    if !cli.ignore_paths.is_empty() {
        for pattern in resolved.config.files.iter_mut().flatten() {
            pattern.ignore.extend(cli.ignore_paths.iter().cloned());
        }
    }

    if let Some(format) = cli.format {
        resolved.format = Some(format);
    }
    if let Some(verbose) = cli.verbose {
        resolved.verbose = verbose;
    }
    if let Some(watch) = cli.watch {
        resolved.watch = watch;
    }
    if let Some(fix) = cli.fix {
        resolved.fix = fix;
    }

    Ok(resolved)
}

/// Rule settings and default severity that a validation run should use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveSettings {
    pub rules: RuleSettings,
    pub default_severity: Option<Severity>,
}

impl ResolvedConfig {
    /// The configuration's rules with the active ruleset layered on top.
    ///
    /// The active ruleset's `defaultSeverity`, when set, wins over the
    /// configuration's.
    pub fn effective_settings(&self) -> Result<EffectiveSettings> {
        let mut settings = EffectiveSettings {
            rules: self.config.rules.clone().unwrap_or_default(),
            default_severity: self.config.default_severity,
        };

        if let Some(name) = &self.active_ruleset {
            let rulesets = self.config.rulesets.clone().unwrap_or_default();
            let ruleset = flatten_ruleset(&rulesets, name)?;
            settings.rules.extend(ruleset.rules.unwrap_or_default());
            settings.default_severity = ruleset.default_severity.or(settings.default_severity);
        }

        Ok(settings)
    }
}
