//! Configuration inheritance references.
//!
//! An `extends` entry is either a file path or a `namespace:name` preset
//! reference. Rulesets may also extend each other by name. This module
//! classifies entries and flattens ruleset chains; loading of referenced
//! files lives in [`super::loader`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use super::presets::{self, PRESET_NAMESPACES, RESERVED_NAMESPACES};
use super::schema::{RuleSettings, RulesetDefinition};
use crate::error::{GuardianError, Result};

/// Maximum nesting of `extends` chains.
pub const DEFAULT_MAX_DEPTH: usize = 10;

const FILE_EXTENSIONS: [&str; 3] = [".yaml", ".yml", ".json"];

/// A classified `extends` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendsRef {
    /// A configuration file, relative to the referencing file's directory.
    File(PathBuf),
    /// A `namespace:name` preset reference.
    Preset { namespace: String, name: String },
}

impl ExtendsRef {
    /// Classify an `extends` entry.
    ///
    /// Entries containing a path separator or ending in a configuration
    /// file extension are files; everything else must be `namespace:name`.
    pub fn parse(entry: &str) -> Result<Self> {
        let entry = entry.trim();
        let is_file = entry.contains('/')
            || entry.contains('\\')
            || FILE_EXTENSIONS.iter().any(|ext| entry.ends_with(ext));
        if is_file {
            return Ok(ExtendsRef::File(PathBuf::from(entry)));
        }

        match entry.split_once(':') {
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => {
                Ok(ExtendsRef::Preset {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(GuardianError::ConfigValidationError {
                message: format!(
                    "Invalid extends entry '{}': expected a file path or 'namespace:name'",
                    entry
                ),
            }),
        }
    }
}

/// Resolve a preset reference.
///
/// Returns `None` for reserved namespaces, which are accepted but skipped.
pub fn resolve_preset(namespace: &str, name: &str) -> Result<Option<RulesetDefinition>> {
    if RESERVED_NAMESPACES.contains(&namespace) {
        debug!(namespace, name, "Skipping reserved extends namespace");
        return Ok(None);
    }
    if !PRESET_NAMESPACES.contains(&namespace) {
        return Err(GuardianError::UnknownNamespace {
            namespace: namespace.to_string(),
            available: PRESET_NAMESPACES
                .iter()
                .chain(RESERVED_NAMESPACES.iter())
                .copied()
                .collect::<Vec<_>>()
                .join(", "),
        });
    }
    presets::preset(name)
        .map(Some)
        .ok_or_else(|| GuardianError::UnknownPreset {
            name: name.to_string(),
            available: presets::available_presets().join(", "),
        })
}

/// Flatten a named ruleset through its `extends` chain.
///
/// Names are looked up in `rulesets` first and fall back to the built-in
/// presets. A ruleset may extend other rulesets by name or presets as
/// `namespace:name`; later entries win over earlier ones and the
/// ruleset's own rules win over everything it extends.
pub fn flatten_ruleset(
    rulesets: &BTreeMap<String, RulesetDefinition>,
    name: &str,
) -> Result<RulesetDefinition> {
    let mut chain = Vec::new();
    flatten_with_chain(rulesets, name, &mut chain)
}

fn flatten_with_chain(
    rulesets: &BTreeMap<String, RulesetDefinition>,
    name: &str,
    chain: &mut Vec<String>,
) -> Result<RulesetDefinition> {
    if chain.iter().any(|seen| seen == name) {
        chain.push(name.to_string());
        return Err(GuardianError::CircularExtends {
            chain: chain.join(" -> "),
        });
    }
    if chain.len() > DEFAULT_MAX_DEPTH {
        return Err(GuardianError::ConfigValidationError {
            message: format!(
                "Ruleset extends depth exceeds maximum of {}",
                DEFAULT_MAX_DEPTH
            ),
        });
    }

    let definition = lookup_ruleset(rulesets, name)?;
    let Some(extends) = &definition.extends else {
        return Ok(definition);
    };

    chain.push(name.to_string());
    let mut flattened = RulesetDefinition::default();
    for entry in extends.entries() {
        let parent = match entry.split_once(':') {
            Some((namespace, preset)) => match resolve_preset(namespace, preset)? {
                Some(parent) => parent,
                None => continue,
            },
            None => flatten_with_chain(rulesets, &entry, chain)?,
        };
        flattened = layer_ruleset(&flattened, &parent);
    }
    chain.pop();

    let mut result = layer_ruleset(&flattened, &definition);
    result.extends = None;
    Ok(result)
}

fn lookup_ruleset(
    rulesets: &BTreeMap<String, RulesetDefinition>,
    name: &str,
) -> Result<RulesetDefinition> {
    if let Some(definition) = rulesets.get(name) {
        return Ok(definition.clone());
    }
    presets::preset(name).ok_or_else(|| GuardianError::UnknownPreset {
        name: name.to_string(),
        available: available_rulesets(rulesets).join(", "),
    })
}

/// Built-in preset names followed by rulesets defined in configuration.
pub fn available_rulesets(rulesets: &BTreeMap<String, RulesetDefinition>) -> Vec<String> {
    let mut names: Vec<String> = presets::available_presets()
        .into_iter()
        .map(String::from)
        .collect();
    for name in rulesets.keys() {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

fn layer_ruleset(parent: &RulesetDefinition, child: &RulesetDefinition) -> RulesetDefinition {
    let rules = match (&parent.rules, &child.rules) {
        (None, None) => None,
        (Some(rules), None) | (None, Some(rules)) => Some(rules.clone()),
        (Some(parent), Some(child)) => {
            let mut merged: RuleSettings = parent.clone();
            merged.extend(child.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some(merged)
        }
    };
    RulesetDefinition {
        rules,
        extends: child.extends.clone(),
        default_severity: child.default_severity.or(parent.default_severity),
    }
}
