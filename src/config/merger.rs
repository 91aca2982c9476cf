//! Merging of layered configurations.
//!
//! Configurations are layered through `extends`: each parent is merged
//! into an accumulator and the child is merged last.
//!
//! # Merge Rules
//!
//! - Scalars take the child's value when set, otherwise the parent's
//! - `files` is replaced entirely (not merged)
//! - `rules` and `rulesets` are unioned per key; the child's entry replaces
//!   the parent's entry for the same key without any nested merge
//! - Custom top-level keys are copied from the child over the parent

use std::collections::BTreeMap;

use super::schema::GuardianConfig;

/// Merge `child` over `parent`.
pub fn merge_configs(parent: &GuardianConfig, child: &GuardianConfig) -> GuardianConfig {
    let mut extra = parent.extra.clone();
    extra.extend(child.extra.clone());

    GuardianConfig {
        extends: child.extends.clone().or_else(|| parent.extends.clone()),
        rules: union(&parent.rules, &child.rules),
        rulesets: union(&parent.rulesets, &child.rulesets),
        files: child.files.clone().or_else(|| parent.files.clone()),
        default_severity: child.default_severity.or(parent.default_severity),
        fail_on_warnings: child.fail_on_warnings.or(parent.fail_on_warnings),
        show_info: child.show_info.or(parent.show_info),
        extra,
    }
}

/// Merge a list of configurations in order (later overrides earlier).
pub fn merge_all<'a, I>(configs: I) -> GuardianConfig
where
    I: IntoIterator<Item = &'a GuardianConfig>,
{
    configs
        .into_iter()
        .fold(GuardianConfig::default(), |acc, config| {
            merge_configs(&acc, config)
        })
}

/// Shallow union of two optional maps, entries of `child` winning.
fn union<V: Clone>(
    parent: &Option<BTreeMap<String, V>>,
    child: &Option<BTreeMap<String, V>>,
) -> Option<BTreeMap<String, V>> {
    match (parent, child) {
        (None, None) => None,
        (Some(map), None) | (None, Some(map)) => Some(map.clone()),
        (Some(parent), Some(child)) => {
            let mut merged = parent.clone();
            merged.extend(child.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some(merged)
        }
    }
}
