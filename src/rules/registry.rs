//! Rule registry for managing validation rules.
//!
//! The [`RuleRegistry`] stores registered rules in registration order,
//! indexes them by category, and keeps the user overrides that shape each
//! rule's [`EffectiveRule`] at validation time.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, debug_span, Span};

use super::overrides::{EffectiveRule, RuleOverride, RuleSetting};
use super::rule::{Category, Rule, RuleId, Severity};
use crate::error::{GuardianError, Result};

/// Registry of available rules and their overrides.
pub struct RuleRegistry {
    rules: HashMap<RuleId, Rule>,
    order: Vec<RuleId>,
    by_category: BTreeMap<Category, Vec<RuleId>>,
    overrides: HashMap<RuleId, RuleOverride>,
    span: Span,
}

/// Aggregate counts over a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total: usize,
    pub enabled: usize,
    pub disabled: usize,
    pub overridden: usize,
    pub by_category: BTreeMap<Category, usize>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            order: Vec::new(),
            by_category: BTreeMap::new(),
            overrides: HashMap::new(),
            span: debug_span!("rule_registry"),
        }
    }

    /// Create a registry with all built-in rules.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        registry.register_batch(super::builtin::all())?;
        Ok(registry)
    }

    /// Register a rule.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRule` if a rule with the same id is registered.
    pub fn register(&mut self, rule: Rule) -> Result<()> {
        let _guard = self.span.enter();
        if self.rules.contains_key(&rule.id) {
            return Err(GuardianError::DuplicateRule {
                id: rule.id.to_string(),
            });
        }

        debug!(rule = %rule.id, category = %rule.category, "registered rule");
        self.by_category
            .entry(rule.category)
            .or_default()
            .push(rule.id.clone());
        self.order.push(rule.id.clone());
        self.rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    /// Register rules one after another.
    ///
    /// Stops at the first duplicate. Rules registered before it stay.
    pub fn register_batch(&mut self, rules: impl IntoIterator<Item = Rule>) -> Result<()> {
        for rule in rules {
            self.register(rule)?;
        }
        Ok(())
    }

    /// Get a rule by ID.
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// All rules in registration order.
    pub fn get_all(&self) -> Vec<&Rule> {
        self.order.iter().filter_map(|id| self.rules.get(id)).collect()
    }

    pub fn get_by_category(&self, category: Category) -> Vec<&Rule> {
        self.by_category
            .get(&category)
            .map(|ids| ids.iter().filter_map(|id| self.rules.get(id)).collect())
            .unwrap_or_default()
    }

    /// All rule ids in registration order.
    pub fn get_all_ids(&self) -> Vec<RuleId> {
        self.order.clone()
    }

    /// Categories that have at least one rule.
    pub fn get_all_categories(&self) -> Vec<Category> {
        self.by_category.keys().copied().collect()
    }

    /// Store overrides keyed by rule id.
    ///
    /// A bare boolean is sugar for `{enabled: bool}`. Each entry replaces
    /// whatever override was stored for that id before; overrides for ids
    /// that are not (yet) registered are kept as well.
    pub fn apply_overrides<'a, I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (&'a String, &'a RuleSetting)>,
    {
        let _guard = self.span.enter();
        for (id, setting) in overrides {
            debug!(rule = %id, "applying override");
            self.overrides.insert(RuleId::new(id.as_str()), setting.to_override());
        }
    }

    /// Store a single override, replacing any previous one for the id.
    pub fn set_override(&mut self, id: impl Into<String>, rule_override: RuleOverride) {
        self.overrides.insert(RuleId::new(id), rule_override);
    }

    pub fn get_override(&self, id: &str) -> Option<&RuleOverride> {
        self.overrides.get(id)
    }

    /// The rule as it will execute, or `None` for unknown ids.
    pub fn get_effective_rule(
        &self,
        id: &str,
        default_severity: Option<Severity>,
    ) -> Option<EffectiveRule> {
        let rule = self.rules.get(id)?;
        Some(EffectiveRule::resolve(
            rule,
            self.overrides.get(id),
            default_severity,
        ))
    }

    /// Whether the rule exists and is effectively enabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.get_effective_rule(id, None)
            .is_some_and(|rule| rule.enabled)
    }

    /// Ids of enabled rules in registration order.
    pub fn enabled_ids(&self) -> Vec<RuleId> {
        self.order
            .iter()
            .filter(|id| self.is_enabled(id.as_str()))
            .cloned()
            .collect()
    }

    /// Ids that have an override but no registered rule.
    pub fn unknown_override_ids(&self) -> Vec<RuleId> {
        let mut ids: Vec<_> = self
            .overrides
            .keys()
            .filter(|id| !self.rules.contains_key(id.as_str()))
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }

    /// Remove all rules and overrides.
    pub fn clear(&mut self) {
        self.rules.clear();
        self.order.clear();
        self.by_category.clear();
        self.overrides.clear();
    }

    pub fn stats(&self) -> RegistryStats {
        let enabled = self
            .order
            .iter()
            .filter(|id| self.is_enabled(id.as_str()))
            .count();
        RegistryStats {
            total: self.rules.len(),
            enabled,
            disabled: self.rules.len() - enabled,
            overridden: self.overrides.len(),
            by_category: self
                .by_category
                .iter()
                .map(|(category, ids)| (*category, ids.len()))
                .collect(),
        }
    }

    /// Get the number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
