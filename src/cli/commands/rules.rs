//! Rules command implementation.
//!
//! The `api-guardian rules` command lists registered rules with the
//! settings they would run with under the resolved configuration.

use std::io::Write;

use serde::Serialize;

use crate::cli::args::RulesArgs;
use crate::config::{apply_overrides, CliOverrides};
use crate::error::Result;
use crate::output::Theme;
use crate::rules::{Category, RuleId, Severity};
use crate::validator::Validator;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// One row of the rule listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleRow {
    id: RuleId,
    name: String,
    description: String,
    category: Category,
    severity: Severity,
    enabled: bool,
}

/// The rules command implementation.
pub struct RulesCommand {
    args: RulesArgs,
}

impl RulesCommand {
    /// Create a new rules command.
    pub fn new(args: RulesArgs) -> Self {
        Self { args }
    }

    fn rows(&self, validator: &Validator) -> Vec<RuleRow> {
        let registry = validator.registry();
        let rules = match self.args.category {
            Some(category) => registry.get_by_category(category),
            None => registry.get_all(),
        };

        rules
            .into_iter()
            .filter_map(|rule| {
                registry.get_effective_rule(rule.id.as_str(), validator.default_severity())
            })
            .map(|rule| RuleRow {
                id: rule.id,
                name: rule.name,
                description: rule.description,
                category: rule.category,
                severity: rule.severity,
                enabled: rule.enabled,
            })
            .collect()
    }
}

impl Command for RulesCommand {
    fn execute(&self, ctx: &CommandContext, out: &mut dyn Write) -> Result<CommandResult> {
        let overrides = CliOverrides {
            ruleset: self.args.ruleset.clone(),
            ..Default::default()
        };
        let resolved = apply_overrides(ctx.resolve_config()?, &overrides)?;
        let validator = Validator::new(resolved)?;
        let rows = self.rows(&validator);

        if self.args.json {
            serde_json::to_writer_pretty(&mut *out, &rows).map_err(anyhow::Error::from)?;
            writeln!(out)?;
            return Ok(CommandResult::success());
        }

        let theme = Theme::for_color(ctx.use_color);
        for row in &rows {
            let state = if row.enabled { "" } else { " (disabled)" };
            writeln!(
                out,
                "{:<28} {:<8} {:<14} {}{}",
                theme.highlight.apply_to(row.id.as_str()),
                theme.severity(row.severity).apply_to(row.severity.as_str()),
                row.category.as_str(),
                row.description,
                theme.dim.apply_to(state)
            )?;
        }
        writeln!(out)?;
        writeln!(out, "{} rule(s)", rows.len())?;

        Ok(CommandResult::success())
    }
}
