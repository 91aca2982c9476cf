//! Config command implementation.
//!
//! The `api-guardian config` command prints the fully resolved
//! configuration, `extends` chains flattened.

use std::io::Write;

use crate::cli::args::ConfigArgs;
use crate::config::{apply_overrides, CliOverrides};
use crate::error::Result;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(args: ConfigArgs) -> Self {
        Self { args }
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ctx: &CommandContext, out: &mut dyn Write) -> Result<CommandResult> {
        let overrides = CliOverrides {
            ruleset: self.args.ruleset.clone(),
            verbose: ctx.verbose.then_some(true),
            ..Default::default()
        };
        let resolved = apply_overrides(ctx.resolve_config()?, &overrides)?;
        // Fails early on a ruleset that cannot be flattened.
        resolved.effective_settings()?;

        if self.args.json {
            serde_json::to_writer_pretty(&mut *out, &resolved).map_err(anyhow::Error::from)?;
            writeln!(out)?;
        } else {
            let yaml = serde_yaml::to_string(&resolved).map_err(anyhow::Error::from)?;
            write!(out, "{}", yaml)?;
        }

        Ok(CommandResult::success())
    }
}
