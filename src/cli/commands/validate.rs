//! Validate command implementation.
//!
//! The `api-guardian validate` command checks one API document against the
//! resolved rule set.

use std::io::Write;

use tracing::debug;

use crate::cli::args::ValidateArgs;
use crate::config::{apply_overrides, CliOverrides};
use crate::error::Result;
use crate::output::{HumanFormatter, JsonFormatter, OutputFormat, ResultFormatter};
use crate::validator::Validator;

use super::dispatcher::{Command, CommandContext, CommandResult, EXIT_INVALID};

/// The validate command implementation.
pub struct ValidateCommand {
    args: ValidateArgs,
}

impl ValidateCommand {
    /// Create a new validate command.
    pub fn new(args: ValidateArgs) -> Self {
        Self { args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ValidateArgs {
        &self.args
    }

    fn overrides(&self, ctx: &CommandContext) -> CliOverrides {
        CliOverrides {
            ruleset: self.args.ruleset.clone(),
            ignore_paths: self.args.ignore_paths.clone(),
            format: self.args.format,
            verbose: ctx.verbose.then_some(true),
            ..Default::default()
        }
    }
}

impl Command for ValidateCommand {
    fn execute(&self, ctx: &CommandContext, out: &mut dyn Write) -> Result<CommandResult> {
        let mut resolved = apply_overrides(ctx.resolve_config()?, &self.overrides(ctx))?;
        if self.args.fail_on_warnings {
            resolved.config.fail_on_warnings = Some(true);
        }

        let mut builder = Validator::builder();
        if self.args.no_builtins {
            builder = builder.without_builtins();
        }
        let validator = builder.build(resolved)?;
        let config = validator.config();

        debug!(spec = %self.args.spec.display(), "Validating document");
        let result = validator.validate(&self.args.spec);

        let mut out = out;
        match config.format.unwrap_or_default() {
            OutputFormat::Human => HumanFormatter::new(ctx.use_color)
                .with_show_info(config.config.show_info())
                .with_verbose(config.verbose)
                .format(&result, &mut out)?,
            OutputFormat::Json => {
                let mut formatter = JsonFormatter::new();
                if self.args.omit_spec {
                    formatter = formatter.without_spec();
                }
                formatter.format(&result, &mut out)?
            }
        }

        if result.is_failure(config.config.fail_on_warnings()) {
            Ok(CommandResult::failure(EXIT_INVALID))
        } else {
            Ok(CommandResult::success())
        }
    }
}
