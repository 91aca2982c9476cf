//! Schema command implementation.
//!
//! The `api-guardian schema` command prints the JSON Schema of the
//! configuration file, for editor integration.

use std::io::Write;

use crate::config::config_json_schema;
use crate::error::Result;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The schema command implementation.
pub struct SchemaCommand;

impl Command for SchemaCommand {
    fn execute(&self, _ctx: &CommandContext, out: &mut dyn Write) -> Result<CommandResult> {
        serde_json::to_writer_pretty(&mut *out, &config_json_schema())
            .map_err(anyhow::Error::from)?;
        writeln!(out)?;
        Ok(CommandResult::success())
    }
}
