//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for settings shared by every command
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigResolver, ResolvedConfig};
use crate::error::Result;

use super::config::ConfigCommand;
use super::rules::RulesCommand;
use super::schema::SchemaCommand;
use super::validate::ValidateCommand;

/// Exit code for a valid document or a successful command.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for an invalid document.
pub const EXIT_INVALID: i32 = 1;
/// Exit code for configuration and usage errors.
pub const EXIT_ERROR: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing its report to `out`.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ctx: &CommandContext, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: EXIT_SUCCESS,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Settings shared by all commands.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory configuration discovery starts from.
    pub project_root: PathBuf,
    /// Explicit configuration file, bypassing discovery.
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
    pub use_color: bool,
}

impl CommandContext {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config_path: None,
            verbose: false,
            use_color: false,
        }
    }

    /// Load the configuration named on the command line or discover one.
    pub fn resolve_config(&self) -> Result<ResolvedConfig> {
        let mut resolver = ConfigResolver::new();
        match &self.config_path {
            Some(path) => resolver.resolve(path),
            None => resolver.discover(&self.project_root),
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(
        &self,
        cli: &Cli,
        use_color: bool,
        out: &mut dyn Write,
    ) -> Result<CommandResult> {
        let ctx = CommandContext {
            project_root: cli
                .project
                .clone()
                .unwrap_or_else(|| self.project_root.clone()),
            config_path: cli.config.clone(),
            verbose: cli.verbose,
            use_color,
        };
        debug!(command = ?cli.command, "Dispatching command");

        match &cli.command {
            Commands::Validate(args) => ValidateCommand::new(args.clone()).execute(&ctx, out),
            Commands::Rules(args) => RulesCommand::new(args.clone()).execute(&ctx, out),
            Commands::Config(args) => ConfigCommand::new(args.clone()).execute(&ctx, out),
            Commands::Schema => SchemaCommand.execute(&ctx, out),
        }
    }
}
