//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use crate::rules::Category;

/// api-guardian - Configurable rule-based validation for OpenAPI documents.
#[derive(Debug, Parser)]
#[command(name = "api-guardian")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides discovery of .api-guardian.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory to start configuration discovery from (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate an API document
    Validate(ValidateArgs),

    /// List available rules
    Rules(RulesArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Print the JSON Schema of the configuration file
    Schema,
}

/// Arguments for the `validate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ValidateArgs {
    /// OpenAPI / Swagger document to validate (JSON or YAML)
    pub spec: PathBuf,

    /// Ruleset or preset to activate (strict, standard, lenient, or a configured ruleset)
    #[arg(short, long)]
    pub ruleset: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Additional paths to ignore (repeatable)
    #[arg(long = "ignore-path", value_name = "GLOB")]
    pub ignore_paths: Vec<String>,

    /// Do not register the built-in rules
    #[arg(long)]
    pub no_builtins: bool,

    /// Treat warnings as failures
    #[arg(long)]
    pub fail_on_warnings: bool,

    /// Leave the parsed document out of JSON output
    #[arg(long)]
    pub omit_spec: bool,
}

/// Arguments for the `rules` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RulesArgs {
    /// Only list rules in this category
    #[arg(long, value_enum)]
    pub category: Option<Category>,

    /// Show effective settings under this ruleset
    #[arg(short, long)]
    pub ruleset: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Ruleset to activate before printing
    #[arg(short, long)]
    pub ruleset: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
