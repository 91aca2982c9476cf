//! Command-line interface for api-guardian.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ConfigArgs, RulesArgs, ValidateArgs};
pub use commands::{
    Command, CommandContext, CommandDispatcher, CommandResult, EXIT_ERROR, EXIT_INVALID,
    EXIT_SUCCESS,
};
