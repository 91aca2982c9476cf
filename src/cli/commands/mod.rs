//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`api-guardian validate`, `api-guardian rules`)
//! - Shared configuration resolution through [`CommandContext`]
//! - Consistent global flag handling

pub mod config;
pub mod dispatcher;
pub mod rules;
pub mod schema;
pub mod validate;

pub use dispatcher::{
    Command, CommandContext, CommandDispatcher, CommandResult, EXIT_ERROR, EXIT_INVALID,
    EXIT_SUCCESS,
};
