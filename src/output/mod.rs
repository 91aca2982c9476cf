//! Result formatters.
//!
//! This module provides formatters for writing a [`ValidationResult`] in
//! different formats (human-readable, JSON).

pub mod human;
pub mod json;
pub mod theme;

use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::validator::ValidationResult;

/// Output format for validation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Trait for formatting validation output.
pub trait ResultFormatter {
    /// Format a result to the given writer.
    fn format<W: Write>(&self, result: &ValidationResult, writer: &mut W) -> std::io::Result<()>;
}

pub use human::HumanFormatter;
pub use json::JsonFormatter;
pub use theme::{should_use_colors, Theme};
