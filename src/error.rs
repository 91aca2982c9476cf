//! Error types for api-guardian operations.
//!
//! This module defines [`GuardianError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration problems name the file and field at fault
//! - Registration conflicts are programming errors and surface immediately
//! - Rule failures never appear here; the engine records them as data
//! - Use `anyhow::Error` (via `GuardianError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for api-guardian operations.
#[derive(Debug, Error)]
pub enum GuardianError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A configuration property has the wrong shape.
    #[error("Invalid configuration in {path}: '{field}' must be {expected}, got {found}")]
    InvalidConfigField {
        path: PathBuf,
        field: String,
        expected: String,
        found: String,
    },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// An `extends` entry names a preset that does not exist.
    #[error("Unknown preset '{name}'. Available presets: {available}")]
    UnknownPreset { name: String, available: String },

    /// An `extends` entry uses a namespace that is not recognised.
    #[error("Unknown extends namespace '{namespace}'. Valid namespaces: {available}")]
    UnknownNamespace { namespace: String, available: String },

    /// A configuration extends itself, directly or transitively.
    #[error("Circular extends detected: {chain}")]
    CircularExtends { chain: String },

    /// The API document could not be loaded.
    #[error("Failed to load document {path}: {message}")]
    DocumentLoadError { path: PathBuf, message: String },

    /// A rule with the same id is already registered.
    #[error("Rule '{id}' is already registered")]
    DuplicateRule { id: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GuardianError {
    /// Whether this error stems from configuration loading or resolution.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GuardianError::ConfigNotFound { .. }
                | GuardianError::ConfigParseError { .. }
                | GuardianError::InvalidConfigField { .. }
                | GuardianError::ConfigValidationError { .. }
                | GuardianError::UnknownPreset { .. }
                | GuardianError::UnknownNamespace { .. }
                | GuardianError::CircularExtends { .. }
        )
    }
}

/// Result type alias for api-guardian operations.
pub type Result<T> = std::result::Result<T, GuardianError>;
