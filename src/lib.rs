//! api-guardian - Configurable rule-based validation for OpenAPI documents.
//!
//! api-guardian runs a registry of rules over a parsed OpenAPI 3 or
//! Swagger 2 document and reports canonical issues. Which rules run, and
//! at what severity, is controlled by layered YAML/JSON configuration with
//! presets, named rulesets and command-line overrides.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, validation, `extends` resolution
//! - [`document`] - Loading of API documents
//! - [`error`] - Error types and result aliases
//! - [`output`] - Human and JSON result formatters
//! - [`rules`] - Rule model, registry, execution engine and built-in rules
//! - [`validator`] - Orchestration of a validation run
//!
//! # Example
//!
//! ```
//! use api_guardian::config::ResolvedConfig;
//! use api_guardian::rules::Severity;
//! use api_guardian::Validator;
//! use serde_json::json;
//!
//! let validator = Validator::new(ResolvedConfig::defaults()).unwrap();
//! let result = validator.validate_document(json!({
//!     "openapi": "3.0.3",
//!     "info": {"title": "Pets", "version": "1.0.0"},
//!     "servers": [{"url": "http://api.example.com"}],
//!     "paths": {"/pets": {"get": {"responses": {"200": {"description": "ok"}}}}}
//! }));
//!
//! assert!(!result.valid);
//! assert!(result
//!     .issues
//!     .iter()
//!     .any(|issue| issue.rule_id == "servers-https" && issue.severity == Severity::Error));
//! ```
//!
//! For file-based config loading, see the integration tests.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod rules;
pub mod validator;

pub use error::{GuardianError, Result};
pub use validator::{ValidationResult, Validator, ValidatorBuilder};
