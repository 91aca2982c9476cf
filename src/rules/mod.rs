//! Rule registration and execution.
//!
//! # Overview
//!
//! - **Rules** - Identity, severity, category and a check ([`Rule`], [`RuleCheck`])
//! - **Registry** - Registered rules plus user overrides ([`RuleRegistry`])
//! - **Engine** - Runs rules and normalizes their output ([`RuleEngine`])
//! - **Issues** - Canonical findings ([`Issue`]) built from raw output ([`RawIssue`])
//!
//! # Example
//!
//! ```
//! use api_guardian::rules::{Category, RawIssue, Rule, RuleEngine, RuleRegistry, Severity};
//! use serde_json::json;
//!
//! let mut registry = RuleRegistry::new();
//! registry
//!     .register(
//!         Rule::from_fn("has-info", Category::Structural, |doc, _| {
//!             if doc.get("info").is_none() {
//!                 Ok(vec![RawIssue::new("missing info")])
//!             } else {
//!                 Ok(vec![])
//!             }
//!         })
//!         .with_severity(Severity::Error),
//!     )
//!     .unwrap();
//!
//! let engine = RuleEngine::new(&registry);
//! let batch = engine.execute_all(&json!({"openapi": "3.0.0"}), None, None);
//! assert_eq!(batch.issues.len(), 1);
//! assert_eq!(batch.issues[0].path, "root");
//! ```

pub mod builtin;
pub mod engine;
pub mod issue;
pub mod overrides;
pub mod registry;
pub mod rule;

pub use engine::{normalize, BatchExecution, ExecutionStats, RuleEngine, RuleExecution};
pub use issue::{json_pointer, Issue, RawIssue, ROOT_PATH};
pub use overrides::{EffectiveRule, RuleOverride, RuleSetting, FALLBACK_SEVERITY};
pub use registry::{RegistryStats, RuleRegistry};
pub use rule::{Category, Rule, RuleCheck, RuleError, RuleId, RuleOptions, Severity};
