//! Loading of API description documents.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{GuardianError, Result};

/// Source of parsed API documents.
pub trait DocumentLoader {
    /// Load and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `DocumentLoadError` if the document cannot be read, parsed
    /// or is not an API description.
    fn load(&self, path: &Path) -> Result<Value>;
}

/// Loads OpenAPI 3 / Swagger 2 documents from JSON or YAML files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDocumentLoader;

impl FileDocumentLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for FileDocumentLoader {
    fn load(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| load_error(path, e.to_string()))?;
        let document = parse_document(&content, path)?;
        debug!(path = %path.display(), "Loaded document");
        Ok(document)
    }
}

/// Parse document content; `.json` files as JSON, anything else as YAML.
pub fn parse_document(content: &str, path: &Path) -> Result<Value> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let document: Value = if is_json {
        serde_json::from_str(content).map_err(|e| load_error(path, e.to_string()))?
    } else {
        serde_yaml::from_str(content).map_err(|e| load_error(path, e.to_string()))?
    };

    check_document(&document).map_err(|message| load_error(path, message))?;
    Ok(document)
}

/// Minimal structure every API description has.
fn check_document(document: &Value) -> std::result::Result<(), String> {
    let Some(root) = document.as_object() else {
        return Err("document root must be an object".to_string());
    };
    if !root.contains_key("openapi") && !root.contains_key("swagger") {
        return Err("missing 'openapi' or 'swagger' version field".to_string());
    }
    if !root.contains_key("info") {
        return Err("missing 'info' object".to_string());
    }
    Ok(())
}

fn load_error(path: &Path, message: String) -> GuardianError {
    GuardianError::DocumentLoadError {
        path: path.to_path_buf(),
        message,
    }
}
