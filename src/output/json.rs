//! JSON output formatter.
//!
//! Writes the full validation result as machine-readable JSON for tooling
//! integration.

use std::io::Write;

use super::ResultFormatter;
use crate::validator::ValidationResult;

/// Formats validation output as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    /// Leave out the parsed document.
    pub omit_spec: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_spec(mut self) -> Self {
        self.omit_spec = true;
        self
    }
}

impl ResultFormatter for JsonFormatter {
    fn format<W: Write>(&self, result: &ValidationResult, writer: &mut W) -> std::io::Result<()> {
        let mut value = serde_json::to_value(result)?;
        if self.omit_spec {
            if let Some(object) = value.as_object_mut() {
                object.remove("spec");
            }
        }
        serde_json::to_writer_pretty(&mut *writer, &value)?;
        writeln!(writer)
    }
}
