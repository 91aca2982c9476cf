//! Human-readable output formatter.
//!
//! Formats validation results for terminal display with optional color
//! support.

use std::io::Write;

use super::theme::Theme;
use super::ResultFormatter;
use crate::rules::{Issue, Severity};
use crate::validator::ValidationResult;

/// Formats validation output for human consumption.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    theme: Theme,
    /// Whether info and hint issues are printed.
    pub show_info: bool,
    /// Whether per-rule timings are printed.
    pub verbose: bool,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool) -> Self {
        Self {
            theme: Theme::for_color(use_color),
            show_info: true,
            verbose: false,
        }
    }

    pub fn with_show_info(mut self, show_info: bool) -> Self {
        self.show_info = show_info;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn is_shown(&self, issue: &Issue) -> bool {
        self.show_info || matches!(issue.severity, Severity::Error | Severity::Warning)
    }

    fn write_issue<W: Write>(&self, issue: &Issue, source: &str, writer: &mut W) -> std::io::Result<()> {
        // Header line: error[rule-id]: message
        writeln!(
            writer,
            "{}[{}]: {}",
            self.theme
                .severity(issue.severity)
                .apply_to(issue.severity.as_str()),
            self.theme.highlight.apply_to(&issue.rule_id),
            issue.message
        )?;

        let location = match (issue.line, issue.column) {
            (Some(line), Some(column)) => format!("{}:{}:{} ({})", source, line, column, issue.path),
            (Some(line), None) => format!("{}:{} ({})", source, line, issue.path),
            _ => format!("{}#{}", source, issue.path),
        };
        writeln!(writer, "  {} {}", self.theme.dim.apply_to("-->"), location)?;

        if let Some(ref suggestion) = issue.suggestion {
            writeln!(writer, "   = help: {}", suggestion)?;
        }

        writeln!(writer)
    }
}

impl ResultFormatter for HumanFormatter {
    fn format<W: Write>(&self, result: &ValidationResult, writer: &mut W) -> std::io::Result<()> {
        let source = result
            .metadata
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<document>".to_string());

        if let Some(ref error) = result.metadata.error {
            writeln!(writer, "{}", self.theme.format_failure(error))?;
            return Ok(());
        }

        for issue in result.issues.iter().filter(|i| self.is_shown(i)) {
            self.write_issue(issue, &source, writer)?;
        }

        for warning in &result.metadata.warnings {
            writeln!(
                writer,
                "{}: {}",
                self.theme.warning.apply_to("note"),
                warning
            )?;
        }

        if self.verbose {
            for stats in &result.stats.rules {
                let status = match (&stats.error, stats.executed) {
                    (Some(error), _) => format!("failed: {}", error),
                    (None, true) => format!("{} issue(s)", stats.issues_found),
                    (None, false) => "skipped".to_string(),
                };
                writeln!(
                    writer,
                    "  {} {} {}",
                    self.theme.highlight.apply_to(&stats.rule_id),
                    self.theme
                        .dim
                        .apply_to(format!("{:.2}ms", stats.execution_time.as_secs_f64() * 1000.0)),
                    status
                )?;
            }
        }

        // Summary
        let errors = result.error_count();
        let warnings = result.warning_count();
        let infos = result.count(Severity::Info) + result.count(Severity::Hint);

        let mut summary = format!("Found {} error(s) and {} warning(s)", errors, warnings);
        if infos > 0 {
            if self.show_info {
                summary.push_str(&format!(", {} info/hint", infos));
            } else {
                summary.push_str(&format!(" ({} info/hint hidden)", infos));
            }
        }
        summary.push_str(&format!(
            " in {} ({} rules, {:.1}ms)",
            source,
            result.stats.rules_executed,
            result.stats.total_time.as_secs_f64() * 1000.0
        ));

        if result.valid {
            writeln!(writer, "{}", self.theme.format_success(&summary))
        } else {
            writeln!(writer, "{}", self.theme.format_failure(&summary))
        }
    }
}
