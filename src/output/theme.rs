//! Terminal styling for human output.

use console::Style;

use crate::rules::Severity;

/// Styles used by the human formatter.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for error-severity issues (red bold).
    pub error: Style,
    /// Style for warning-severity issues (orange).
    pub warning: Style,
    /// Style for info-severity issues (cyan).
    pub info: Style,
    /// Style for hint-severity issues (magenta dim).
    pub hint: Style,
    /// Style for secondary text such as locations and timings (dim).
    pub dim: Style,
    /// Style for rule ids and headers (bold).
    pub highlight: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            error: Style::new().red().bold(),
            warning: Style::new().color256(208),
            info: Style::new().cyan(),
            hint: Style::new().magenta().dim(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
        }
    }

    /// A theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            error: Style::new(),
            warning: Style::new(),
            info: Style::new(),
            hint: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
        }
    }

    pub fn for_color(use_color: bool) -> Self {
        if use_color {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn severity(&self, severity: Severity) -> &Style {
        match severity {
            Severity::Error => &self.error,
            Severity::Warning => &self.warning,
            Severity::Info => &self.info,
            Severity::Hint => &self.hint,
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a failure message (icon + text in red bold).
    pub fn format_failure(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
