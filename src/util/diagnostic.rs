//! User-facing diagnostic messages.
//!
//! Validation problems, structural errors and build-log notices all end up
//! rendered through [`Diagnostic`] so the terminal output stays uniform.

use std::fmt;

use serde::Serialize;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no manifest file is found.
    pub const NO_MANIFEST: &str = "help: Create a flexbuild.toml describing the project modules";

    /// Suggestion when a build configuration reference is dangling.
    pub const MISSING_CONFIGURATION: &str =
        "help: Run `flexbuild tree` to see the available build configurations";

    /// Suggestion when validation fails.
    pub const FIX_CONFIGURATION: &str =
        "help: Fix the build configuration settings listed above and rebuild";

    /// Suggestion when a compilation fails.
    pub const BUILD_FAILED: &str = "help: Run `flexbuild build --verbose` for the compiler output";
}

/// Severity level for diagnostics and build-log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Stable code, if the message has one
    pub code: Option<String>,
}

impl Diagnostic {
    fn with_severity(message: impl Into<String>, severity: Severity) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            code: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Warning)
    }

    /// Create a new informational diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Info)
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Attach a stable code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (color, self.severity) {
            (true, Severity::Error) => "\x1b[1;31merror\x1b[0m",
            (true, Severity::Warning) => "\x1b[1;33mwarning\x1b[0m",
            (true, Severity::Info) => "\x1b[1;36minfo\x1b[0m",
            (false, Severity::Error) => "error",
            (false, Severity::Warning) => "warning",
            (false, Severity::Info) => "info",
        };

        match self.code {
            Some(ref code) => output.push_str(&format!("{}[{}]: {}\n", severity_str, code, self.message)),
            None => output.push_str(&format!("{}: {}\n", severity_str, self.message)),
        }

        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            for suggestion in &self.suggestions {
                output.push_str(&format!("{}\n", suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("main class is not set")
            .with_code("main.class.not.set")
            .with_context("build configuration `App` (module `web`)")
            .with_suggestion(suggestions::FIX_CONFIGURATION);

        let output = diag.format(false);
        assert!(output.starts_with("error[main.class.not.set]: main class is not set"));
        assert!(output.contains("-> build configuration `App`"));
        assert!(output.contains("help: Fix the build configuration"));
    }

    #[test]
    fn test_info_without_code() {
        let output = Diagnostic::info("Using mxmlc/compc").format(false);
        assert_eq!(output, "info: Using mxmlc/compc\n");
    }
}
