//! Structural resolution errors and diagnostics.
//!
//! These abort a whole build request. Problems with individual settings are
//! reported as [`Problem`](crate::validate::Problem)s instead.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::ConfigurationId;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// A build request that cannot be satisfied.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigurationError {
    #[error(
        "build configuration `{configuration}` of module `{module}` required by {dependent} does not exist"
    )]
    #[diagnostic(code(flexbuild::resolve::missing_dependency))]
    MissingDependency {
        module: String,
        configuration: String,
        dependent: ConfigurationId,
    },

    #[error("run target `{module}:{configuration}`: {reason}")]
    #[diagnostic(code(flexbuild::resolve::run_target))]
    RunTarget {
        module: String,
        configuration: String,
        reason: String,
    },

    #[error("module `{module}` does not exist")]
    #[diagnostic(code(flexbuild::resolve::unknown_module))]
    UnknownModule { module: String },
}

impl ConfigurationError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());
        if let Some(code) = self.code() {
            diag = diag.with_code(code.to_string());
        }

        match self {
            ConfigurationError::MissingDependency { dependent, .. } => diag
                .with_context(format!("declared in the dependencies of {}", dependent))
                .with_suggestion(suggestions::MISSING_CONFIGURATION),
            ConfigurationError::RunTarget { .. } | ConfigurationError::UnknownModule { .. } => {
                diag.with_suggestion(suggestions::MISSING_CONFIGURATION)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_diagnostic() {
        let err = ConfigurationError::MissingDependency {
            module: "core".into(),
            configuration: "Lib".into(),
            dependent: ConfigurationId::new("app", "Web"),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.code.as_deref(), Some("flexbuild::resolve::missing_dependency"));
        assert!(diag.message.contains("`Lib` of module `core`"));
        assert!(diag.context[0].contains("`Web` (module `app`)"));
        assert_eq!(diag.suggestions, vec![suggestions::MISSING_CONFIGURATION.to_string()]);
    }

    #[test]
    fn test_run_target_message() {
        let err = ConfigurationError::RunTarget {
            module: "app".into(),
            configuration: "Mobile".into(),
            reason: "build configuration not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "run target `app:Mobile`: build configuration not found"
        );
    }
}
