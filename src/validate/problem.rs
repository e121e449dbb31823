//! Validation problems.
//!
//! A [`Problem`] is a report, never an error value: validators emit as many as
//! they find and the caller decides what to do with them.

use std::fmt;

use serde::Serialize;

use crate::core::packaging::PackagingPlatform;
use crate::core::ConfigurationId;
use crate::util::diagnostic::{Diagnostic, Severity};

/// Field of the general settings a problem points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneralField {
    MainClass,
    OutputFileName,
    OutputFolder,
    HtmlTemplatePath,
    Rlms,
    RuntimeStyleSheets,
}

/// Field of the dependencies settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependenciesField {
    Sdk,
    Dependencies,
}

/// Field of the compiler options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerOptionsField {
    AdditionalConfigFile,
    FilesToIncludeInSwc,
}

/// Field of a packaging options set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackagingField {
    CustomDescriptor,
    PackageFileName,
    FilesToPackage,
    ProvisioningProfile,
    Keystore,
}

/// Where a problem can be fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "section", content = "field", rename_all = "kebab-case")]
pub enum ProblemLocation {
    General(GeneralField),
    Dependencies(DependenciesField),
    CompilerOptions(CompilerOptionsField),
    Packaging(PackagingPlatform, PackagingField),
}

/// A validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    /// Human-readable message
    pub message: String,

    /// Stable identifier, e.g. `main.class.not.set`
    pub code: &'static str,

    /// Settings tab owning the offending field
    pub tab: String,

    pub location: ProblemLocation,

    pub severity: Severity,
}

impl Problem {
    fn new(message: impl Into<String>, code: &'static str, tab: impl Into<String>, location: ProblemLocation) -> Self {
        Problem {
            message: message.into(),
            code,
            tab: tab.into(),
            location,
            severity: Severity::Error,
        }
    }

    /// Problem in the general settings; the tab is named after the configuration.
    pub fn general(bc_name: &str, message: impl Into<String>, code: &'static str, field: GeneralField) -> Self {
        Self::new(message, code, bc_name, ProblemLocation::General(field))
    }

    pub fn dependencies(message: impl Into<String>, code: &'static str, field: DependenciesField) -> Self {
        Self::new(message, code, "Dependencies", ProblemLocation::Dependencies(field))
    }

    pub fn compiler_options(message: impl Into<String>, code: &'static str, field: CompilerOptionsField) -> Self {
        Self::new(message, code, "Compiler Options", ProblemLocation::CompilerOptions(field))
    }

    pub fn packaging(
        platform: PackagingPlatform,
        message: impl Into<String>,
        code: &'static str,
        field: PackagingField,
    ) -> Self {
        Self::new(message, code, platform.tab_name(), ProblemLocation::Packaging(platform, field))
    }

    /// Downgrade to a warning; warnings do not block a build.
    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A problem attributed to the configuration it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationProblem {
    pub id: ConfigurationId,
    pub problem: Problem,
}

impl ConfigurationProblem {
    pub fn new(id: ConfigurationId, problem: Problem) -> Self {
        ConfigurationProblem { id, problem }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = match self.problem.severity {
            Severity::Error => Diagnostic::error(&self.problem.message),
            Severity::Warning => Diagnostic::warning(&self.problem.message),
            Severity::Info => Diagnostic::info(&self.problem.message),
        };
        diag.with_code(self.problem.code)
            .with_context(format!("in build configuration {}", self.id))
            .with_context(format!("settings: {}", self.problem.tab))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_names() {
        let general = Problem::general("Web", "Main class is not set", "main.class.not.set", GeneralField::MainClass);
        assert_eq!(general.tab, "Web");
        assert!(general.is_error());

        let packaging = Problem::packaging(
            PackagingPlatform::Desktop,
            "Package file name is not set",
            "package.file.name.not.set",
            PackagingField::PackageFileName,
        );
        assert_eq!(packaging.tab, "AIR Package");

        let sdk = Problem::dependencies("unknown", "sdk.version.unknown", DependenciesField::Sdk).as_warning();
        assert!(!sdk.is_error());
    }

    #[test]
    fn test_location_serializes_tagged() {
        let problem = Problem::packaging(
            PackagingPlatform::Ios,
            "Keystore is not set",
            "keystore.not.set",
            PackagingField::Keystore,
        );
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["location"]["section"], "packaging");
        assert_eq!(json["location"]["field"][0], "ios");
        assert_eq!(json["code"], "keystore.not.set");
        assert_eq!(json["severity"], "error");
    }

    #[test]
    fn test_configuration_problem_diagnostic() {
        let problem = ConfigurationProblem::new(
            ConfigurationId::new("app", "Web"),
            Problem::general("Web", "Main class is not set", "main.class.not.set", GeneralField::MainClass),
        );
        let diag = problem.to_diagnostic();
        assert_eq!(diag.code.as_deref(), Some("main.class.not.set"));
        assert_eq!(diag.context[0], "in build configuration `Web` (module `app`)");
    }
}
