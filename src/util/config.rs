//! Configuration file support for flexbuild.
//!
//! flexbuild reads two configuration file locations:
//! - Global: `~/.flexbuild/config.toml` - User-wide defaults
//! - Project: `.flexbuild/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::packaging::{AndroidPackageType, IosPackageType, PackagingParameters};
use crate::validate::ValidationPolicy;

/// Parallel compilations used when nothing is configured.
pub const DEFAULT_MAX_PARALLEL_COMPILATIONS: usize = 4;

/// flexbuild configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compiler selection and parallelism
    pub compiler: CompilerConfig,

    /// Packaging parameters chosen for the next package/run
    pub packaging: PackagingConfig,

    /// Validation policy switches
    pub validation: ValidationConfig,
}

/// Compiler-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Maximum number of compilations running at once
    pub max_parallel_compilations: Option<usize>,

    /// Prefer the built-in compiler shell when every task shares one SDK
    pub use_built_in_compiler: bool,

    /// Use the fcsh tool (not supported, reported and skipped)
    pub use_fcsh: bool,
}

/// Packaging parameters that drive the forced debug flag of mobile apps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingConfig {
    /// Android package type (release, debug, debug-over-network)
    pub android_package_type: Option<AndroidPackageType>,

    /// iOS package type (test, debug-over-network, ad-hoc, app-store)
    pub ios_package_type: Option<IosPackageType>,
}

/// Validation-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Check dependency linkage legality (off by default)
    pub check_dependency_types: bool,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.compiler.max_parallel_compilations.is_some() {
            self.compiler.max_parallel_compilations = other.compiler.max_parallel_compilations;
        }
        if other.compiler.use_built_in_compiler {
            self.compiler.use_built_in_compiler = true;
        }
        if other.compiler.use_fcsh {
            self.compiler.use_fcsh = true;
        }

        if other.packaging.android_package_type.is_some() {
            self.packaging.android_package_type = other.packaging.android_package_type;
        }
        if other.packaging.ios_package_type.is_some() {
            self.packaging.ios_package_type = other.packaging.ios_package_type;
        }

        if other.validation.check_dependency_types {
            self.validation.check_dependency_types = true;
        }
    }

    /// Effective parallelism limit (never zero).
    pub fn max_parallel_compilations(&self) -> usize {
        self.compiler
            .max_parallel_compilations
            .unwrap_or(DEFAULT_MAX_PARALLEL_COMPILATIONS)
            .max(1)
    }

    /// Packaging parameters with defaults filled in.
    pub fn packaging_parameters(&self) -> PackagingParameters {
        PackagingParameters {
            android_package_type: self.packaging.android_package_type.unwrap_or_default(),
            ios_package_type: self.packaging.ios_package_type.unwrap_or_default(),
        }
    }

    /// Validation policy derived from the `[validation]` section.
    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            check_dependency_types: self.validation.check_dependency_types,
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.flexbuild/config.toml)
/// 2. Global config (~/.flexbuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global flexbuild config directory (~/.flexbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".flexbuild"))
}

/// Get the global config path (~/.flexbuild/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.flexbuild/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".flexbuild").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_parallel_compilations(), DEFAULT_MAX_PARALLEL_COMPILATIONS);
        assert!(!config.compiler.use_fcsh);
        assert!(!config.validation_policy().check_dependency_types);
        let params = config.packaging_parameters();
        assert_eq!(params.android_package_type, AndroidPackageType::Release);
        assert_eq!(params.ios_package_type, IosPackageType::Test);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[compiler]
max_parallel_compilations = 2
use_built_in_compiler = true

[packaging]
android_package_type = "debug"
ios_package_type = "debug-over-network"

[validation]
check_dependency_types = true
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.max_parallel_compilations(), 2);
        assert!(config.compiler.use_built_in_compiler);
        assert_eq!(config.packaging.android_package_type, Some(AndroidPackageType::Debug));
        assert_eq!(config.packaging.ios_package_type, Some(IosPackageType::DebugOverNetwork));
        assert!(config.validation_policy().check_dependency_types);
    }

    #[test]
    fn test_zero_parallelism_is_clamped() {
        let mut config = Config::default();
        config.compiler.max_parallel_compilations = Some(0);
        assert_eq!(config.max_parallel_compilations(), 1);
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[compiler]
max_parallel_compilations = 8

[packaging]
android_package_type = "debug"
"#,
        )
        .unwrap();
        std::fs::write(
            &project_path,
            r#"
[packaging]
android_package_type = "release"
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);
        assert_eq!(config.max_parallel_compilations(), 8);
        assert_eq!(config.packaging.android_package_type, Some(AndroidPackageType::Release));
    }

    #[test]
    fn test_broken_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[compiler\nmax_parallel_compilations = ").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.compiler.max_parallel_compilations.is_none());
    }
}
