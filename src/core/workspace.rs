//! Workspace - central configuration hub.
//!
//! A Workspace is a loaded project together with the merged tool
//! configuration that applies to it.

use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::core::manifest::Manifest;
use crate::core::project::Project;
use crate::util::{Config, GlobalContext};

/// Primary manifest file name.
pub const MANIFEST_NAME: &str = "flexbuild.toml";

/// Errors locating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `{}` in `{}` or any parent directory", MANIFEST_NAME, dir.display())]
    NotFound { dir: PathBuf },
}

/// Find the manifest in `dir` itself, without searching parents.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    path.is_file().then_some(path)
}

/// A loaded project and its configuration.
#[derive(Debug)]
pub struct Workspace {
    project: Project,
    manifest_path: PathBuf,
    config: Config,
}

impl Workspace {
    /// Load the workspace from a manifest path.
    pub fn new(manifest_path: &Path, ctx: &GlobalContext) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let config = ctx.load_config(&manifest.manifest_dir);
        tracing::debug!(
            "loaded project `{}` with {} module(s)",
            manifest.name,
            manifest.modules.len()
        );

        Ok(Workspace {
            project: manifest.into_project(),
            manifest_path: manifest_path.to_path_buf(),
            config,
        })
    }

    /// Get the project module graph.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        self.project.root()
    }

    /// Get the manifest path.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Get the merged tool configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the merged tool configuration for modification (CLI overrides).
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_workspace(dir: &Path) -> PathBuf {
        let manifest_path = dir.join(MANIFEST_NAME);
        std::fs::write(
            &manifest_path,
            r#"
[project]
name = "testws"

[[modules]]
name = "app"
source_roots = ["src"]

[[modules.configurations]]
name = "Web"
main_class = "Main"
output_file_name = "app.swf"
output_folder = "out"
"#,
        )
        .unwrap();
        manifest_path
    }

    #[test]
    fn test_workspace_creation() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = create_test_workspace(tmp.path());
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_global_config(None);

        let ws = Workspace::new(&manifest_path, &ctx).unwrap();
        assert_eq!(ws.project().name(), "testws");
        assert_eq!(ws.root(), tmp.path());
        assert_eq!(ws.config().max_parallel_compilations(), 4);
    }

    #[test]
    fn test_workspace_reads_project_config() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = create_test_workspace(tmp.path());
        std::fs::create_dir_all(tmp.path().join(".flexbuild")).unwrap();
        std::fs::write(
            tmp.path().join(".flexbuild").join("config.toml"),
            "[validation]\ncheck_dependency_types = true\n",
        )
        .unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_global_config(None);

        let ws = Workspace::new(&manifest_path, &ctx).unwrap();
        assert!(ws.config().validation_policy().check_dependency_types);
    }

    #[test]
    fn test_find_manifest_only_in_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(find_manifest(tmp.path()).is_none());
        create_test_workspace(tmp.path());
        assert_eq!(find_manifest(tmp.path()), Some(tmp.path().join(MANIFEST_NAME)));
    }
}
