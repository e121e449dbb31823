//! On-disk project fixtures.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::{Module, Project, Sdk};

/// Name of the SDK every fixture project defines.
pub const FIXTURE_SDK: &str = "flex";

/// A temporary project directory with helpers for laying out modules.
///
/// Modules created through [`ProjectFixture::module`] get the content root
/// `<root>/<name>` and the source root `<root>/<name>/src`.
#[derive(Debug)]
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Create an empty fixture directory.
    pub fn new() -> Self {
        ProjectFixture {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Fixture root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `rel` inside the fixture; nothing is created.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write a file, creating parent folders.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, content).expect("failed to write fixture file");
        path
    }

    /// Create a folder.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(&path).expect("failed to create fixture dir");
        path
    }

    /// Write a placeholder source file `file` under the source root `root`.
    pub fn source(&self, root: &str, file: &str) -> PathBuf {
        self.file(&format!("{}/{}", root, file), "package {}\n")
    }

    /// A Flex module with the standard root layout.
    pub fn module(&self, name: &str) -> Module {
        Module::new(name)
            .with_content_root(self.path(name))
            .with_source_root(self.path(&format!("{}/src", name)))
    }

    /// A project holding `modules` and the fixture SDK.
    pub fn project(&self, modules: Vec<Module>) -> Project {
        let mut project = Project::new("fixture", self.root()).with_sdk(Sdk::new(
            FIXTURE_SDK,
            self.path("sdk"),
            "4.16.1",
        ));
        for module in modules {
            project = project.with_module(module);
        }
        project
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
