//! Project modules.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::configuration::BuildConfiguration;

/// Source file extensions a main class can be declared in.
pub const MAIN_CLASS_EXTENSIONS: [&str; 3] = ["as", "mxml", "fxg"];

/// Kind of module. Only Flex modules carry build configurations that compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    #[default]
    Flex,
    #[serde(other)]
    Other,
}

/// A module of the project: roots on disk plus its build configurations.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    module_type: ModuleType,
    content_roots: Vec<PathBuf>,
    source_roots: Vec<PathBuf>,
    configurations: Vec<Arc<BuildConfiguration>>,
}

impl Module {
    /// Create a Flex module with no roots and no configurations.
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            module_type: ModuleType::Flex,
            content_roots: Vec::new(),
            source_roots: Vec::new(),
            configurations: Vec::new(),
        }
    }

    pub fn with_type(mut self, module_type: ModuleType) -> Self {
        self.module_type = module_type;
        self
    }

    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_roots.push(root.into());
        self
    }

    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_roots.push(root.into());
        self
    }

    pub fn with_configuration(mut self, configuration: BuildConfiguration) -> Self {
        self.configurations.push(Arc::new(configuration));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module_type(&self) -> ModuleType {
        self.module_type
    }

    pub fn content_roots(&self) -> &[PathBuf] {
        &self.content_roots
    }

    pub fn source_roots(&self) -> &[PathBuf] {
        &self.source_roots
    }

    /// Configurations in declaration order.
    pub fn configurations(&self) -> &[Arc<BuildConfiguration>] {
        &self.configurations
    }

    /// Look up a configuration by name.
    pub fn configuration(&self, name: &str) -> Option<&Arc<BuildConfiguration>> {
        self.configurations.iter().find(|bc| bc.name == name)
    }

    /// Resolve a main class to an existing source file.
    ///
    /// `a.b.Main` is looked up as `a/b/Main.{as,mxml,fxg}` under every source
    /// root. A main class that is already a path to an existing file (runtime
    /// stylesheets use the stylesheet path) resolves to that file.
    pub fn main_class_file(&self, main_class: &str) -> Option<PathBuf> {
        if main_class.is_empty() {
            return None;
        }

        let as_path = Path::new(main_class);
        if as_path.is_absolute() && as_path.is_file() {
            return Some(as_path.to_path_buf());
        }

        let relative = main_class.replace('.', "/");
        for root in &self.source_roots {
            for ext in MAIN_CLASS_EXTENSIONS {
                let candidate = root.join(format!("{}.{}", relative, ext));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Whether a main class resolves to a source file in this module.
    pub fn has_main_class(&self, main_class: &str) -> bool {
        self.main_class_file(main_class).is_some()
    }
}
