//! The project module graph.
//!
//! `Project` is the read-only query interface the resolver, validator and
//! expander work against: modules, their roots and configurations, and the
//! SDKs configurations compile with.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::configuration::BuildConfiguration;
use crate::core::module::Module;
use crate::util::fs::is_ancestor;

/// A Flex/AIR SDK installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sdk {
    /// Name configurations refer to the SDK by
    #[serde(skip)]
    pub name: String,

    /// SDK home directory (holds `bin/mxmlc`, `bin/compc`)
    pub home: PathBuf,

    /// Version string, e.g. `4.16.1`
    #[serde(default)]
    pub version: String,
}

impl Sdk {
    pub fn new(name: impl Into<String>, home: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Sdk {
            name: name.into(),
            home: home.into(),
            version: version.into(),
        }
    }

    /// Major version, when the version string starts with a number.
    pub fn major_version(&self) -> Option<u32> {
        self.version.split('.').next()?.trim().parse().ok()
    }
}

/// A multi-module project.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    root: PathBuf,
    modules: Vec<Arc<Module>>,
    sdks: BTreeMap<String, Sdk>,
}

impl Project {
    /// Create an empty project rooted at `root`.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Project {
            name: name.into(),
            root: root.into(),
            modules: Vec::new(),
            sdks: BTreeMap::new(),
        }
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    pub fn with_sdk(mut self, sdk: Sdk) -> Self {
        self.sdks.insert(sdk.name.clone(), sdk);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Modules in declaration order.
    pub fn modules(&self) -> &[Arc<Module>] {
        &self.modules
    }

    /// Look up a module by name.
    pub fn module(&self, name: &str) -> Option<&Arc<Module>> {
        self.modules.iter().find(|m| m.name() == name)
    }

    /// Resolve a (module, configuration) name pair.
    pub fn find_configuration(
        &self,
        module: &str,
        configuration: &str,
    ) -> Option<(&Arc<Module>, &Arc<BuildConfiguration>)> {
        let module = self.module(module)?;
        let bc = module.configuration(configuration)?;
        Some((module, bc))
    }

    /// Look up an SDK by name.
    pub fn sdk(&self, name: &str) -> Option<&Sdk> {
        self.sdks.get(name)
    }

    pub fn sdks(&self) -> impl Iterator<Item = &Sdk> {
        self.sdks.values()
    }

    /// Innermost source root of any module that contains `file`.
    pub fn source_root_for_file(&self, file: &Path) -> Option<&PathBuf> {
        innermost_root(self.modules.iter().flat_map(|m| m.source_roots()), file)
    }

    /// Innermost content root of any module that contains `file`.
    pub fn content_root_for_file(&self, file: &Path) -> Option<&PathBuf> {
        innermost_root(self.modules.iter().flat_map(|m| m.content_roots()), file)
    }
}

fn innermost_root<'a>(roots: impl Iterator<Item = &'a PathBuf>, file: &Path) -> Option<&'a PathBuf> {
    roots
        .filter(|root| is_ancestor(root, file, false))
        .max_by_key(|root| root.components().count())
}
