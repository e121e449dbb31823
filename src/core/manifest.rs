//! flexbuild.toml manifest parsing.
//!
//! The manifest describes the project module graph: SDKs, modules with their
//! roots, and each module's build configurations.
//!
//! ```toml
//! [project]
//! name = "shop"
//!
//! [sdks.flex]
//! home = "/opt/flex_sdk_4.16"
//! version = "4.16.1"
//!
//! [[modules]]
//! name = "app"
//! content_roots = ["app"]
//! source_roots = ["app/src"]
//!
//! [[modules.configurations]]
//! name = "Web"
//! output_type = "application"
//! main_class = "com.shop.Main"
//! output_file_name = "shop.swf"
//! output_folder = "out/web"
//! sdk = "flex"
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::configuration::BuildConfiguration;
use crate::core::module::{Module, ModuleType};
use crate::core::project::{Project, Sdk};
use crate::util::fs::resolve_against;

/// Parsed manifest with every relative path resolved against its directory.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Project name
    pub name: String,

    /// SDKs by name
    pub sdks: BTreeMap<String, Sdk>,

    /// Modules in declaration order
    pub modules: Vec<ModuleManifest>,

    /// Directory containing the manifest
    pub manifest_dir: PathBuf,
}

/// A `[[modules]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleManifest {
    pub name: String,

    #[serde(rename = "type", default)]
    pub module_type: ModuleType,

    #[serde(default)]
    pub content_roots: Vec<PathBuf>,

    #[serde(default)]
    pub source_roots: Vec<PathBuf>,

    #[serde(default)]
    pub configurations: Vec<BuildConfiguration>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    project: RawProject,

    #[serde(default)]
    sdks: BTreeMap<String, Sdk>,

    #[serde(default)]
    modules: Vec<ModuleManifest>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    name: String,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content. `path` locates the manifest for relative paths.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let mut module_names = HashSet::new();
        for module in &raw.modules {
            if !module_names.insert(module.name.as_str()) {
                bail!("duplicate module `{}` in {}", module.name, path.display());
            }
            let mut bc_names = HashSet::new();
            for bc in &module.configurations {
                if bc.name.is_empty() {
                    bail!("module `{}` has a build configuration without a name", module.name);
                }
                if !bc_names.insert(bc.name.as_str()) {
                    bail!(
                        "duplicate build configuration `{}` in module `{}`",
                        bc.name,
                        module.name
                    );
                }
            }
        }

        let sdks = raw
            .sdks
            .into_iter()
            .map(|(name, mut sdk)| {
                sdk.name = name.clone();
                sdk.home = resolve_against(&manifest_dir, &sdk.home);
                (name, sdk)
            })
            .collect();

        let modules = raw
            .modules
            .into_iter()
            .map(|mut module| {
                for root in module.content_roots.iter_mut().chain(module.source_roots.iter_mut()) {
                    *root = resolve_against(&manifest_dir, root);
                }
                for bc in &mut module.configurations {
                    bc.resolve_paths(&manifest_dir);
                }
                module
            })
            .collect();

        Ok(Manifest {
            name: raw.project.name,
            sdks,
            modules,
            manifest_dir,
        })
    }

    /// Build the project module graph.
    pub fn into_project(self) -> Project {
        let mut project = Project::new(self.name, self.manifest_dir);
        for sdk in self.sdks.into_values() {
            project = project.with_sdk(sdk);
        }
        for raw in self.modules {
            let mut module = Module::new(raw.name).with_type(raw.module_type);
            for root in raw.content_roots {
                module = module.with_content_root(root);
            }
            for root in raw.source_roots {
                module = module.with_source_root(root);
            }
            for bc in raw.configurations {
                module = module.with_configuration(bc);
            }
            project = project.with_module(module);
        }
        project
    }
}

/// Generate a starter manifest for a single-module web application.
pub fn generate_default_manifest(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"

[[modules]]
name = "{name}"
content_roots = ["."]
source_roots = ["src"]

[[modules.configurations]]
name = "{name}"
output_type = "application"
target_platform = "web"
main_class = "Main"
output_file_name = "{name}.swf"
output_folder = "out"
"#
    )
}
