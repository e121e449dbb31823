//! Core data structures for flexbuild.
//!
//! This module contains the project model the rest of the crate reads:
//! - Build configurations and their derived copies
//! - Dependency entries and linkage types
//! - AIR packaging options
//! - Modules, projects, manifests and the workspace

pub mod configuration;
pub mod dependency;
pub mod manifest;
pub mod module;
pub mod packaging;
pub mod project;
pub mod workspace;

pub use configuration::{BuildConfiguration, ConfigurationId, OutputType, TargetPlatform};
pub use dependency::{DependencyEntry, LinkageType};
pub use manifest::Manifest;
pub use module::Module;
pub use project::{Project, Sdk};
pub use workspace::{find_manifest, Workspace, MANIFEST_NAME};
