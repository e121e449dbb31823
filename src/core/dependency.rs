//! Dependency entries of a build configuration.
//!
//! A configuration either depends on another build configuration (possibly in
//! another module) or on a plain library. Only configuration references take
//! part in closure computation and link ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a dependency's code ends up in (or next to) the dependent's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkageType {
    /// Compiler default for the dependency kind
    #[default]
    Default,
    /// Merged into the dependent's code
    Merged,
    /// Runtime shared library
    Rsl,
    /// Available at compile time, provided at runtime by someone else
    External,
    /// Every class included, even if unreferenced
    Include,
    /// A runtime-loaded module compiled alongside and loaded later
    LoadInRuntime,
}

impl LinkageType {
    /// Linkage values that make sense for a library (SWC) dependency.
    pub const SWC_LINKAGE_VALUES: [LinkageType; 5] = [
        LinkageType::Default,
        LinkageType::Merged,
        LinkageType::Rsl,
        LinkageType::External,
        LinkageType::Include,
    ];

    /// Whether this linkage is one of the SWC-style values.
    pub fn is_swc_linkage(self) -> bool {
        Self::SWC_LINKAGE_VALUES.contains(&self)
    }

    /// Short text used in messages.
    pub fn short_text(self) -> &'static str {
        match self {
            LinkageType::Default => "Default",
            LinkageType::Merged => "Merged",
            LinkageType::Rsl => "RSL",
            LinkageType::External => "External",
            LinkageType::Include => "Include",
            LinkageType::LoadInRuntime => "Loaded at runtime",
        }
    }
}

impl fmt::Display for LinkageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_text())
    }
}

/// Reference to a build configuration of some module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfigurationEntry {
    /// Module owning the referenced configuration
    pub module: String,

    /// Name of the referenced configuration
    pub configuration: String,

    /// Linkage of the dependency
    #[serde(default)]
    pub linkage: LinkageType,
}

impl BuildConfigurationEntry {
    /// Create a configuration reference.
    pub fn new(module: impl Into<String>, configuration: impl Into<String>, linkage: LinkageType) -> Self {
        BuildConfigurationEntry {
            module: module.into(),
            configuration: configuration.into(),
            linkage,
        }
    }
}

/// A plain library dependency (SWC file or library set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// Library name or path
    pub library: String,

    /// Linkage of the dependency
    #[serde(default)]
    pub linkage: LinkageType,
}

/// One entry of a configuration's dependency list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyEntry {
    /// Another build configuration
    BuildConfiguration(BuildConfigurationEntry),
    /// Anything that is not a build configuration
    Library(LibraryEntry),
}

impl DependencyEntry {
    /// Shorthand for a configuration reference.
    pub fn configuration(
        module: impl Into<String>,
        configuration: impl Into<String>,
        linkage: LinkageType,
    ) -> Self {
        DependencyEntry::BuildConfiguration(BuildConfigurationEntry::new(module, configuration, linkage))
    }

    /// The configuration reference, if this entry is one.
    pub fn as_configuration(&self) -> Option<&BuildConfigurationEntry> {
        match self {
            DependencyEntry::BuildConfiguration(entry) => Some(entry),
            DependencyEntry::Library(_) => None,
        }
    }

    /// Linkage of this entry.
    pub fn linkage(&self) -> LinkageType {
        match self {
            DependencyEntry::BuildConfiguration(entry) => entry.linkage,
            DependencyEntry::Library(entry) => entry.linkage,
        }
    }
}
