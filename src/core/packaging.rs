//! AIR packaging options for desktop, Android and iOS.
//!
//! The three platforms share one option shape; which rules apply is decided by
//! the [`PackagingOptions`] tag the options are viewed through.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::util::fs::resolve_against;

/// A file copied into the package at a relative location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePathAndPathInPackage {
    /// Absolute path of the file or folder on disk
    pub file_path: PathBuf,

    /// Location inside the package
    pub path_in_package: String,
}

impl FilePathAndPathInPackage {
    /// Create a new entry.
    pub fn new(file_path: impl Into<PathBuf>, path_in_package: impl Into<String>) -> Self {
        FilePathAndPathInPackage {
            file_path: file_path.into(),
            path_in_package: path_in_package.into(),
        }
    }
}

/// Signing settings of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirSigningOptions {
    /// Sign with a temporary self-signed certificate (ignored for iOS)
    pub use_temp_certificate: bool,

    /// Keystore holding the signing certificate
    pub keystore_path: PathBuf,

    /// iOS provisioning profile
    pub provisioning_profile_path: PathBuf,
}

/// Packaging settings shared by all AIR platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirPackagingOptions {
    /// Whether packaging for this platform is enabled (mobile only)
    pub enabled: bool,

    /// Generate the application descriptor instead of using a custom one
    pub use_generated_descriptor: bool,

    /// Custom application descriptor
    pub custom_descriptor_path: PathBuf,

    /// Package file name, without extension
    pub package_file_name: String,

    /// Extra files to put into the package
    pub files_to_package: Vec<FilePathAndPathInPackage>,

    /// Signing settings
    pub signing: AirSigningOptions,
}

impl Default for AirPackagingOptions {
    fn default() -> Self {
        AirPackagingOptions {
            enabled: false,
            use_generated_descriptor: true,
            custom_descriptor_path: PathBuf::new(),
            package_file_name: String::new(),
            files_to_package: Vec::new(),
            signing: AirSigningOptions::default(),
        }
    }
}

impl AirPackagingOptions {
    /// Resolve relative paths against `base`.
    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        self.custom_descriptor_path = resolve_against(base, &self.custom_descriptor_path);
        self.signing.keystore_path = resolve_against(base, &self.signing.keystore_path);
        self.signing.provisioning_profile_path =
            resolve_against(base, &self.signing.provisioning_profile_path);
        for entry in &mut self.files_to_package {
            entry.file_path = resolve_against(base, &entry.file_path);
        }
    }
}

/// The platform a set of packaging options belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingPlatform {
    Desktop,
    Android,
    Ios,
}

impl PackagingPlatform {
    /// Device label used in messages.
    pub fn device_label(self) -> &'static str {
        match self {
            PackagingPlatform::Desktop => "AIR desktop",
            PackagingPlatform::Android => "Android",
            PackagingPlatform::Ios => "iOS",
        }
    }

    /// Name of the settings tab the options are edited on.
    pub fn tab_name(self) -> &'static str {
        match self {
            PackagingPlatform::Desktop => "AIR Package",
            PackagingPlatform::Android => "Android",
            PackagingPlatform::Ios => "iOS",
        }
    }
}

impl fmt::Display for PackagingPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.device_label())
    }
}

/// Packaging options tagged with their platform.
#[derive(Debug, Clone, Copy)]
pub enum PackagingOptions<'a> {
    Desktop(&'a AirPackagingOptions),
    Android(&'a AirPackagingOptions),
    Ios(&'a AirPackagingOptions),
}

impl<'a> PackagingOptions<'a> {
    /// The platform tag.
    pub fn platform(&self) -> PackagingPlatform {
        match self {
            PackagingOptions::Desktop(_) => PackagingPlatform::Desktop,
            PackagingOptions::Android(_) => PackagingPlatform::Android,
            PackagingOptions::Ios(_) => PackagingPlatform::Ios,
        }
    }

    /// The underlying options.
    pub fn options(&self) -> &'a AirPackagingOptions {
        match self {
            PackagingOptions::Desktop(o) | PackagingOptions::Android(o) | PackagingOptions::Ios(o) => o,
        }
    }
}

/// Kind of Android package to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AndroidPackageType {
    #[default]
    Release,
    Debug,
    DebugOverNetwork,
}

/// Kind of iOS package to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IosPackageType {
    #[default]
    Test,
    DebugOverNetwork,
    AdHoc,
    AppStore,
}

/// Project-wide packaging selection used to force the debug flag of mobile apps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackagingParameters {
    pub android_package_type: AndroidPackageType,
    pub ios_package_type: IosPackageType,
}
