//! Build configurations.
//!
//! A build configuration describes one compiled artifact of a module: an
//! application, a library or a runtime-loaded module. Configurations are
//! shared read-only (`Arc<BuildConfiguration>`); a pass that needs different
//! settings works on a derived copy obtained through [`BuildConfiguration::copy`]
//! or [`BuildConfiguration::temporary_copy_for_compilation`], never on the
//! shared value.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::dependency::DependencyEntry;
use crate::core::packaging::{AirPackagingOptions, PackagingOptions};
use crate::util::fs::resolve_against;
use crate::util::options::remove_options;

/// Kind of artifact a configuration produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputType {
    /// Runnable application (`.swf`)
    #[default]
    Application,
    /// Library (`.swc`)
    Library,
    /// Module loaded by an application at runtime (`.swf`)
    RuntimeLoadedModule,
}

impl OutputType {
    /// Text used in messages.
    pub fn presentable_text(self) -> &'static str {
        match self {
            OutputType::Application => "Application",
            OutputType::Library => "Library",
            OutputType::RuntimeLoadedModule => "Runtime-loaded module",
        }
    }

    /// Extension (without dot) the output file must have.
    pub fn output_extension(self) -> &'static str {
        match self {
            OutputType::Library => "swc",
            OutputType::Application | OutputType::RuntimeLoadedModule => "swf",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.presentable_text())
    }
}

/// Platform the artifact runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    #[default]
    Web,
    Desktop,
    Mobile,
}

/// Which resource files are copied next to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceFilesMode {
    None,
    #[default]
    All,
    ResourcePatterns,
}

/// A runtime-loaded module declared by an application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RlmInfo {
    /// Fully qualified main class of the module
    pub main_class: String,

    /// Output path relative to the owner's output folder, e.g. `mods/chat.swf`
    pub output_file: String,

    /// Optimize the module for its owning application
    pub optimize: bool,
}

impl RlmInfo {
    /// Create a module descriptor.
    pub fn new(main_class: impl Into<String>, output_file: impl Into<String>, optimize: bool) -> Self {
        RlmInfo {
            main_class: main_class.into(),
            output_file: output_file.into(),
            optimize,
        }
    }
}

/// Compiler options of a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Free-form options appended to the command line
    pub additional_options: String,

    /// Additional mxmlc/compc XML config file
    pub additional_config_file: PathBuf,

    /// Files bundled into a library's SWC
    pub files_to_include_in_swc: Vec<PathBuf>,

    /// Resource file copying
    pub resource_files_mode: ResourceFilesMode,
}

/// Identity of a configuration: module name plus configuration name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ConfigurationId {
    pub module: String,
    pub configuration: String,
}

impl ConfigurationId {
    /// Create an identity.
    pub fn new(module: impl Into<String>, configuration: impl Into<String>) -> Self {
        ConfigurationId {
            module: module.into(),
            configuration: configuration.into(),
        }
    }
}

impl fmt::Display for ConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` (module `{}`)", self.configuration, self.module)
    }
}

/// Platform, flavour and output kind of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfigurationNature {
    pub target_platform: TargetPlatform,
    pub pure_as: bool,
    pub output_type: OutputType,
}

impl BuildConfigurationNature {
    pub fn is_app(&self) -> bool {
        self.output_type == OutputType::Application
    }

    pub fn is_lib(&self) -> bool {
        self.output_type == OutputType::Library
    }

    pub fn is_web_platform(&self) -> bool {
        self.target_platform == TargetPlatform::Web
    }

    pub fn is_desktop_platform(&self) -> bool {
        self.target_platform == TargetPlatform::Desktop
    }

    pub fn is_mobile_platform(&self) -> bool {
        self.target_platform == TargetPlatform::Mobile
    }

    /// Only Flex applications outside mobile can carry RLMs and runtime stylesheets.
    pub fn can_have_rlms_and_runtime_stylesheets(&self) -> bool {
        self.is_app() && !self.is_mobile_platform() && !self.pure_as
    }
}

/// A build configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfiguration {
    /// Name, unique within the owning module
    pub name: String,

    pub output_type: OutputType,

    pub target_platform: TargetPlatform,

    /// Pure ActionScript project (no Flex framework)
    pub pure_as: bool,

    /// Fully qualified main class
    pub main_class: String,

    pub output_file_name: String,

    /// Absolute output folder
    pub output_folder: PathBuf,

    /// Name of the SDK the configuration compiles against
    pub sdk: Option<String>,

    /// Generate an HTML wrapper (web applications)
    pub use_html_wrapper: bool,

    /// Folder holding `index.template.html`
    pub wrapper_template_path: PathBuf,

    /// Name of the configuration a runtime-loaded module is optimized for
    pub optimize_for: String,

    pub compiler_options: CompilerOptions,

    pub dependencies: Vec<DependencyEntry>,

    /// Runtime-loaded modules compiled alongside this configuration
    pub rlms: Vec<RlmInfo>,

    /// Stylesheets compiled into standalone `.swf` files
    pub css_files_to_compile: Vec<PathBuf>,

    pub air_desktop: AirPackagingOptions,

    pub android: AirPackagingOptions,

    pub ios: AirPackagingOptions,

    /// Excluded from every compilation
    pub skip_compile: bool,

    /// Synthesized for a single compilation pass
    #[serde(skip)]
    pub temporary: bool,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        BuildConfiguration {
            name: String::new(),
            output_type: OutputType::Application,
            target_platform: TargetPlatform::Web,
            pure_as: false,
            main_class: String::new(),
            output_file_name: String::new(),
            output_folder: PathBuf::new(),
            sdk: None,
            use_html_wrapper: false,
            wrapper_template_path: PathBuf::new(),
            optimize_for: String::new(),
            compiler_options: CompilerOptions::default(),
            dependencies: Vec::new(),
            rlms: Vec::new(),
            css_files_to_compile: Vec::new(),
            air_desktop: AirPackagingOptions::default(),
            android: AirPackagingOptions::default(),
            ios: AirPackagingOptions::default(),
            skip_compile: false,
            temporary: false,
        }
    }
}

impl BuildConfiguration {
    /// Create a configuration with default settings.
    pub fn new(name: impl Into<String>, output_type: OutputType) -> Self {
        BuildConfiguration {
            name: name.into(),
            output_type,
            ..Default::default()
        }
    }

    /// Set the target platform.
    pub fn with_platform(mut self, platform: TargetPlatform) -> Self {
        self.target_platform = platform;
        self
    }

    /// Set the main class.
    pub fn with_main_class(mut self, main_class: impl Into<String>) -> Self {
        self.main_class = main_class.into();
        self
    }

    /// Set the output file name and folder.
    pub fn with_output(mut self, folder: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        self.output_folder = folder.into();
        self.output_file_name = file_name.into();
        self
    }

    /// Set the SDK name.
    pub fn with_sdk(mut self, sdk: impl Into<String>) -> Self {
        self.sdk = Some(sdk.into());
        self
    }

    /// Add a dependency entry.
    pub fn with_dependency(mut self, entry: DependencyEntry) -> Self {
        self.dependencies.push(entry);
        self
    }

    /// Add a runtime-loaded module.
    pub fn with_rlm(mut self, rlm: RlmInfo) -> Self {
        self.rlms.push(rlm);
        self
    }

    /// Add a runtime stylesheet.
    pub fn with_css(mut self, path: impl Into<PathBuf>) -> Self {
        self.css_files_to_compile.push(path.into());
        self
    }

    /// Mark the configuration as skipped.
    pub fn skipped(mut self) -> Self {
        self.skip_compile = true;
        self
    }

    /// Platform, flavour and output kind.
    pub fn nature(&self) -> BuildConfigurationNature {
        BuildConfigurationNature {
            target_platform: self.target_platform,
            pure_as: self.pure_as,
            output_type: self.output_type,
        }
    }

    /// Full path of the produced file.
    pub fn actual_output_file_path(&self) -> PathBuf {
        self.output_folder.join(&self.output_file_name)
    }

    /// A detached copy that is never persisted.
    pub fn copy(&self) -> BuildConfiguration {
        self.clone()
    }

    /// A copy marked as synthesized for one compilation pass.
    pub fn temporary_copy_for_compilation(&self) -> BuildConfiguration {
        let mut copy = self.clone();
        copy.temporary = true;
        copy
    }

    /// A copy with its debug compiler flag forced to `debug`.
    ///
    /// Any `debug` or `compiler.debug` option already present is removed first.
    pub fn with_forced_debug(&self, debug: bool) -> BuildConfiguration {
        let mut copy = self.copy();
        let stripped = remove_options(
            &self.compiler_options.additional_options,
            &["debug", "compiler.debug"],
        );
        copy.compiler_options.additional_options = if stripped.is_empty() {
            format!("-debug={}", debug)
        } else {
            format!("{} -debug={}", stripped, debug)
        };
        copy
    }

    /// Packaging option sets to validate, tagged with their platform.
    ///
    /// Desktop applications always package; mobile platforms only when enabled.
    pub fn packaging_options(&self) -> Vec<PackagingOptions<'_>> {
        if self.output_type != OutputType::Application {
            return Vec::new();
        }
        match self.target_platform {
            TargetPlatform::Web => Vec::new(),
            TargetPlatform::Desktop => vec![PackagingOptions::Desktop(&self.air_desktop)],
            TargetPlatform::Mobile => {
                let mut options = Vec::new();
                if self.android.enabled {
                    options.push(PackagingOptions::Android(&self.android));
                }
                if self.ios.enabled {
                    options.push(PackagingOptions::Ios(&self.ios));
                }
                options
            }
        }
    }

    /// Resolve every relative filesystem path against `base`.
    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        self.output_folder = resolve_against(base, &self.output_folder);
        self.wrapper_template_path = resolve_against(base, &self.wrapper_template_path);
        self.compiler_options.additional_config_file =
            resolve_against(base, &self.compiler_options.additional_config_file);
        for path in &mut self.compiler_options.files_to_include_in_swc {
            *path = resolve_against(base, path);
        }
        for path in &mut self.css_files_to_compile {
            *path = resolve_against(base, path);
        }
        self.air_desktop.resolve_paths(base);
        self.android.resolve_paths(base);
        self.ios.resolve_paths(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::packaging::PackagingPlatform;

    #[test]
    fn test_forced_debug_rewrites_flag() {
        let mut bc = BuildConfiguration::new("App", OutputType::Application);
        bc.compiler_options.additional_options = "-debug=true -locale=en_US -compiler.debug".to_string();

        let release = bc.with_forced_debug(false);
        assert_eq!(release.compiler_options.additional_options, "-locale=en_US -debug=false");
        // the original is untouched
        assert_eq!(
            bc.compiler_options.additional_options,
            "-debug=true -locale=en_US -compiler.debug"
        );
        assert!(!release.temporary);
    }

    #[test]
    fn test_forced_debug_on_empty_options() {
        let bc = BuildConfiguration::new("App", OutputType::Application);
        assert_eq!(bc.with_forced_debug(true).compiler_options.additional_options, "-debug=true");
    }

    #[test]
    fn test_temporary_copy() {
        let bc = BuildConfiguration::new("App", OutputType::Application);
        let copy = bc.temporary_copy_for_compilation();
        assert!(copy.temporary);
        assert!(!bc.temporary);
        assert_eq!(copy.name, "App");
    }

    #[test]
    fn test_nature_rlm_support() {
        let web_app = BuildConfiguration::new("a", OutputType::Application);
        assert!(web_app.nature().can_have_rlms_and_runtime_stylesheets());

        let mobile_app = BuildConfiguration::new("m", OutputType::Application).with_platform(TargetPlatform::Mobile);
        assert!(!mobile_app.nature().can_have_rlms_and_runtime_stylesheets());

        let lib = BuildConfiguration::new("l", OutputType::Library);
        assert!(!lib.nature().can_have_rlms_and_runtime_stylesheets());

        let mut pure_as = BuildConfiguration::new("p", OutputType::Application);
        pure_as.pure_as = true;
        assert!(!pure_as.nature().can_have_rlms_and_runtime_stylesheets());
    }

    #[test]
    fn test_packaging_options_by_platform() {
        let desktop = BuildConfiguration::new("d", OutputType::Application).with_platform(TargetPlatform::Desktop);
        let platforms: Vec<_> = desktop.packaging_options().iter().map(|o| o.platform()).collect();
        assert_eq!(platforms, vec![PackagingPlatform::Desktop]);

        let mut mobile = BuildConfiguration::new("m", OutputType::Application).with_platform(TargetPlatform::Mobile);
        assert!(mobile.packaging_options().is_empty());
        mobile.ios.enabled = true;
        let platforms: Vec<_> = mobile.packaging_options().iter().map(|o| o.platform()).collect();
        assert_eq!(platforms, vec![PackagingPlatform::Ios]);

        let lib = BuildConfiguration::new("l", OutputType::Library).with_platform(TargetPlatform::Desktop);
        assert!(lib.packaging_options().is_empty());
    }

    #[test]
    fn test_actual_output_file_path() {
        let bc = BuildConfiguration::new("App", OutputType::Application).with_output("/out", "app.swf");
        assert_eq!(bc.actual_output_file_path(), PathBuf::from("/out/app.swf"));
    }
}
