//! Per-configuration setting checks.

use std::path::Path;

use crate::core::{BuildConfiguration, Module, Project};
use crate::util::fs::{has_extension, is_ancestor, is_unset};
use crate::validate::config_file::InfoFromConfigFile;
use crate::validate::linkage::is_linkage_legal;
use crate::validate::packaging::validate_packaging;
use crate::validate::problem::{CompilerOptionsField, DependenciesField, GeneralField, Problem};

/// Template file an HTML wrapper folder must contain.
pub const HTML_WRAPPER_TEMPLATE_FILE_NAME: &str = "index.template.html";

/// Highest SDK version number considered plausible.
const MAX_SDK_VERSION: u64 = 100;

/// Switches for checks that are not always wanted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Report dependencies whose linkage is illegal for the two output types.
    ///
    /// Off by default: some projects make applications depend on other
    /// applications only to get a predictable compilation order, and such
    /// dependencies are ignored rather than rejected.
    pub check_dependency_types: bool,
}

/// Checks one build configuration and reports every problem found.
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationValidator<'a> {
    project: &'a Project,
    policy: ValidationPolicy,
}

impl<'a> ConfigurationValidator<'a> {
    pub fn new(project: &'a Project, policy: ValidationPolicy) -> Self {
        ConfigurationValidator { project, policy }
    }

    /// Validate `bc` of `module`, passing each problem to `emit`.
    ///
    /// Checks never stop at the first problem. Only filesystem existence is
    /// probed; nothing is written.
    pub fn validate(&self, module: &Module, bc: &BuildConfiguration, check_packaging: bool, emit: &mut dyn FnMut(Problem)) {
        self.check_sdk(bc, emit);
        let info = self.check_config_file(bc, emit);
        let nature = bc.nature();

        if !nature.is_lib() && info.main_class(module).is_none() && !bc.temporary {
            check_main_class(module, bc, emit);
        }

        if !info.overrides_output() {
            check_output(bc, emit);
        }

        if nature.is_web_platform() && nature.is_app() && bc.use_html_wrapper {
            check_html_wrapper(module, bc, &info, emit);
        }

        if nature.can_have_rlms_and_runtime_stylesheets() {
            check_rlms(module, bc, emit);
            check_runtime_stylesheets(bc, emit);
        }

        if nature.is_lib() {
            for path in &bc.compiler_options.files_to_include_in_swc {
                if !path.exists() {
                    emit(Problem::compiler_options(
                        format!("File to include in SWC not found: {}", path.display()),
                        "file.to.include.in.swc.not.found",
                        CompilerOptionsField::FilesToIncludeInSwc,
                    ));
                }
            }
        }

        if check_packaging {
            for options in bc.packaging_options() {
                validate_packaging(options, emit);
            }
        }

        if self.policy.check_dependency_types {
            self.check_dependency_types(module, bc, emit);
        }
    }

    fn check_sdk(&self, bc: &BuildConfiguration, emit: &mut dyn FnMut(Problem)) {
        let sdk = match bc.sdk.as_deref() {
            None => {
                emit(Problem::dependencies("Flex SDK is not set", "sdk.not.set", DependenciesField::Sdk));
                return;
            }
            Some(name) => match self.project.sdk(name) {
                Some(sdk) => sdk,
                None => {
                    emit(Problem::dependencies(
                        format!("Flex SDK `{}` is not defined in the project", name),
                        "sdk.not.set",
                        DependenciesField::Sdk,
                    ));
                    return;
                }
            },
        };

        if !is_known_sdk_version(&sdk.version) {
            emit(
                Problem::dependencies(
                    format!("Unknown version of Flex SDK `{}`: `{}`", sdk.name, sdk.version),
                    "sdk.version.unknown",
                    DependenciesField::Sdk,
                )
                .as_warning(),
            );
        }
    }

    fn check_config_file(&self, bc: &BuildConfiguration, emit: &mut dyn FnMut(Problem)) -> InfoFromConfigFile {
        let path = &bc.compiler_options.additional_config_file;
        if is_unset(path) {
            return InfoFromConfigFile::default();
        }

        if !path.is_file() {
            emit(Problem::compiler_options(
                format!("Additional compiler configuration file not found: {}", path.display()),
                "additional.config.file.not.found",
                CompilerOptionsField::AdditionalConfigFile,
            ));
        }

        // A temporary copy is compiled with a generated config merged in, so
        // the file's values must not suppress checks on it.
        if bc.temporary {
            InfoFromConfigFile::default()
        } else {
            InfoFromConfigFile::read(path)
        }
    }

    fn check_dependency_types(&self, module: &Module, bc: &BuildConfiguration, emit: &mut dyn FnMut(Problem)) {
        for entry in bc.dependencies.iter().filter_map(|e| e.as_configuration()) {
            let Some((_, dependency)) = self.project.find_configuration(&entry.module, &entry.configuration) else {
                emit(Problem::dependencies(
                    format!(
                        "Build configuration `{}` of module `{}` required by `{}` of module `{}` does not exist",
                        entry.configuration,
                        entry.module,
                        bc.name,
                        module.name()
                    ),
                    "bc.dependency.does.not.exist",
                    DependenciesField::Dependencies,
                ));
                continue;
            };

            if !is_linkage_legal(bc.output_type, dependency.output_type, entry.linkage) {
                emit(Problem::dependencies(
                    format!(
                        "`{}` ({}) of module `{}` cannot depend on `{}` ({}) of module `{}` with linkage `{}`",
                        bc.name,
                        bc.output_type,
                        module.name(),
                        dependency.name,
                        dependency.output_type,
                        entry.module,
                        entry.linkage
                    ),
                    "bc.dependency.problem",
                    DependenciesField::Dependencies,
                ));
            }
        }
    }
}

/// Whether an SDK version string lies within `0..=100`.
fn is_known_sdk_version(version: &str) -> bool {
    let mut parts = version.split(['.', '-', '_', ' ']);
    let major: u64 = match parts.next().and_then(|p| p.trim().parse().ok()) {
        Some(major) => major,
        None => return false,
    };
    if major < MAX_SDK_VERSION {
        return true;
    }
    major == MAX_SDK_VERSION && parts.all(|p| p.parse::<u64>().map_or(false, |n| n == 0))
}

fn check_main_class(module: &Module, bc: &BuildConfiguration, emit: &mut dyn FnMut(Problem)) {
    if bc.main_class.is_empty() {
        emit(Problem::general(&bc.name, "Main class is not set", "main.class.not.set", GeneralField::MainClass));
    } else if !module.has_main_class(&bc.main_class) {
        emit(Problem::general(
            &bc.name,
            format!("Main class `{}` not found", bc.main_class),
            "main.class.not.found",
            GeneralField::MainClass,
        ));
    }
}

fn check_output(bc: &BuildConfiguration, emit: &mut dyn FnMut(Problem)) {
    let ext = bc.output_type.output_extension();
    if bc.output_file_name.is_empty() {
        emit(Problem::general(
            &bc.name,
            "Output file name is not set",
            "output.file.name.not.set",
            GeneralField::OutputFileName,
        ));
    } else if !has_extension(&bc.output_file_name, ext) {
        emit(Problem::general(
            &bc.name,
            format!("Output file must have `{}` extension", ext),
            "output.file.wrong.extension",
            GeneralField::OutputFileName,
        ));
    }

    if is_unset(&bc.output_folder) {
        emit(Problem::general(
            &bc.name,
            "Output folder is not set",
            "output.folder.not.set",
            GeneralField::OutputFolder,
        ));
    } else if !bc.output_folder.is_absolute() {
        emit(Problem::general(
            &bc.name,
            format!("Output folder must be an absolute path: {}", bc.output_folder.display()),
            "output.folder.not.absolute",
            GeneralField::OutputFolder,
        ));
    }
}

fn check_html_wrapper(module: &Module, bc: &BuildConfiguration, info: &InfoFromConfigFile, emit: &mut dyn FnMut(Problem)) {
    let template_dir = &bc.wrapper_template_path;
    if is_unset(template_dir) {
        emit(Problem::general(
            &bc.name,
            "HTML template folder is not set",
            "html.template.folder.not.set",
            GeneralField::HtmlTemplatePath,
        ));
        return;
    }
    if !template_dir.is_dir() {
        emit(Problem::general(
            &bc.name,
            format!("HTML template folder not found: {}", template_dir.display()),
            "html.template.folder.not.found",
            GeneralField::HtmlTemplatePath,
        ));
        return;
    }
    if !template_dir.join(HTML_WRAPPER_TEMPLATE_FILE_NAME).is_file() {
        emit(Problem::general(
            &bc.name,
            format!(
                "HTML template folder {} does not contain {}",
                template_dir.display(),
                HTML_WRAPPER_TEMPLATE_FILE_NAME
            ),
            "no.index.template.html.file",
            GeneralField::HtmlTemplatePath,
        ));
        return;
    }

    let output_folder = info.output_folder_path.as_deref().unwrap_or(bc.output_folder.as_path());
    let others = module
        .content_roots()
        .iter()
        .map(|root| (root.as_path(), "module content root"))
        .chain(module.source_roots().iter().map(|root| (root.as_path(), "source folder")))
        .chain((!is_unset(output_folder)).then_some((output_folder, "output folder")));

    for (folder, kind) in others {
        check_wrapper_folder_clash(bc, template_dir, folder, kind, emit);
    }
}

fn check_wrapper_folder_clash(
    bc: &BuildConfiguration,
    template_dir: &Path,
    folder: &Path,
    kind: &str,
    emit: &mut dyn FnMut(Problem),
) {
    if is_ancestor(template_dir, folder, false) {
        emit(Problem::general(
            &bc.name,
            format!(
                "HTML template folder {} must not contain the {} {}",
                template_dir.display(),
                kind,
                folder.display()
            ),
            "html.wrapper.folder.clash",
            GeneralField::HtmlTemplatePath,
        ));
    }
}

fn check_rlms(module: &Module, bc: &BuildConfiguration, emit: &mut dyn FnMut(Problem)) {
    let problem = |message: String, code: &'static str| Problem::general(&bc.name, message, code, GeneralField::Rlms);

    for rlm in &bc.rlms {
        if rlm.main_class.is_empty() {
            emit(problem("Main class of a runtime-loaded module is not set".to_string(), "rlm.main.class.not.set"));
        } else {
            if !module.has_main_class(&rlm.main_class) {
                emit(problem(
                    format!("Main class of runtime-loaded module not found: `{}`", rlm.main_class),
                    "rlm.main.class.not.found",
                ));
            }
            if bc.main_class == rlm.main_class {
                emit(problem(
                    format!(
                        "Runtime-loaded module main class `{}` is the main class of the build configuration",
                        rlm.main_class
                    ),
                    "rlm.main.class.equal.to.bc.main.class",
                ));
            }
        }

        if rlm.output_file.is_empty() {
            emit(problem(
                "Output file of a runtime-loaded module is not specified".to_string(),
                "rlm.output.file.name.not.specified",
            ));
        } else {
            if bc.output_file_name == rlm.output_file {
                emit(problem(
                    format!(
                        "Runtime-loaded module output `{}` is the output of the build configuration",
                        rlm.output_file
                    ),
                    "rlm.output.equal.to.bc.output",
                ));
            }
            if !has_extension(&rlm.output_file, "swf") {
                emit(problem(
                    format!("Runtime-loaded module output `{}` must have `swf` extension", rlm.output_file),
                    "rlm.output.file.must.have.swf.extension",
                ));
            }
        }
    }
}

fn check_runtime_stylesheets(bc: &BuildConfiguration, emit: &mut dyn FnMut(Problem)) {
    for css in &bc.css_files_to_compile {
        let name = css.to_string_lossy();
        if !has_extension(&name, "css") {
            emit(Problem::general(
                &bc.name,
                format!("Runtime stylesheet is not a CSS file: {}", css.display()),
                "not.a.css.runtime.stylesheet",
                GeneralField::RuntimeStyleSheets,
            ));
        } else if !css.exists() {
            emit(Problem::general(
                &bc.name,
                format!("Runtime stylesheet not found: {}", css.display()),
                "css.not.found",
                GeneralField::RuntimeStyleSheets,
            ));
        }
    }
}
