//! Command-line compilation with the SDK's `mxmlc` and `compc`.

use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::builder::dispatch::TaskRunner;
use crate::builder::plan::CompilationTask;
use crate::core::{DependencyEntry, LinkageType, OutputType, Project};
use crate::util::fs::is_unset;
use crate::util::options::split_options;
use crate::util::process::{sdk_tool, ProcessBuilder};
use crate::validate::config_file::InfoFromConfigFile;

/// Compiles tasks by running `mxmlc` (applications, RLMs, stylesheets) or
/// `compc` (libraries) from the configuration's SDK.
pub struct MxmlcCompcRunner<'a> {
    project: &'a Project,
}

impl<'a> MxmlcCompcRunner<'a> {
    pub fn new(project: &'a Project) -> Self {
        MxmlcCompcRunner { project }
    }

    /// The compiler invocation for `task`.
    pub fn command(&self, task: &CompilationTask) -> Result<ProcessBuilder> {
        let module = &task.task.module;
        let bc = &task.task.configuration;

        let sdk_name = bc
            .sdk
            .as_deref()
            .with_context(|| format!("no SDK set for {}", task))?;
        let sdk = self
            .project
            .sdk(sdk_name)
            .with_context(|| format!("SDK `{}` is not defined", sdk_name))?;

        let is_library = bc.output_type == OutputType::Library;
        let tool = if is_library { "compc" } else { "mxmlc" };
        let mut cmd = ProcessBuilder::new(sdk_tool(&sdk.home, tool))
            .env("FLEX_HOME", sdk.home.to_string_lossy().into_owned())
            .cwd(self.project.root());

        let config_file = &bc.compiler_options.additional_config_file;
        let mut main_from_config_file = false;
        if !is_unset(config_file) {
            cmd = cmd.arg(format!("-load-config+={}", config_file.display()));
            main_from_config_file =
                bc.main_class.is_empty() && InfoFromConfigFile::read(config_file).main_class_path.is_some();
        }
        for root in module.source_roots() {
            cmd = cmd.arg(format!("-source-path+={}", root.display()));
        }
        for entry in &bc.dependencies {
            if let Some(arg) = self.library_argument(entry) {
                cmd = cmd.arg(arg);
            }
        }
        cmd = cmd.args(split_options(&bc.compiler_options.additional_options));
        cmd = cmd.arg(format!("-output={}", bc.actual_output_file_path().display()));

        if is_library {
            for root in module.source_roots() {
                cmd = cmd.arg(format!("-include-sources+={}", root.display()));
            }
            for file in &bc.compiler_options.files_to_include_in_swc {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                cmd = cmd.arg("-include-file").arg(name).arg(file);
            }
        } else if main_from_config_file {
            debug!("main class of {} comes from {}", task, config_file.display());
        } else {
            let main = module
                .main_class_file(&bc.main_class)
                .with_context(|| format!("main class `{}` of {} not found", bc.main_class, task))?;
            cmd = cmd.arg("--").arg(main);
        }

        Ok(cmd)
    }

    /// Compiler argument linking one dependency, if it links at compile time.
    fn library_argument(&self, entry: &DependencyEntry) -> Option<String> {
        let path = match entry {
            DependencyEntry::BuildConfiguration(reference) => {
                let (_, target) = self
                    .project
                    .find_configuration(&reference.module, &reference.configuration)?;
                if target.output_type != OutputType::Library {
                    return None;
                }
                target.actual_output_file_path().display().to_string()
            }
            DependencyEntry::Library(library) => library.library.clone(),
        };

        let flag = match entry.linkage() {
            LinkageType::Default | LinkageType::Merged => "-library-path+=",
            LinkageType::External => "-external-library-path+=",
            LinkageType::Include => "-include-libraries+=",
            LinkageType::Rsl => "-runtime-shared-library-path+=",
            LinkageType::LoadInRuntime => return None,
        };
        Some(format!("{}{}", flag, path))
    }
}

impl TaskRunner for MxmlcCompcRunner<'_> {
    fn run(&self, task: &CompilationTask) -> Result<()> {
        let cmd = self.command(task)?;
        let folder = &task.task.configuration.output_folder;
        std::fs::create_dir_all(folder)
            .with_context(|| format!("failed to create output folder {}", folder.display()))?;

        debug!("running {}", cmd.display_command());
        let output = cmd.exec()?;
        if !output.success {
            bail!("compilation of {} failed\n{}", task, output.log.trim_end());
        }
        info!("compiled {}", task.output().display());
        Ok(())
    }
}

/// Records the compiler invocations that would run, without running them.
pub struct DryRunRunner<'a> {
    compiler: MxmlcCompcRunner<'a>,
    commands: Mutex<Vec<String>>,
}

impl<'a> DryRunRunner<'a> {
    pub fn new(project: &'a Project) -> Self {
        DryRunRunner {
            compiler: MxmlcCompcRunner::new(project),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Recorded command lines in completion order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl TaskRunner for DryRunRunner<'_> {
    fn run(&self, task: &CompilationTask) -> Result<()> {
        let line = self.compiler.command(task)?.display_command();
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(line);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::plan::TaskKind;
    use crate::core::dependency::LibraryEntry;
    use crate::core::BuildConfiguration;
    use crate::resolver::ResolvedTask;
    use crate::test_support::{ProjectFixture, FIXTURE_SDK};

    fn main_task(project: &Project, module: &str, bc: &str) -> CompilationTask {
        let (module, bc) = project.find_configuration(module, bc).unwrap();
        CompilationTask::new(ResolvedTask::new(module.clone(), bc.clone()), TaskKind::Main, vec![])
    }

    #[test]
    fn test_application_command() {
        let fixture = ProjectFixture::new();
        let main = fixture.source("app/src", "com/acme/Main.mxml");
        let mut app = BuildConfiguration::new("App", OutputType::Application)
            .with_main_class("com.acme.Main")
            .with_output(fixture.path("out"), "app.swf")
            .with_sdk(FIXTURE_SDK)
            .with_dependency(DependencyEntry::configuration("lib", "Lib", LinkageType::External))
            .with_dependency(DependencyEntry::configuration("lib", "Shell", LinkageType::LoadInRuntime))
            .with_dependency(DependencyEntry::Library(LibraryEntry {
                library: "/libs/ext.swc".to_string(),
                linkage: LinkageType::Merged,
            }));
        app.compiler_options.additional_options = "-debug=true -title \"My App\"".to_string();
        let lib = BuildConfiguration::new("Lib", OutputType::Library).with_output(fixture.path("out"), "lib.swc");
        let shell = BuildConfiguration::new("Shell", OutputType::RuntimeLoadedModule);
        let project = fixture.project(vec![
            fixture.module("app").with_configuration(app),
            fixture.module("lib").with_configuration(lib).with_configuration(shell),
        ]);

        let cmd = MxmlcCompcRunner::new(&project).command(&main_task(&project, "app", "App")).unwrap();
        let args = cmd.get_args();

        assert!(cmd.get_program().ends_with(sdk_tool(std::path::Path::new(""), "mxmlc")));
        assert!(args.contains(&format!("-external-library-path+={}", fixture.path("out/lib.swc").display())));
        assert!(args.contains(&"-library-path+=/libs/ext.swc".to_string()));
        assert!(args.contains(&"My App".to_string()));
        assert!(!args.iter().any(|a| a.contains("Shell")));
        assert_eq!(args.last().unwrap(), &main.display().to_string());
    }

    #[test]
    fn test_library_command() {
        let fixture = ProjectFixture::new();
        let mut lib = BuildConfiguration::new("Lib", OutputType::Library)
            .with_output(fixture.path("out"), "lib.swc")
            .with_sdk(FIXTURE_SDK);
        lib.compiler_options.files_to_include_in_swc = vec![fixture.path("lib/assets/logo.png")];
        let project = fixture.project(vec![fixture.module("lib").with_configuration(lib)]);

        let cmd = MxmlcCompcRunner::new(&project).command(&main_task(&project, "lib", "Lib")).unwrap();
        let args = cmd.get_args();

        assert!(cmd.display_command().contains("compc"));
        assert!(args.contains(&format!("-include-sources+={}", fixture.path("lib/src").display())));
        assert!(args.contains(&"logo.png".to_string()));
        assert!(args.contains(&format!("-output={}", fixture.path("out/lib.swc").display())));
    }

    #[test]
    fn test_missing_sdk_or_main_class() {
        let fixture = ProjectFixture::new();
        let no_sdk = BuildConfiguration::new("NoSdk", OutputType::Application).with_main_class("Main");
        let undefined = BuildConfiguration::new("Undefined", OutputType::Application).with_sdk("air");
        let no_main = BuildConfiguration::new("NoMain", OutputType::Application)
            .with_main_class("Missing")
            .with_sdk(FIXTURE_SDK);
        let project = fixture.project(vec![fixture
            .module("app")
            .with_configuration(no_sdk)
            .with_configuration(undefined)
            .with_configuration(no_main)]);
        let runner = MxmlcCompcRunner::new(&project);

        let err = runner.command(&main_task(&project, "app", "NoSdk")).unwrap_err();
        assert!(err.to_string().contains("no SDK"));
        let err = runner.command(&main_task(&project, "app", "Undefined")).unwrap_err();
        assert!(err.to_string().contains("`air`"));
        let err = runner.command(&main_task(&project, "app", "NoMain")).unwrap_err();
        assert!(err.to_string().contains("main class `Missing`"));
    }

    #[test]
    fn test_main_class_from_config_file() {
        let fixture = ProjectFixture::new();
        fixture.source("app/src", "com/acme/Main.mxml");
        let config = fixture.file(
            "app/app-config.xml",
            "<flex-config><file-specs><path-element>src/com/acme/Main.mxml</path-element></file-specs></flex-config>",
        );
        let mut app = BuildConfiguration::new("App", OutputType::Application)
            .with_output(fixture.path("out"), "app.swf")
            .with_sdk(FIXTURE_SDK);
        app.compiler_options.additional_config_file = config.clone();
        let mut empty = app.clone();
        empty.name = "Empty".to_string();
        empty.compiler_options.additional_config_file = fixture.file("app/empty-config.xml", "<flex-config/>");
        let project = fixture.project(vec![fixture
            .module("app")
            .with_configuration(app)
            .with_configuration(empty)]);
        let runner = MxmlcCompcRunner::new(&project);

        let cmd = runner.command(&main_task(&project, "app", "App")).unwrap();
        let args = cmd.get_args();
        assert_eq!(args[0], format!("-load-config+={}", config.display()));
        assert!(!args.iter().any(|a| a == "--"));
        assert!(args.last().unwrap().starts_with("-output="));

        let err = runner.command(&main_task(&project, "app", "Empty")).unwrap_err();
        assert!(err.to_string().contains("main class ``"));
    }

    #[test]
    fn test_dry_run_records_commands() {
        let fixture = ProjectFixture::new();
        fixture.source("app/src", "Main.as");
        let app = BuildConfiguration::new("App", OutputType::Application)
            .with_main_class("Main")
            .with_output(fixture.path("out"), "app.swf")
            .with_sdk(FIXTURE_SDK);
        let project = fixture.project(vec![fixture.module("app").with_configuration(app)]);

        let runner = DryRunRunner::new(&project);
        runner.run(&main_task(&project, "app", "App")).unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].contains("mxmlc"));
        assert!(!fixture.path("out").exists());
    }
}
