//! Expansion of resolved configurations into compilation tasks.
//!
//! An application configuration on the web or desktop may declare
//! runtime-loaded modules and runtime stylesheets. Each of them is compiled by
//! its own compiler invocation, described by a derived configuration copy that
//! shares the owner's dependencies.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::builder::plan::{CompilationTask, TaskKind};
use crate::core::configuration::{ResourceFilesMode, RlmInfo};
use crate::core::{BuildConfiguration, ConfigurationId, LinkageType, OutputType, Project};
use crate::resolver::ResolvedTask;
use crate::util::fs::{file_name, name_without_extension, parent_path, relative_path_inside, to_slash};
use crate::util::options::remove_options;

/// Turns resolved (module, configuration) pairs into compilation tasks.
pub struct TaskExpander<'a> {
    project: &'a Project,
}

impl<'a> TaskExpander<'a> {
    pub fn new(project: &'a Project) -> Self {
        TaskExpander { project }
    }

    /// Expand every task in order.
    pub fn expand_all<'t>(&self, tasks: impl IntoIterator<Item = &'t ResolvedTask>) -> Vec<CompilationTask> {
        tasks.into_iter().flat_map(|task| self.expand(task)).collect()
    }

    /// Tasks for one configuration: the main task, then one per RLM in
    /// declaration order, then one per stylesheet in declaration order.
    ///
    /// The configuration in `task` is never modified.
    pub fn expand(&self, task: &ResolvedTask) -> Vec<CompilationTask> {
        let bc = &task.configuration;
        let dependencies = self.linked_dependencies(bc);
        let mut tasks = vec![CompilationTask::new(task.clone(), TaskKind::Main, dependencies.clone())];

        if !bc.nature().can_have_rlms_and_runtime_stylesheets() {
            return tasks;
        }

        for rlm in &bc.rlms {
            let copy = rlm_configuration(bc, rlm);
            debug!("RLM task {} for {}", rlm.main_class, task);
            tasks.push(CompilationTask::new(
                ResolvedTask::derived(task.module.clone(), copy),
                TaskKind::RuntimeLoadedModule,
                dependencies.clone(),
            ));
        }

        for css in &bc.css_files_to_compile {
            if !css.is_file() {
                debug!("skipping missing runtime stylesheet {}", css.display());
                continue;
            }
            let copy = self.css_configuration(bc, css);
            debug!("stylesheet task {} for {}", css.display(), task);
            tasks.push(CompilationTask::new(
                ResolvedTask::derived(task.module.clone(), copy),
                TaskKind::RuntimeStylesheet,
                dependencies.clone(),
            ));
        }

        tasks
    }

    /// Configurations that must be compiled before `bc` can be linked.
    fn linked_dependencies(&self, bc: &BuildConfiguration) -> Vec<ConfigurationId> {
        bc.dependencies
            .iter()
            .filter_map(|entry| entry.as_configuration())
            .filter(|entry| entry.linkage != LinkageType::LoadInRuntime)
            .filter(|entry| {
                self.project
                    .find_configuration(&entry.module, &entry.configuration)
                    .is_some_and(|(_, target)| !target.skip_compile)
            })
            .map(|entry| ConfigurationId::new(&entry.module, &entry.configuration))
            .collect()
    }

    fn css_configuration(&self, owner: &BuildConfiguration, css: &Path) -> BuildConfiguration {
        let mut copy = detached_copy(owner);
        copy.output_type = OutputType::Application;
        copy.main_class = to_slash(css);
        copy.output_file_name = format!("{}.swf", name_without_extension(css));

        let root = self
            .project
            .source_root_for_file(css)
            .or_else(|| self.project.content_root_for_file(css));
        let relative = match (root, css.parent()) {
            (Some(root), Some(parent)) => relative_path_inside(root, parent),
            _ => None,
        };
        if let Some(relative) = relative.filter(|r| !r.is_empty()) {
            copy.output_folder = owner_output_folder(owner).join(relative);
        }
        copy
    }
}

fn rlm_configuration(owner: &BuildConfiguration, rlm: &RlmInfo) -> BuildConfiguration {
    let mut copy = detached_copy(owner);
    copy.output_type = OutputType::RuntimeLoadedModule;
    copy.optimize_for = if rlm.optimize { owner.name.clone() } else { String::new() };
    copy.main_class = rlm.main_class.clone();

    // the subdirectory always stays inside the owner's output folder
    let subdir = parent_path(&rlm.output_file).trim_start_matches(['/', '\\']);
    copy.output_file_name = file_name(&rlm.output_file).to_string();
    if !subdir.is_empty() {
        copy.output_folder = owner_output_folder(owner).join(subdir);
    }

    copy.compiler_options.additional_options =
        remove_options(&owner.compiler_options.additional_options, &["link-report"]);
    copy
}

/// Temporary copy with nothing that would expand again.
fn detached_copy(owner: &BuildConfiguration) -> BuildConfiguration {
    let mut copy = owner.temporary_copy_for_compilation();
    copy.use_html_wrapper = false;
    copy.rlms.clear();
    copy.css_files_to_compile.clear();
    copy.compiler_options.resource_files_mode = ResourceFilesMode::None;
    copy
}

fn owner_output_folder(owner: &BuildConfiguration) -> PathBuf {
    owner
        .actual_output_file_path()
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| owner.output_folder.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::configuration::TargetPlatform;
    use crate::core::DependencyEntry;
    use crate::test_support::ProjectFixture;
    use std::sync::Arc;

    fn expand(project: &Project, module: &str, bc: &str) -> Vec<CompilationTask> {
        let (module, bc) = project.find_configuration(module, bc).unwrap();
        TaskExpander::new(project).expand(&ResolvedTask::new(module.clone(), bc.clone()))
    }

    #[test]
    fn test_application_with_rlm() {
        let fixture = ProjectFixture::new();
        let app = BuildConfiguration::new("App", OutputType::Application)
            .with_main_class("Main")
            .with_output("/out", "app.swf")
            .with_dependency(DependencyEntry::configuration("lib", "Lib", LinkageType::Merged))
            .with_rlm(RlmInfo::new("rlm.Main", "mods/rlm.swf", false));
        let lib = BuildConfiguration::new("Lib", OutputType::Library).with_output("/out", "lib.swc");
        let project = fixture.project(vec![
            fixture.module("app").with_configuration(app),
            fixture.module("lib").with_configuration(lib),
        ]);

        let tasks = expand(&project, "app", "App");
        assert_eq!(tasks.len(), 2);

        assert_eq!(tasks[0].kind, TaskKind::Main);
        assert_eq!(tasks[0].output(), PathBuf::from("/out/app.swf"));
        assert_eq!(tasks[0].dependencies, vec![ConfigurationId::new("lib", "Lib")]);

        let rlm = &tasks[1];
        assert_eq!(rlm.kind, TaskKind::RuntimeLoadedModule);
        assert_eq!(rlm.output(), PathBuf::from("/out/mods/rlm.swf"));
        assert_eq!(rlm.task.configuration.main_class, "rlm.Main");
        assert_eq!(rlm.task.configuration.output_type, OutputType::RuntimeLoadedModule);
        assert!(!rlm.task.configuration.use_html_wrapper);
        assert!(rlm.task.configuration.rlms.is_empty());
        assert!(rlm.task.configuration.temporary);
        assert_eq!(rlm.dependencies, tasks[0].dependencies);

        // the shared configuration is untouched
        let (_, original) = project.find_configuration("app", "App").unwrap();
        assert_eq!(original.rlms.len(), 1);
        assert!(!original.temporary);
    }

    #[test]
    fn test_rlm_optimize_and_link_report() {
        let fixture = ProjectFixture::new();
        let mut app = BuildConfiguration::new("App", OutputType::Application)
            .with_output("/out", "app.swf")
            .with_rlm(RlmInfo::new("a.A", "a.swf", true))
            .with_rlm(RlmInfo::new("b.B", "b.swf", false));
        app.compiler_options.additional_options = "-link-report=/tmp/r.xml -debug=true".to_string();
        app.optimize_for = "Other".to_string();
        let project = fixture.project(vec![fixture.module("app").with_configuration(app)]);

        let tasks = expand(&project, "app", "App");
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[1].task.configuration.optimize_for, "App");
        assert_eq!(tasks[1].output(), PathBuf::from("/out/a.swf"));
        assert_eq!(tasks[1].task.configuration.compiler_options.additional_options, "-debug=true");
        assert_eq!(tasks[2].task.configuration.optimize_for, "");
        assert_eq!(tasks[2].task.configuration.main_class, "b.B");
    }

    #[test]
    fn test_rooted_rlm_path_stays_in_owner_folder() {
        let fixture = ProjectFixture::new();
        let app = BuildConfiguration::new("App", OutputType::Application)
            .with_output("/out", "app.swf")
            .with_rlm(RlmInfo::new("rlm.Main", "/mods/rlm.swf", false))
            .with_rlm(RlmInfo::new("top.Main", "/top.swf", false));
        let project = fixture.project(vec![fixture.module("app").with_configuration(app)]);

        let tasks = expand(&project, "app", "App");
        assert_eq!(tasks[1].output(), PathBuf::from("/out/mods/rlm.swf"));
        assert_eq!(tasks[2].output(), PathBuf::from("/out/top.swf"));
    }

    #[test]
    fn test_runtime_stylesheet() {
        let fixture = ProjectFixture::new();
        let css = fixture.file("app/src/styles/dark.css", "Button {}");
        let app = BuildConfiguration::new("App", OutputType::Application)
            .with_output(fixture.path("out"), "app.swf")
            .with_css(&css)
            .with_css(fixture.path("app/src/missing.css"));
        let project = fixture.project(vec![fixture.module("app").with_configuration(app)]);

        let tasks = expand(&project, "app", "App");
        assert_eq!(tasks.len(), 2);

        let task = &tasks[1];
        assert_eq!(task.kind, TaskKind::RuntimeStylesheet);
        assert_eq!(task.task.configuration.output_type, OutputType::Application);
        assert_eq!(task.task.configuration.main_class, to_slash(&css));
        assert_eq!(task.output(), fixture.path("out/styles/dark.swf"));
        assert!(task.task.configuration.css_files_to_compile.is_empty());
        assert_eq!(
            task.task.configuration.compiler_options.resource_files_mode,
            ResourceFilesMode::None
        );
    }

    #[test]
    fn test_stylesheet_at_source_root_keeps_folder() {
        let fixture = ProjectFixture::new();
        let css = fixture.file("app/src/main.css", "");
        let app = BuildConfiguration::new("App", OutputType::Application)
            .with_output(fixture.path("out"), "app.swf")
            .with_css(&css);
        let project = fixture.project(vec![fixture.module("app").with_configuration(app)]);

        let tasks = expand(&project, "app", "App");
        assert_eq!(tasks[1].output(), fixture.path("out/main.swf"));
    }

    #[test]
    fn test_stylesheet_from_another_module_keeps_folder() {
        let fixture = ProjectFixture::new();
        let css = fixture.file("theme/src/skins/blue.css", "Button {}");
        let app = BuildConfiguration::new("App", OutputType::Application)
            .with_output(fixture.path("out"), "app.swf")
            .with_css(&css);
        let project = fixture.project(vec![
            fixture.module("app").with_configuration(app),
            fixture.module("theme"),
        ]);

        let tasks = expand(&project, "app", "App");
        assert_eq!(tasks[1].output(), fixture.path("out/skins/blue.swf"));
    }

    #[test]
    fn test_mobile_and_library_do_not_expand() {
        let fixture = ProjectFixture::new();
        let mobile = BuildConfiguration::new("Mobile", OutputType::Application)
            .with_platform(TargetPlatform::Mobile)
            .with_rlm(RlmInfo::new("a.A", "a.swf", false));
        let lib = BuildConfiguration::new("Lib", OutputType::Library).with_rlm(RlmInfo::new("a.A", "a.swf", false));
        let project = fixture.project(vec![fixture
            .module("app")
            .with_configuration(mobile)
            .with_configuration(lib)]);

        assert_eq!(expand(&project, "app", "Mobile").len(), 1);
        assert_eq!(expand(&project, "app", "Lib").len(), 1);
    }

    #[test]
    fn test_dependencies_exclude_runtime_skipped_and_missing() {
        let fixture = ProjectFixture::new();
        let app = BuildConfiguration::new("App", OutputType::Application)
            .with_dependency(DependencyEntry::configuration("app", "Lib", LinkageType::External))
            .with_dependency(DependencyEntry::configuration("app", "Module", LinkageType::LoadInRuntime))
            .with_dependency(DependencyEntry::configuration("app", "Skipped", LinkageType::Merged))
            .with_dependency(DependencyEntry::configuration("gone", "Lib", LinkageType::Merged));
        let project = fixture.project(vec![fixture
            .module("app")
            .with_configuration(app)
            .with_configuration(BuildConfiguration::new("Lib", OutputType::Library))
            .with_configuration(BuildConfiguration::new("Module", OutputType::RuntimeLoadedModule))
            .with_configuration(BuildConfiguration::new("Skipped", OutputType::Library).skipped())]);

        let tasks = expand(&project, "app", "App");
        assert_eq!(tasks[0].dependencies, vec![ConfigurationId::new("app", "Lib")]);
    }

    #[test]
    fn test_expand_all_keeps_order() {
        let fixture = ProjectFixture::new();
        let project = fixture.project(vec![fixture
            .module("m")
            .with_configuration(
                BuildConfiguration::new("A", OutputType::Application).with_rlm(RlmInfo::new("r.R", "r.swf", false)),
            )
            .with_configuration(BuildConfiguration::new("B", OutputType::Library))]);
        let module = project.module("m").unwrap().clone();
        let resolved: Vec<ResolvedTask> = module
            .configurations()
            .iter()
            .map(|bc| ResolvedTask::new(Arc::clone(&module), bc.clone()))
            .collect();

        let kinds: Vec<(String, TaskKind)> = TaskExpander::new(&project)
            .expand_all(&resolved)
            .iter()
            .map(|t| (t.task.configuration.name.clone(), t.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("A".to_string(), TaskKind::Main),
                ("A".to_string(), TaskKind::RuntimeLoadedModule),
                ("B".to_string(), TaskKind::Main),
            ]
        );
    }
}
