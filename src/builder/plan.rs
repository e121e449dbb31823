//! Build plan: the ordered compilation tasks handed to the dispatcher.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::{ConfigurationId, OutputType};
use crate::resolver::ResolvedTask;

/// What a compilation task produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    /// The configuration's own output
    Main,
    /// A runtime-loaded module declared by an application
    RuntimeLoadedModule,
    /// A stylesheet compiled into its own SWF
    RuntimeStylesheet,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskKind::Main => "main",
            TaskKind::RuntimeLoadedModule => "rlm",
            TaskKind::RuntimeStylesheet => "css",
        };
        write!(f, "{}", s)
    }
}

/// One compiler invocation.
///
/// RLM and stylesheet tasks keep the owning configuration's name, so several
/// tasks may share an [`ConfigurationId`]. Only `Main` tasks satisfy
/// dependencies of other tasks.
#[derive(Debug, Clone)]
pub struct CompilationTask {
    pub task: ResolvedTask,
    pub kind: TaskKind,
    /// Configurations this task links against (never LoadInRuntime)
    pub dependencies: Vec<ConfigurationId>,
}

impl CompilationTask {
    pub fn new(task: ResolvedTask, kind: TaskKind, dependencies: Vec<ConfigurationId>) -> Self {
        CompilationTask {
            task,
            kind,
            dependencies,
        }
    }

    pub fn id(&self) -> ConfigurationId {
        self.task.id()
    }

    /// Path of the file this task writes.
    pub fn output(&self) -> PathBuf {
        self.task.configuration.actual_output_file_path()
    }
}

impl fmt::Display for CompilationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TaskKind::Main => write!(f, "{}", self.id()),
            kind => write!(f, "{} [{}: {}]", self.id(), kind, self.task.configuration.main_class),
        }
    }
}

/// Severity of a build-log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    Information,
    Warning,
    Error,
}

/// A message for the build log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMessage {
    pub category: MessageCategory,
    pub text: String,
}

impl BuildMessage {
    pub fn information(text: impl Into<String>) -> Self {
        BuildMessage {
            category: MessageCategory::Information,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        BuildMessage {
            category: MessageCategory::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        BuildMessage {
            category: MessageCategory::Error,
            text: text.into(),
        }
    }
}

/// Everything a build pass will do, in dispatch order.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    pub tasks: Vec<CompilationTask>,
    pub messages: Vec<BuildMessage>,
}

/// JSON view of a task for `--plan`.
#[derive(Serialize)]
struct PlannedTask<'a> {
    module: &'a str,
    configuration: &'a str,
    kind: TaskKind,
    output_type: OutputType,
    main_class: &'a str,
    output: PathBuf,
    dependencies: &'a [ConfigurationId],
}

#[derive(Serialize)]
struct PlanView<'a> {
    tasks: Vec<PlannedTask<'a>>,
    messages: &'a [BuildMessage],
}

impl BuildPlan {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Serialize the plan as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let view = PlanView {
            tasks: self
                .tasks
                .iter()
                .map(|t| PlannedTask {
                    module: t.task.module.name(),
                    configuration: &t.task.configuration.name,
                    kind: t.kind,
                    output_type: t.task.configuration.output_type,
                    main_class: &t.task.configuration.main_class,
                    output: t.output(),
                    dependencies: &t.dependencies,
                })
                .collect(),
            messages: &self.messages,
        };
        serde_json::to_string_pretty(&view).context("failed to serialize build plan")
    }
}
