//! Mapping a compilation request onto the configurations to build.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::core::module::ModuleType;
use crate::core::packaging::{AndroidPackageType, IosPackageType, PackagingParameters};
use crate::core::{BuildConfiguration, OutputType, Project, TargetPlatform};
use crate::resolver::closure::DependencyClosure;
use crate::resolver::errors::ConfigurationError;
use crate::resolver::task::{ResolvedTask, TaskSet};

/// Where a mobile application is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MobileRunTarget {
    Emulator,
    AndroidDevice,
    IosSimulator,
    IosDevice,
}

impl FromStr for MobileRunTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emulator" => Ok(MobileRunTarget::Emulator),
            "android-device" => Ok(MobileRunTarget::AndroidDevice),
            "ios-simulator" => Ok(MobileRunTarget::IosSimulator),
            "ios-device" => Ok(MobileRunTarget::IosDevice),
            other => Err(format!(
                "unknown mobile run target `{}` (expected emulator, android-device, ios-simulator or ios-device)",
                other
            )),
        }
    }
}

/// A run configuration's target: one module and one of its configurations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTarget {
    pub module: String,
    pub configuration: String,
    pub mobile_run_target: Option<MobileRunTarget>,
}

impl RunTarget {
    pub fn new(module: impl Into<String>, configuration: impl Into<String>) -> Self {
        RunTarget {
            module: module.into(),
            configuration: configuration.into(),
            mobile_run_target: None,
        }
    }

    pub fn on_mobile(mut self, target: MobileRunTarget) -> Self {
        self.mobile_run_target = Some(target);
        self
    }

    fn error(&self, reason: impl Into<String>) -> ConfigurationError {
        ConfigurationError::RunTarget {
            module: self.module.clone(),
            configuration: self.configuration.clone(),
            reason: reason.into(),
        }
    }
}

impl FromStr for RunTarget {
    type Err = String;

    /// Parse `MODULE:CONFIGURATION`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((module, configuration)) if !module.is_empty() && !configuration.is_empty() => {
                Ok(RunTarget::new(module, configuration))
            }
            _ => Err(format!("expected MODULE:CONFIGURATION, got `{}`", s)),
        }
    }
}

impl fmt::Display for RunTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.configuration)
    }
}

/// A compilation request.
#[derive(Debug, Clone)]
pub enum CompileScope {
    /// Pre-selected configurations; each gets the forced debug flag.
    Explicit(Vec<ResolvedTask>),
    /// A single run target and what it depends on.
    RunTarget(RunTarget),
    /// Every configuration of the named Flex modules; all modules when empty.
    Modules(Vec<String>),
}

impl CompileScope {
    /// The whole project.
    pub fn whole_project() -> Self {
        CompileScope::Modules(Vec::new())
    }

    /// Explicit scope from `MODULE:CONFIGURATION` pairs.
    pub fn explicit_from_targets(project: &Project, targets: &[RunTarget]) -> Result<Self, ConfigurationError> {
        let mut tasks = Vec::with_capacity(targets.len());
        for target in targets {
            let (module, bc) = project
                .find_configuration(&target.module, &target.configuration)
                .ok_or_else(|| target.error("build configuration not found"))?;
            tasks.push(ResolvedTask::new(module.clone(), bc.clone()));
        }
        Ok(CompileScope::Explicit(tasks))
    }

    /// The run target, if the request is anchored to one.
    pub fn run_target(&self) -> Option<&RunTarget> {
        match self {
            CompileScope::RunTarget(target) => Some(target),
            _ => None,
        }
    }
}

/// Resolves a [`CompileScope`] into the set of configurations to build.
#[derive(Debug, Clone, Copy)]
pub struct ScopeResolver<'a> {
    project: &'a Project,
    params: PackagingParameters,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(project: &'a Project, params: PackagingParameters) -> Self {
        ScopeResolver { project, params }
    }

    /// Resolve `scope`. Skip-compile configurations never appear in the result.
    pub fn resolve(&self, scope: &CompileScope) -> Result<TaskSet, ConfigurationError> {
        let closure = DependencyClosure::new(self.project);

        match scope {
            CompileScope::Explicit(tasks) => {
                let mut set = TaskSet::new();
                for task in tasks.iter().filter(|t| !t.configuration.skip_compile) {
                    let debug = self.forced_debug(&task.configuration);
                    let forced = task.configuration.with_forced_debug(debug);
                    set.insert(ResolvedTask::derived(task.module.clone(), forced));
                }
                closure.expand(set)
            }

            CompileScope::RunTarget(target) => {
                let module = self
                    .project
                    .module(&target.module)
                    .ok_or_else(|| target.error("module not found"))?;
                if module.module_type() != ModuleType::Flex {
                    return Err(target.error("module is not a Flex module"));
                }
                let bc = module
                    .configuration(&target.configuration)
                    .ok_or_else(|| target.error("build configuration not found"))?;

                let mut set = TaskSet::new();
                if bc.skip_compile {
                    debug!("run target {} is skip-compile, nothing to build", target);
                    return Ok(set);
                }
                set.insert(ResolvedTask::new(module.clone(), bc.clone()));
                closure.expand(set)
            }

            CompileScope::Modules(names) => {
                let modules = if names.is_empty() {
                    self.project.modules().to_vec()
                } else {
                    names
                        .iter()
                        .map(|name| {
                            self.project
                                .module(name)
                                .cloned()
                                .ok_or_else(|| ConfigurationError::UnknownModule { module: name.clone() })
                        })
                        .collect::<Result<Vec<_>, _>>()?
                };

                let mut set = TaskSet::new();
                for module in modules.iter().filter(|m| m.module_type() == ModuleType::Flex) {
                    for bc in module.configurations().iter().filter(|bc| !bc.skip_compile) {
                        set.insert(ResolvedTask::new(module.clone(), bc.clone()));
                    }
                }

                // A subset of modules may depend on configurations outside it.
                if names.is_empty() {
                    Ok(set)
                } else {
                    closure.expand(set)
                }
            }
        }
    }

    /// Debug flag forced onto an explicitly selected configuration.
    ///
    /// Mobile applications follow the packaging type chosen for the next
    /// package: Android when Android packaging is enabled, iOS otherwise.
    /// Everything else compiles without debug information.
    pub fn forced_debug(&self, bc: &BuildConfiguration) -> bool {
        if bc.target_platform != TargetPlatform::Mobile || bc.output_type != OutputType::Application {
            return false;
        }
        if bc.android.enabled {
            self.params.android_package_type != AndroidPackageType::Release
        } else {
            self.params.ios_package_type == IosPackageType::DebugOverNetwork
        }
    }
}
