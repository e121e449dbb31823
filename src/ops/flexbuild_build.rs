//! Implementation of `flexbuild build`.

use std::collections::BTreeSet;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::builder::{
    BuildExecutor, BuildMessage, BuildPlan, DispatchReport, Dispatcher, MessageCategory, TaskExpander,
    TaskRunner,
};
use crate::core::Project;
use crate::ops::flexbuild_check::{ValidateOptions, ValidationFailed};
use crate::resolver::{CompileScope, ResolvedTask, ScopeResolver};
use crate::util::Config;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub validate: ValidateOptions,

    /// Maximum number of compilations running at once
    pub jobs: usize,

    /// Prefer the built-in compiler shell when every task uses one SDK
    pub use_built_in_compiler: bool,

    /// Compile with FCSH (not supported)
    pub use_fcsh: bool,

    /// Verbose output
    pub verbose: bool,
}

impl BuildOptions {
    /// Options taken from the merged tool configuration.
    pub fn from_config(config: &Config) -> Self {
        BuildOptions {
            validate: ValidateOptions {
                params: config.packaging_parameters(),
                policy: config.validation_policy(),
                check_packaging: false,
            },
            jobs: config.max_parallel_compilations(),
            use_built_in_compiler: config.compiler.use_built_in_compiler,
            use_fcsh: config.compiler.use_fcsh,
            verbose: false,
        }
    }
}

/// Validate `scope` and turn it into a build plan.
///
/// Any error-severity problem fails the whole request with
/// [`ValidationFailed`]; nothing is planned for the configurations that
/// passed.
pub fn plan(project: &Project, scope: &CompileScope, opts: &BuildOptions) -> Result<BuildPlan> {
    let problems = crate::ops::flexbuild_check::validate_request(project, scope, &opts.validate)?;
    if problems.iter().any(|p| p.problem.is_error()) {
        return Err(ValidationFailed::new(problems).into());
    }

    let mut plan = BuildPlan::default();
    for warning in &problems {
        plan.messages
            .push(BuildMessage::warning(format!("{} in {}", warning.problem, warning.id)));
    }

    if opts.use_fcsh {
        plan.messages.push(BuildMessage::information(
            "FCSH tool is not supported yet. Please choose another compiler in the compiler settings",
        ));
        plan.messages.iter().for_each(log_message);
        return Ok(plan);
    }

    let resolved: Vec<ResolvedTask> = ScopeResolver::new(project, opts.validate.params)
        .resolve(scope)?
        .into_iter()
        .collect();
    plan.tasks = TaskExpander::new(project).expand_all(&resolved);

    let jobs = opts.jobs.max(1);
    if opts.use_built_in_compiler {
        let sdks: BTreeSet<Option<&str>> = plan
            .tasks
            .iter()
            .map(|t| t.task.configuration.sdk.as_deref())
            .collect();
        if sdks.len() <= 1 {
            plan.messages.push(BuildMessage::information(format!(
                "Using built-in compiler shell, max parallel compilations: {}",
                jobs
            )));
        } else {
            plan.messages.push(BuildMessage::information(
                "Can not use built-in compiler shell because build configurations use different SDKs, using mxmlc/compc instead",
            ));
            plan.messages.push(BuildMessage::information(format!(
                "Using mxmlc/compc, max parallel compilations: {}",
                jobs
            )));
        }
    } else {
        plan.messages.push(BuildMessage::information(format!(
            "Using mxmlc/compc, max parallel compilations: {}",
            jobs
        )));
    }

    for message in &plan.messages {
        log_message(message);
    }
    Ok(plan)
}

fn log_message(message: &BuildMessage) {
    match message.category {
        MessageCategory::Information => info!("{}", message.text),
        MessageCategory::Warning => warn!("{}", message.text),
        MessageCategory::Error => error!("{}", message.text),
    }
}

/// Plan and compile `scope` with `runner`.
pub fn build(
    project: &Project,
    scope: &CompileScope,
    opts: &BuildOptions,
    runner: &dyn TaskRunner,
) -> Result<(BuildPlan, DispatchReport)> {
    let plan = plan(project, scope, opts)?;
    if plan.is_empty() {
        return Ok((plan, DispatchReport::default()));
    }

    let report = BuildExecutor::new(Dispatcher::new(opts.jobs), runner)
        .verbose(opts.verbose)
        .execute(&plan)?;
    Ok((plan, report))
}
