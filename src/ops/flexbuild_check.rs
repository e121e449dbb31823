//! Implementation of `flexbuild check`: whole-request validation.

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::builder::TaskExpander;
use crate::core::packaging::{PackagingOptions, PackagingParameters};
use crate::core::{BuildConfiguration, Module, OutputType, Project};
use crate::resolver::{CompileScope, ConfigurationError, MobileRunTarget, ResolvedTask, ScopeResolver};
use crate::validate::{
    validate_packaging, ConfigurationProblem, ConfigurationValidator, OutputCollisionChecker, Problem,
    ValidationPolicy,
};

/// Settings that shape validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    pub params: PackagingParameters,
    pub policy: ValidationPolicy,
    /// Also validate the packaging options of every application
    pub check_packaging: bool,
}

/// The request has problems that block compilation.
#[derive(Debug, Error, miette::Diagnostic)]
#[error("{errors} problem(s) found in build configurations")]
#[diagnostic(code(flexbuild::validate::failed), help("fix the reported settings and build again"))]
pub struct ValidationFailed {
    errors: usize,
    /// Every problem found, warnings included
    pub problems: Vec<ConfigurationProblem>,
}

impl ValidationFailed {
    pub fn new(problems: Vec<ConfigurationProblem>) -> Self {
        let errors = problems.iter().filter(|p| p.problem.is_error()).count();
        ValidationFailed { errors, problems }
    }
}

/// Resolve `scope` and report every problem of the configurations it covers.
///
/// Problems come per configuration in resolution order, followed by output
/// collisions between the expanded compilation tasks.
pub fn validate_request(
    project: &Project,
    scope: &CompileScope,
    opts: &ValidateOptions,
) -> Result<Vec<ConfigurationProblem>, ConfigurationError> {
    let tasks: Vec<ResolvedTask> = ScopeResolver::new(project, opts.params).resolve(scope)?.into_iter().collect();
    debug!("validating {} configuration(s)", tasks.len());

    let validator = ConfigurationValidator::new(project, opts.policy);
    let mut problems: Vec<ConfigurationProblem> = tasks
        .par_iter()
        .map(|task| {
            let mut found = Vec::new();
            let mut emit = |problem: Problem| found.push(ConfigurationProblem::new(task.id(), problem));
            validator.validate(&task.module, &task.configuration, opts.check_packaging, &mut emit);
            if runs_on_android_device(scope, &task.module, &task.configuration, opts.check_packaging) {
                validate_packaging(PackagingOptions::Android(&task.configuration.android), &mut emit);
            }
            found
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    let expanded = TaskExpander::new(project).expand_all(&tasks);
    problems.extend(OutputCollisionChecker::new().check(expanded.iter().map(|t| &t.task)));

    Ok(problems)
}

/// Like [`validate_request`], failing when any problem is an error.
pub fn check(project: &Project, scope: &CompileScope, opts: &ValidateOptions) -> anyhow::Result<Vec<ConfigurationProblem>> {
    let problems = validate_request(project, scope, opts)?;
    if problems.iter().any(|p| p.problem.is_error()) {
        return Err(ValidationFailed::new(problems).into());
    }
    Ok(problems)
}

/// A mobile application launched on an Android device needs valid Android
/// packaging even when packaging is not otherwise checked.
fn runs_on_android_device(scope: &CompileScope, module: &Module, bc: &BuildConfiguration, check_packaging: bool) -> bool {
    let Some(target) = scope.run_target() else {
        return false;
    };
    let already_checked = check_packaging && bc.android.enabled;
    bc.output_type == OutputType::Application
        && bc.nature().is_mobile_platform()
        && target.module == module.name()
        && target.configuration == bc.name
        && target.mobile_run_target == Some(MobileRunTarget::AndroidDevice)
        && !already_checked
}
