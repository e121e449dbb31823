//! Command implementations

pub mod build;
pub mod check;
pub mod completions;
pub mod init;
pub mod tree;

use anyhow::{anyhow, Context, Result};

use crate::cli::ScopeArgs;
use flexbuild::builder::DispatchError;
use flexbuild::core::Workspace;
use flexbuild::ops::{ValidateOptions, ValidationFailed};
use flexbuild::resolver::{CompileScope, ConfigurationError};
use flexbuild::util::diagnostic::{emit, suggestions};
use flexbuild::util::GlobalContext;

/// Find and load the workspace for the current directory.
pub fn load_workspace(ctx: &GlobalContext) -> Result<Workspace> {
    let manifest_path = ctx
        .find_manifest()
        .map_err(|e| anyhow!("{}\n{}", e, suggestions::NO_MANIFEST))?;
    Workspace::new(&manifest_path, ctx)
        .with_context(|| format!("failed to load {}", manifest_path.display()))
}

/// Build the compile scope and validation settings from the command line.
pub fn scope_and_options(ws: &Workspace, args: &ScopeArgs) -> Result<(CompileScope, ValidateOptions)> {
    let config = ws.config();
    let mut params = config.packaging_parameters();
    if let Some(android) = args.android_package {
        params.android_package_type = android;
    }
    if let Some(ios) = args.ios_package {
        params.ios_package_type = ios;
    }

    let scope = if let Some(run) = &args.run {
        let mut target = run.clone();
        target.mobile_run_target = args.mobile;
        CompileScope::RunTarget(target)
    } else if !args.config.is_empty() {
        CompileScope::explicit_from_targets(ws.project(), &args.config)?
    } else {
        CompileScope::Modules(args.module.clone())
    };

    let opts = ValidateOptions {
        params,
        policy: config.validation_policy(),
        check_packaging: false,
    };
    Ok((scope, opts))
}

/// Render known failures as diagnostics; the returned error is the summary line.
pub fn report_failure(err: anyhow::Error, color: bool) -> anyhow::Error {
    if let Some(failed) = err.downcast_ref::<ValidationFailed>() {
        for problem in &failed.problems {
            emit(&problem.to_diagnostic(), color);
        }
        return anyhow!("{}\n{}", failed, suggestions::FIX_CONFIGURATION);
    }
    if let Some(structural) = err.downcast_ref::<ConfigurationError>() {
        emit(&structural.to_diagnostic(), color);
        return anyhow!("could not resolve the build request");
    }
    if let Some(dispatch) = err.downcast_ref::<DispatchError>() {
        return anyhow!("{}\n{}", dispatch, suggestions::BUILD_FAILED);
    }
    err
}
