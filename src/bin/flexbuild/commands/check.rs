//! `flexbuild check` command

use anyhow::Result;

use crate::cli::CheckArgs;
use crate::commands::{load_workspace, report_failure, scope_and_options};
use flexbuild::ops::check;
use flexbuild::util::diagnostic::emit;
use flexbuild::util::GlobalContext;

pub fn execute(args: CheckArgs, ctx: &GlobalContext) -> Result<()> {
    let ws = load_workspace(ctx)?;
    let (scope, mut opts) = scope_and_options(&ws, &args.scope)?;
    opts.check_packaging = args.packaging;
    if args.dependency_types {
        opts.policy.check_dependency_types = true;
    }

    let warnings = check(ws.project(), &scope, &opts).map_err(|e| report_failure(e, ctx.color()))?;
    for warning in &warnings {
        emit(&warning.to_diagnostic(), ctx.color());
    }

    eprintln!(
        "    Finished checking `{}`, {} warning(s)",
        ws.project().name(),
        warnings.len()
    );
    Ok(())
}
