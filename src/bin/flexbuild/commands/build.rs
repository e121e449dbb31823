//! `flexbuild build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::{load_workspace, report_failure, scope_and_options};
use flexbuild::builder::{DryRunRunner, MxmlcCompcRunner, TaskRunner, TaskStatus};
use flexbuild::ops::{build, plan, BuildOptions};
use flexbuild::util::GlobalContext;

pub fn execute(args: BuildArgs, ctx: &GlobalContext) -> Result<()> {
    let ws = load_workspace(ctx)?;
    let (scope, validate) = scope_and_options(&ws, &args.scope)?;

    // Jobs: CLI > config
    let mut opts = BuildOptions::from_config(ws.config());
    opts.validate = validate;
    opts.verbose = ctx.is_verbose();
    if let Some(jobs) = args.jobs {
        opts.jobs = jobs.max(1);
    }

    if args.plan {
        let plan = plan(ws.project(), &scope, &opts).map_err(|e| report_failure(e, ctx.color()))?;
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    let dry_run = DryRunRunner::new(ws.project());
    let compiler = MxmlcCompcRunner::new(ws.project());
    let runner: &dyn TaskRunner = if args.dry_run { &dry_run } else { &compiler };

    let (plan, report) = build(ws.project(), &scope, &opts, runner).map_err(|e| report_failure(e, ctx.color()))?;

    if plan.is_empty() {
        eprintln!("    Nothing to compile");
    } else if args.dry_run {
        for command in dry_run.commands() {
            println!("{}", command);
        }
    } else if ctx.is_verbose() {
        for task in report.tasks.iter().filter(|t| t.status == TaskStatus::Succeeded) {
            eprintln!("    Compiled {} ({})", task.id, task.kind);
        }
    }
    Ok(())
}
