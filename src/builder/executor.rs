//! Build executor with progress reporting.

use std::time::Instant;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::dispatch::{DispatchError, DispatchReport, Dispatcher, TaskRunner, TaskStatus};
use crate::builder::plan::{BuildPlan, CompilationTask};

/// Runs a build plan through a [`Dispatcher`] and reports progress.
pub struct BuildExecutor<'a> {
    dispatcher: Dispatcher,
    runner: &'a dyn TaskRunner,
    verbose: bool,
}

impl<'a> BuildExecutor<'a> {
    pub fn new(dispatcher: Dispatcher, runner: &'a dyn TaskRunner) -> Self {
        BuildExecutor {
            dispatcher,
            runner,
            verbose: false,
        }
    }

    /// Enable verbose output. Verbose runs log each task instead of drawing a bar.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Execute every task of `plan`.
    pub fn execute(&self, plan: &BuildPlan) -> Result<DispatchReport, DispatchError> {
        let start = Instant::now();

        if self.verbose {
            eprintln!(
                "   Compiling {} task(s), {} at a time",
                plan.len(),
                self.dispatcher.jobs()
            );
        }

        let bar = if !self.verbose && plan.len() > 1 {
            let bar = ProgressBar::new(plan.len() as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            bar.set_style(style);
            Some(bar)
        } else {
            None
        };

        let runner = ProgressRunner {
            inner: self.runner,
            bar: bar.as_ref(),
        };
        let report = self.dispatcher.run(&plan.tasks, &runner)?;

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        eprintln!(
            "    Finished {} of {} task(s) in {:.2}s",
            report.count(TaskStatus::Succeeded),
            plan.len(),
            start.elapsed().as_secs_f64()
        );

        report.into_result()
    }
}

/// Advances a progress bar around another runner.
struct ProgressRunner<'r> {
    inner: &'r dyn TaskRunner,
    bar: Option<&'r ProgressBar>,
}

impl TaskRunner for ProgressRunner<'_> {
    fn run(&self, task: &CompilationTask) -> Result<()> {
        if let Some(bar) = self.bar {
            bar.set_message(task.to_string());
        }
        let result = self.inner.run(task);
        if let Some(bar) = self.bar {
            bar.inc(1);
        }
        result
    }
}
