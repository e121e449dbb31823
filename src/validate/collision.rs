//! Detection of tasks that would write the same output file.

use std::collections::HashMap;

use crate::resolver::ResolvedTask;
use crate::util::fs::{case_aware_key, is_file_system_case_sensitive};
use crate::validate::problem::{ConfigurationProblem, GeneralField, Problem};

/// Reports every task whose output path was already claimed by an earlier task.
#[derive(Debug, Clone, Copy)]
pub struct OutputCollisionChecker {
    case_sensitive: bool,
}

impl Default for OutputCollisionChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputCollisionChecker {
    /// Compare paths the way the host filesystem does.
    pub fn new() -> Self {
        Self::with_case_sensitivity(is_file_system_case_sensitive())
    }

    pub fn with_case_sensitivity(case_sensitive: bool) -> Self {
        OutputCollisionChecker { case_sensitive }
    }

    /// Check `tasks` in order; the first claimant of a path is never reported.
    pub fn check<'t>(&self, tasks: impl IntoIterator<Item = &'t ResolvedTask>) -> Vec<ConfigurationProblem> {
        let mut claimed: HashMap<String, &ResolvedTask> = HashMap::new();
        let mut problems = Vec::new();

        for task in tasks {
            let output = task.configuration.actual_output_file_path();
            let key = case_aware_key(&output, self.case_sensitive);

            if let Some(first) = claimed.get(&key) {
                let message = format!(
                    "Build configuration `{}` of module `{}` has the same output file {}",
                    first.configuration.name,
                    first.module.name(),
                    output.display()
                );
                problems.push(ConfigurationProblem::new(
                    task.id(),
                    Problem::general(&task.configuration.name, message, "same.output.files", GeneralField::OutputFileName),
                ));
            } else {
                claimed.insert(key, task);
            }
        }

        problems
    }
}
