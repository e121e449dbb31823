//! Transitive closure over configuration-to-configuration dependencies.

use tracing::debug;

use crate::core::Project;
use crate::resolver::errors::ConfigurationError;
use crate::resolver::task::{ResolvedTask, TaskSet};

/// Computes the configurations reachable from an initial set.
#[derive(Debug, Clone, Copy)]
pub struct DependencyClosure<'a> {
    project: &'a Project,
}

impl<'a> DependencyClosure<'a> {
    pub fn new(project: &'a Project) -> Self {
        DependencyClosure { project }
    }

    /// Expand `initial` with every configuration it depends on, transitively.
    ///
    /// Skip-compile dependencies are left out. A configuration reference that
    /// names a missing module or configuration fails the whole expansion.
    /// Tasks already in the set are kept as they are, so derived copies in
    /// `initial` win over the shared originals reached through dependencies.
    pub fn expand(&self, initial: TaskSet) -> Result<TaskSet, ConfigurationError> {
        let mut result = initial;
        let roots: Vec<ResolvedTask> = result.iter().cloned().collect();
        for root in &roots {
            self.append_dependencies(&mut result, root)?;
        }
        Ok(result)
    }

    /// Add the dependencies of `task` to `set`, descending only into newly added ones.
    pub fn append_dependencies(&self, set: &mut TaskSet, task: &ResolvedTask) -> Result<(), ConfigurationError> {
        let mut stack = vec![task.clone()];

        while let Some(current) = stack.pop() {
            for entry in current
                .configuration
                .dependencies
                .iter()
                .filter_map(|e| e.as_configuration())
            {
                let (module, bc) = self
                    .project
                    .find_configuration(&entry.module, &entry.configuration)
                    .ok_or_else(|| ConfigurationError::MissingDependency {
                        module: entry.module.clone(),
                        configuration: entry.configuration.clone(),
                        dependent: current.id(),
                    })?;

                if bc.skip_compile {
                    continue;
                }

                let dependency = ResolvedTask::new(module.clone(), bc.clone());
                if set.insert(dependency.clone()) {
                    debug!("{} pulls in {}", current, dependency);
                    stack.push(dependency);
                }
            }
        }

        Ok(())
    }
}
