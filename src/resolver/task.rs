//! Resolved (module, configuration) pairs and deduplicating sets of them.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::core::{BuildConfiguration, ConfigurationId, Module};

/// A module paired with the configuration to compile.
///
/// The configuration may be the shared original or a derived copy (forced
/// debug flag, RLM or stylesheet task). Equality and hashing only look at the
/// module name and configuration name.
#[derive(Debug, Clone)]
pub struct ResolvedTask {
    pub module: Arc<Module>,
    pub configuration: Arc<BuildConfiguration>,
}

impl ResolvedTask {
    pub fn new(module: Arc<Module>, configuration: Arc<BuildConfiguration>) -> Self {
        ResolvedTask {
            module,
            configuration,
        }
    }

    /// Pair a module with a derived configuration copy.
    pub fn derived(module: Arc<Module>, configuration: BuildConfiguration) -> Self {
        Self::new(module, Arc::new(configuration))
    }

    pub fn id(&self) -> ConfigurationId {
        ConfigurationId::new(self.module.name(), &self.configuration.name)
    }
}

impl PartialEq for ResolvedTask {
    fn eq(&self, other: &Self) -> bool {
        self.module.name() == other.module.name() && self.configuration.name == other.configuration.name
    }
}

impl Eq for ResolvedTask {}

impl Hash for ResolvedTask {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.module.name().hash(state);
        self.configuration.name.hash(state);
    }
}

impl fmt::Display for ResolvedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A deduplicated set of resolved tasks, iterated by module then configuration name.
///
/// The first task inserted for an identity wins; later inserts are ignored.
#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: BTreeMap<ConfigurationId, ResolvedTask>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task; returns `false` if its identity was already present.
    pub fn insert(&mut self, task: ResolvedTask) -> bool {
        use std::collections::btree_map::Entry;
        match self.tasks.entry(task.id()) {
            Entry::Vacant(slot) => {
                slot.insert(task);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn contains(&self, id: &ConfigurationId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn get(&self, id: &ConfigurationId) -> Option<&ResolvedTask> {
        self.tasks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedTask> {
        self.tasks.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ConfigurationId> {
        self.tasks.keys()
    }
}

impl IntoIterator for TaskSet {
    type Item = ResolvedTask;
    type IntoIter = std::collections::btree_map::IntoValues<ConfigurationId, ResolvedTask>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_values()
    }
}

impl FromIterator<ResolvedTask> for TaskSet {
    fn from_iter<I: IntoIterator<Item = ResolvedTask>>(iter: I) -> Self {
        let mut set = TaskSet::new();
        for task in iter {
            set.insert(task);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OutputType;

    #[test]
    fn test_first_insert_wins() {
        let module = Arc::new(Module::new("app"));
        let original = BuildConfiguration::new("Web", OutputType::Application);
        let forced = original.with_forced_debug(false);

        let mut set = TaskSet::new();
        assert!(set.insert(ResolvedTask::derived(module.clone(), forced)));
        assert!(!set.insert(ResolvedTask::derived(module.clone(), original)));
        assert_eq!(set.len(), 1);

        let kept = set.get(&ConfigurationId::new("app", "Web")).unwrap();
        assert_eq!(kept.configuration.compiler_options.additional_options, "-debug=false");
    }

    #[test]
    fn test_iteration_is_sorted() {
        let a = Arc::new(Module::new("a"));
        let b = Arc::new(Module::new("b"));
        let set: TaskSet = vec![
            ResolvedTask::derived(b, BuildConfiguration::new("X", OutputType::Library)),
            ResolvedTask::derived(a.clone(), BuildConfiguration::new("Z", OutputType::Library)),
            ResolvedTask::derived(a, BuildConfiguration::new("Y", OutputType::Library)),
        ]
        .into_iter()
        .collect();

        let ids: Vec<String> = set.iter().map(|t| format!("{}:{}", t.module.name(), t.configuration.name)).collect();
        assert_eq!(ids, vec!["a:Y", "a:Z", "b:X"]);
    }
}
