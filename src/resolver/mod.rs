//! Configuration resolution.
//!
//! Turns a compilation request into the deduplicated, transitively closed set
//! of (module, configuration) pairs to build. Resolution is pure: it only
//! reads the project model and never touches the filesystem.

pub mod closure;
pub mod errors;
pub mod scope;
pub mod task;

pub use closure::DependencyClosure;
pub use errors::ConfigurationError;
pub use scope::{CompileScope, MobileRunTarget, RunTarget, ScopeResolver};
pub use task::{ResolvedTask, TaskSet};
