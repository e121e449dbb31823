//! Compilation of resolved configurations.
//!
//! Expands validated configurations into compilation tasks, orders them by
//! their link dependencies and runs them through the SDK compilers.

pub mod dispatch;
pub mod executor;
pub mod expand;
pub mod mxmlc;
pub mod plan;

pub use dispatch::{DispatchError, DispatchReport, Dispatcher, TaskReport, TaskRunner, TaskStatus};
pub use executor::BuildExecutor;
pub use expand::TaskExpander;
pub use mxmlc::{DryRunRunner, MxmlcCompcRunner};
pub use plan::{BuildMessage, BuildPlan, CompilationTask, MessageCategory, TaskKind};
