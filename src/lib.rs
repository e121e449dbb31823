//! flexbuild - build configuration resolver and compiler driver for Flex projects
//!
//! This crate provides the core library functionality for flexbuild:
//! resolving what to compile, validating build configurations, expanding
//! them into compiler tasks and dispatching those tasks.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;
pub mod validate;

/// Test utilities for flexbuild unit tests.
///
/// Only available when compiling tests. Provides on-disk project fixtures
/// and a recording task runner.
#[cfg(test)]
pub mod test_support;

pub use core::{BuildConfiguration, Manifest, Module, Project, Workspace};
pub use resolver::{CompileScope, ConfigurationError, ResolvedTask};
pub use util::context::GlobalContext;
