//! High-level operations.
//!
//! This module contains the implementation of flexbuild commands.

pub mod flexbuild_build;
pub mod flexbuild_check;
pub mod flexbuild_init;

pub use flexbuild_build::{build, plan, BuildOptions};
pub use flexbuild_check::{check, validate_request, ValidateOptions, ValidationFailed};
pub use flexbuild_init::init_project;
