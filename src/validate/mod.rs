//! Validation of build configurations.
//!
//! Validators never fail: they report [`Problem`]s and leave the decision to
//! the caller. Structural errors live in [`crate::resolver::ConfigurationError`].

pub mod collision;
pub mod config_file;
pub mod linkage;
pub mod packaging;
pub mod problem;
pub mod validator;

pub use collision::OutputCollisionChecker;
pub use config_file::InfoFromConfigFile;
pub use linkage::is_linkage_legal;
pub use packaging::validate_packaging;
pub use problem::{ConfigurationProblem, Problem, ProblemLocation};
pub use validator::{ConfigurationValidator, ValidationPolicy};
