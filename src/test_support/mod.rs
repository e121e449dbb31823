//! Test utilities for flexbuild unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::ProjectFixture;
//!
//! let fixture = ProjectFixture::new();
//! fixture.source("app/src", "com/acme/Main.mxml");
//! let project = fixture.project(vec![fixture.module("app")]);
//! ```

pub mod fixtures;

pub use fixtures::*;

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::builder::dispatch::TaskRunner;
use crate::builder::plan::CompilationTask;
use crate::core::ConfigurationId;

/// Task runner that records what it was asked to compile.
///
/// Tasks listed with [`RecordingRunner::fail`] return an error instead.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<ConfigurationId>>>,
    failing: Vec<ConfigurationId>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the task with this identity fail.
    pub fn fail(mut self, module: &str, configuration: &str) -> Self {
        self.failing.push(ConfigurationId::new(module, configuration));
        self
    }

    /// Tasks run so far, in start order.
    pub fn calls(&self) -> Vec<ConfigurationId> {
        self.calls.lock().expect("runner lock poisoned").clone()
    }
}

impl TaskRunner for RecordingRunner {
    fn run(&self, task: &CompilationTask) -> Result<()> {
        let id = task.id();
        self.calls.lock().expect("runner lock poisoned").push(id.clone());
        if self.failing.contains(&id) {
            bail!("compilation of {} failed", id);
        }
        Ok(())
    }
}
