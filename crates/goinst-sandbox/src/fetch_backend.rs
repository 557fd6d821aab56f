//! FetchBackend trait: extension point for the tool that populates `<workspace>/bin`.
//!
//! The install pipeline only sees this trait. The default backend shells out
//! to `go get`; tests plug in-process fakes in here.

use std::path::Path;

use crate::error::FetchError;
use crate::runner;

pub trait FetchBackend {
    /// Backend name for logging and diagnostics.
    fn name(&self) -> &str;

    /// Fetch and build `package` with every side effect confined to `workspace_root`.
    fn fetch(&self, workspace_root: &Path, package: &str) -> Result<(), FetchError>;
}

/// `<program> get -u -v <package>` with an isolated GOPATH.
#[derive(Debug, Clone)]
pub struct GoGetBackend {
    program: String,
}

impl GoGetBackend {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl FetchBackend for GoGetBackend {
    fn name(&self) -> &str {
        &self.program
    }

    fn fetch(&self, workspace_root: &Path, package: &str) -> Result<(), FetchError> {
        runner::run_fetch(&self.program, workspace_root, package)
    }
}
