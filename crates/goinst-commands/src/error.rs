//! Install pipeline errors. Each variant's message names the stage it came from.

use std::error::Error as StdError;
use std::path::PathBuf;

use goinst_sandbox::{CopyError, FetchError, ProvisionError, ReclaimError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Precondition failed")]
    Precondition(#[from] PreconditionError),

    #[error("Failed to create root directory of isolated workspace")]
    Provision(#[from] ProvisionError),

    #[error("Failed to install package")]
    Fetch(#[from] FetchError),

    #[error("Failed to move binaries")]
    Copy(#[from] CopyError),

    #[error("Failed to delete temporary isolated workspace")]
    Reclaim(#[from] ReclaimError),
}

/// Checks made before anything touches the filesystem.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("destination directory {} does not exist or is not a directory", .0.display())]
    MissingBinDir(PathBuf),

    #[error("GOPATH is not set; it is required to share the host bin directory")]
    MissingGopath,

    #[error("package identifier is empty")]
    EmptyPackage,
}

/// Render `err` and its source chain as `a: b: c`.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        out.push_str(": ");
        out.push_str(&s.to_string());
        source = s.source();
    }
    out
}
