//! Per-stage error types for the isolated install steps.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors creating or preparing the workspace.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("temp root {} is not an existing directory", .0.display())]
    TempRootUnavailable(PathBuf),

    #[error("failed to create workspace under {}", .root.display())]
    Create {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to normalize workspace path {}", .path.display())]
    Normalize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("workspace {} is not writable", .0.display())]
    NotWritable(PathBuf),

    #[error(
        "failed to link host bin {} into workspace at {}",
        .target.display(),
        .link.display()
    )]
    LinkHostBin {
        target: PathBuf,
        link: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors running the fetch tool.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to start `{program}` for package {package}")]
    Spawn {
        program: String,
        package: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {} while fetching {package}", ExitDisplay(.exit_code))]
    Exit {
        program: String,
        package: String,
        /// `None` when the process was terminated by a signal.
        exit_code: Option<i32>,
    },

    #[error("failed waiting for `{program}` to finish fetching {package}")]
    Wait {
        program: String,
        package: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to forward {stream} of `{program}` while fetching {package}")]
    Forward {
        program: String,
        package: String,
        /// `"stdout"` or `"stderr"`.
        stream: &'static str,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub fn package(&self) -> &str {
        match self {
            Self::Spawn { package, .. }
            | Self::Exit { package, .. }
            | Self::Wait { package, .. }
            | Self::Forward { package, .. } => package,
        }
    }

    /// Exit status of the fetch tool, when it ran to completion.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exit { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

struct ExitDisplay<'a>(&'a Option<i32>);

impl fmt::Display for ExitDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Some(code) => write!(f, "status {}", code),
            None => f.write_str("a signal"),
        }
    }
}

/// Step of a single file copy that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPhase {
    List,
    Stat,
    OpenSource,
    CreateDest,
    Write,
    Sync,
    Chmod,
}

impl CopyPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list-source",
            Self::Stat => "stat",
            Self::OpenSource => "open-source",
            Self::CreateDest => "create-dest",
            Self::Write => "write",
            Self::Sync => "sync",
            Self::Chmod => "chmod",
        }
    }
}

impl fmt::Display for CopyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A copy failure, tagged with the file and the phase it failed in.
/// For `CopyPhase::List` the file is the source directory.
#[derive(Debug, Error)]
#[error("{phase} failed for {}", .file.display())]
pub struct CopyError {
    pub file: PathBuf,
    pub phase: CopyPhase,
    #[source]
    pub source: io::Error,
}

impl CopyError {
    pub fn new(file: impl Into<PathBuf>, phase: CopyPhase, source: io::Error) -> Self {
        Self {
            file: file.into(),
            phase,
            source,
        }
    }
}

/// Failure to delete the workspace tree.
#[derive(Debug, Error)]
#[error("failed to delete workspace {}", .path.display())]
pub struct ReclaimError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_exit_message_carries_status_and_package() {
        let err = FetchError::Exit {
            program: "go".to_string(),
            package: "github.com/x/tool".to_string(),
            exit_code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "`go` exited with status 2 while fetching github.com/x/tool"
        );
        assert_eq!(err.exit_code(), Some(2));
        assert_eq!(err.package(), "github.com/x/tool");

        let killed = FetchError::Exit {
            program: "go".to_string(),
            package: "p".to_string(),
            exit_code: None,
        };
        assert!(killed.to_string().contains("a signal"));
    }

    #[test]
    fn test_forward_error_names_stream() {
        let err = FetchError::Forward {
            program: "go".to_string(),
            package: "github.com/x/tool".to_string(),
            stream: "stderr",
            source: io::Error::from(io::ErrorKind::BrokenPipe),
        };
        assert_eq!(
            err.to_string(),
            "failed to forward stderr of `go` while fetching github.com/x/tool"
        );
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_copy_error_names_phase() {
        let err = CopyError::new(
            "/tmp/ws/bin",
            CopyPhase::List,
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert_eq!(err.to_string(), "list-source failed for /tmp/ws/bin");
        assert_eq!(CopyPhase::CreateDest.to_string(), "create-dest");
    }
}
