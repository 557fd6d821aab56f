//! Environment variable key constants.

/// Install pipeline
pub mod install {
    /// Destination directory for installed binaries.
    pub const GOINST_BIN_DIR: &str = "GOINST_BIN_DIR";

    /// Fetch tool program (`go` unless overridden).
    pub const GOINST_GO: &str = "GOINST_GO";

    /// Opt-in: link `$GOPATH/bin` into the workspace instead of isolating fully.
    pub const GOINST_SHARE_HOST_BIN: &str = "GOINST_SHARE_HOST_BIN";

    /// Name prefix for the temporary workspace directory.
    pub const GOINST_WORKSPACE_PREFIX: &str = "GOINST_WORKSPACE_PREFIX";
}

/// Go toolchain variables, both read from the host and set for the fetch tool.
pub mod go {
    pub const GOPATH: &str = "GOPATH";
    pub const GOBIN: &str = "GOBIN";
    pub const GOMODCACHE: &str = "GOMODCACHE";
    pub const GOCACHE: &str = "GOCACHE";
}

/// Observability and logging
pub mod observability {
    pub const GOINST_QUIET: &str = "GOINST_QUIET";
    pub const GOINST_LOG_LEVEL: &str = "GOINST_LOG_LEVEL";
    pub const GOINST_LOG_JSON: &str = "GOINST_LOG_JSON";
    pub const GOINST_AUDIT_LOG: &str = "GOINST_AUDIT_LOG";
}
