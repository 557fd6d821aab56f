//! Typed configuration structs, grouped by concern.
//!
//! Loaded from environment variables; blank values fall back to defaults.

use super::env_keys::{go, install, observability as obv_keys};
use super::loader::{env_bool, env_optional, env_or};
use std::path::PathBuf;

/// Fixed system directory that receives installed binaries.
pub const DEFAULT_BIN_DIR: &str = "/usr/local/bin";

/// Fetch tool invoked inside the workspace.
pub const DEFAULT_GO_PROGRAM: &str = "go";

/// Prefix of the temporary workspace directory name.
pub const DEFAULT_WORKSPACE_PREFIX: &str = "goinst";

/// How much of the host toolchain state the workspace may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationMode {
    /// Fresh GOPATH with no access to host-installed binaries (default).
    #[default]
    Total,
    /// `<workspace>/bin` is a symlink to `$GOPATH/bin`; requires `GOPATH`.
    SharedHostBin,
}

impl IsolationMode {
    pub fn from_flag(share_host_bin: bool) -> Self {
        if share_host_bin {
            Self::SharedHostBin
        } else {
            Self::Total
        }
    }

    pub fn requires_gopath(&self) -> bool {
        matches!(self, Self::SharedHostBin)
    }
}

/// Install pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Destination directory; must already exist.
    pub bin_dir: PathBuf,
    /// Fetch tool program name or path.
    pub go_program: String,
    pub isolation: IsolationMode,
    pub workspace_prefix: String,
    /// Host `GOPATH`, if set. Only consulted in shared-bin mode.
    pub host_gopath: Option<PathBuf>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from(DEFAULT_BIN_DIR),
            go_program: DEFAULT_GO_PROGRAM.to_string(),
            isolation: IsolationMode::Total,
            workspace_prefix: DEFAULT_WORKSPACE_PREFIX.to_string(),
            host_gopath: None,
        }
    }
}

impl InstallConfig {
    pub fn from_env() -> Self {
        let bin_dir = env_or(install::GOINST_BIN_DIR, || DEFAULT_BIN_DIR.to_string());
        let go_program = env_or(install::GOINST_GO, || DEFAULT_GO_PROGRAM.to_string());
        let share = env_bool(install::GOINST_SHARE_HOST_BIN, false);
        let workspace_prefix = env_or(install::GOINST_WORKSPACE_PREFIX, || {
            DEFAULT_WORKSPACE_PREFIX.to_string()
        });
        let host_gopath = env_optional(go::GOPATH).map(PathBuf::from);

        Self {
            bin_dir: PathBuf::from(bin_dir),
            go_program,
            isolation: IsolationMode::from_flag(share),
            workspace_prefix,
            host_gopath,
        }
    }

    /// Override with CLI parameters (CLI > env > default).
    pub fn with_cli_overrides(
        mut self,
        cli_bin_dir: Option<PathBuf>,
        cli_go: Option<String>,
        cli_share_host_bin: bool,
    ) -> Self {
        if let Some(bin_dir) = cli_bin_dir {
            self.bin_dir = bin_dir;
        }
        if let Some(go) = cli_go {
            self.go_program = go;
        }
        if cli_share_host_bin {
            self.isolation = IsolationMode::SharedHostBin;
        }
        self
    }
}

/// Observability config: quiet, log_level, log_json, audit_log
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub audit_log: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            let quiet = env_bool(obv_keys::GOINST_QUIET, false);
            let log_level = env_or(obv_keys::GOINST_LOG_LEVEL, || "goinst=warn".to_string());
            let log_json = env_bool(obv_keys::GOINST_LOG_JSON, false);
            let audit_log = env_optional(obv_keys::GOINST_AUDIT_LOG);
            Self {
                quiet,
                log_level,
                log_json,
                audit_log,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = InstallConfig::default();
        assert_eq!(cfg.bin_dir, PathBuf::from("/usr/local/bin"));
        assert_eq!(cfg.go_program, "go");
        assert_eq!(cfg.isolation, IsolationMode::Total);
        assert_eq!(cfg.workspace_prefix, "goinst");
    }

    #[test]
    fn test_from_env_reads_install_keys() {
        std::env::set_var(install::GOINST_BIN_DIR, "/opt/tools/bin");
        std::env::set_var(install::GOINST_GO, "/usr/lib/go/bin/go");
        std::env::set_var(install::GOINST_SHARE_HOST_BIN, "1");
        let cfg = InstallConfig::from_env();

        // Exported but blank keys behave as unset.
        std::env::set_var(install::GOINST_BIN_DIR, "");
        std::env::set_var(install::GOINST_GO, "  ");
        let blank = InstallConfig::from_env();

        std::env::remove_var(install::GOINST_BIN_DIR);
        std::env::remove_var(install::GOINST_GO);
        std::env::remove_var(install::GOINST_SHARE_HOST_BIN);

        assert_eq!(cfg.bin_dir, PathBuf::from("/opt/tools/bin"));
        assert_eq!(cfg.go_program, "/usr/lib/go/bin/go");
        assert_eq!(cfg.isolation, IsolationMode::SharedHostBin);
        assert_eq!(blank.bin_dir, PathBuf::from(DEFAULT_BIN_DIR));
        assert_eq!(blank.go_program, DEFAULT_GO_PROGRAM);
    }

    #[test]
    fn test_cli_overrides_take_priority() {
        let cfg = InstallConfig::default().with_cli_overrides(
            Some(PathBuf::from("/tmp/dest")),
            Some("go1.22".to_string()),
            true,
        );
        assert_eq!(cfg.bin_dir, PathBuf::from("/tmp/dest"));
        assert_eq!(cfg.go_program, "go1.22");
        assert!(cfg.isolation.requires_gopath());
    }

    #[test]
    fn test_cli_without_overrides_keeps_env_values() {
        let base = InstallConfig {
            bin_dir: PathBuf::from("/srv/bin"),
            ..InstallConfig::default()
        };
        let cfg = base.clone().with_cli_overrides(None, None, false);
        assert_eq!(cfg, base);
    }
}
