//! The immutable description of one install invocation.

use std::path::Path;

use goinst_core::config::{InstallConfig, IsolationMode};

use crate::error::PreconditionError;

/// Built once at startup from the CLI and environment, then passed by
/// reference to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    package: String,
    config: InstallConfig,
}

impl InstallPlan {
    pub fn new(package: impl Into<String>, config: InstallConfig) -> Self {
        Self {
            package: package.into(),
            config,
        }
    }

    /// Package identifier, passed verbatim to the fetch tool.
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn bin_dir(&self) -> &Path {
        &self.config.bin_dir
    }

    pub fn go_program(&self) -> &str {
        &self.config.go_program
    }

    pub fn workspace_prefix(&self) -> &str {
        &self.config.workspace_prefix
    }

    /// Host GOPATH to link in; `Some` only in shared-host-bin mode.
    pub fn shared_gopath(&self) -> Option<&Path> {
        match self.config.isolation {
            IsolationMode::SharedHostBin => self.config.host_gopath.as_deref(),
            IsolationMode::Total => None,
        }
    }

    /// Everything that must hold before a workspace is created.
    pub fn check_preconditions(&self) -> Result<(), PreconditionError> {
        if self.package.trim().is_empty() {
            return Err(PreconditionError::EmptyPackage);
        }
        if !self.config.bin_dir.is_dir() {
            return Err(PreconditionError::MissingBinDir(self.config.bin_dir.clone()));
        }
        if self.config.isolation.requires_gopath() && self.config.host_gopath.is_none() {
            return Err(PreconditionError::MissingGopath);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_bin(bin_dir: &Path) -> InstallConfig {
        InstallConfig {
            bin_dir: bin_dir.to_path_buf(),
            ..InstallConfig::default()
        }
    }

    #[test]
    fn test_preconditions_pass_with_existing_bin_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = InstallPlan::new("example.com/cmd/tool", config_with_bin(tmp.path()));
        plan.check_preconditions().unwrap();
        assert_eq!(plan.shared_gopath(), None);
    }

    #[test]
    fn test_missing_bin_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = InstallPlan::new("p", config_with_bin(&tmp.path().join("absent")));
        assert!(matches!(
            plan.check_preconditions(),
            Err(PreconditionError::MissingBinDir(_))
        ));
    }

    #[test]
    fn test_bin_dir_must_be_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file");
        std::fs::write(&file, b"").unwrap();
        let plan = InstallPlan::new("p", config_with_bin(&file));
        assert!(matches!(
            plan.check_preconditions(),
            Err(PreconditionError::MissingBinDir(_))
        ));
    }

    #[test]
    fn test_shared_mode_requires_gopath() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_with_bin(tmp.path());
        config.isolation = IsolationMode::SharedHostBin;
        let plan = InstallPlan::new("p", config.clone());
        assert!(matches!(
            plan.check_preconditions(),
            Err(PreconditionError::MissingGopath)
        ));

        config.host_gopath = Some(tmp.path().join("gopath"));
        let plan = InstallPlan::new("p", config);
        plan.check_preconditions().unwrap();
        assert_eq!(plan.shared_gopath(), Some(tmp.path().join("gopath").as_path()));
    }

    #[test]
    fn test_blank_package_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = InstallPlan::new("  ", config_with_bin(tmp.path()));
        assert!(matches!(
            plan.check_preconditions(),
            Err(PreconditionError::EmptyPackage)
        ));
    }
}
