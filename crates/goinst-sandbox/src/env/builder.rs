//! Build the environment the fetch tool runs in.

use std::path::{Path, PathBuf};
use std::process::Command;

use goinst_core::config::env_keys::go;

use crate::workspace::BIN_SUBDIR;

/// Go toolchain directories, all rooted inside one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolatedGoEnv {
    /// `GOPATH`: the workspace root.
    pub gopath: PathBuf,
    /// `GOBIN`: install root for built binaries.
    pub gobin: PathBuf,
    /// `GOMODCACHE`: downloaded module sources.
    pub gomodcache: PathBuf,
    /// `GOCACHE`: build cache.
    pub gocache: PathBuf,
}

impl IsolatedGoEnv {
    pub fn for_workspace(root: &Path) -> Self {
        Self {
            gopath: root.to_path_buf(),
            gobin: root.join(BIN_SUBDIR),
            gomodcache: root.join("pkg").join("mod"),
            gocache: root.join("cache"),
        }
    }

    /// (key, value) pairs to set on the child process.
    pub fn vars(&self) -> [(&'static str, &Path); 4] {
        [
            (go::GOPATH, self.gopath.as_path()),
            (go::GOBIN, self.gobin.as_path()),
            (go::GOMODCACHE, self.gomodcache.as_path()),
            (go::GOCACHE, self.gocache.as_path()),
        ]
    }

    /// Apply to `cmd`, overriding whatever the host environment carries for
    /// these keys, and run the command from the workspace root.
    pub fn apply(&self, cmd: &mut Command) {
        for (key, value) in self.vars() {
            cmd.env(key, value);
        }
        cmd.current_dir(&self.gopath);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_dirs_inside_workspace() {
        let root = Path::new("/tmp/goinst-abc");
        let env = IsolatedGoEnv::for_workspace(root);
        for (key, value) in env.vars() {
            assert!(value.starts_with(root), "{key} escapes workspace: {}", value.display());
        }
        assert_eq!(env.gobin, root.join("bin"));
        assert_eq!(env.gomodcache, root.join("pkg/mod"));
    }

    #[test]
    fn test_apply_sets_env_and_cwd() {
        let root = Path::new("/tmp/goinst-xyz");
        let env = IsolatedGoEnv::for_workspace(root);
        let mut cmd = Command::new("go");
        env.apply(&mut cmd);

        let vars: Vec<(String, String)> = cmd
            .get_envs()
            .filter_map(|(k, v)| {
                Some((k.to_string_lossy().to_string(), v?.to_string_lossy().to_string()))
            })
            .collect();
        assert!(vars.contains(&("GOPATH".to_string(), "/tmp/goinst-xyz".to_string())));
        assert!(vars.contains(&("GOBIN".to_string(), "/tmp/goinst-xyz/bin".to_string())));
        assert_eq!(cmd.get_current_dir(), Some(root));
    }
}
