//! Disposable workspace: provisioned per install run, reclaimed at the end.
//!
//! A `Workspace` owns its `TempDir`. `reclaim` consumes it, so the tree is
//! deleted at most once; if the run unwinds before that, the `TempDir` drop
//! guard removes it best-effort.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use crate::error::{ProvisionError, ReclaimError};
use crate::info_log;

/// Subdirectory the fetch tool installs binaries into.
pub const BIN_SUBDIR: &str = "bin";

#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    root: PathBuf,
}

impl Workspace {
    /// Create a fresh workspace under the OS temp root, named after `name_hint`.
    pub fn provision(name_hint: &str) -> Result<Self, ProvisionError> {
        Self::provision_in(&std::env::temp_dir(), name_hint)
    }

    /// Create a fresh workspace under `parent`.
    pub fn provision_in(parent: &Path, name_hint: &str) -> Result<Self, ProvisionError> {
        if !parent.is_dir() {
            return Err(ProvisionError::TempRootUnavailable(parent.to_path_buf()));
        }

        let dir = tempfile::Builder::new()
            .prefix(name_hint)
            .tempdir_in(parent)
            .map_err(|source| ProvisionError::Create {
                root: parent.to_path_buf(),
                source,
            })?;

        // Normalized absolute path (resolves e.g. /var -> /private/var on macOS).
        let root = fs::canonicalize(dir.path()).map_err(|source| ProvisionError::Normalize {
            path: dir.path().to_path_buf(),
            source,
        })?;

        let writable = fs::metadata(&root)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false);
        if !writable {
            return Err(ProvisionError::NotWritable(root));
        }

        info_log!("Provisioned workspace {}", root.display());
        Ok(Self { dir, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<workspace>/bin`, where the fetch tool leaves built binaries.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_SUBDIR)
    }

    /// Make `<workspace>/bin` a symlink to `<host_gopath>/bin`, creating the
    /// target if needed. Used only in shared-host-bin mode.
    pub fn link_host_bin(&self, host_gopath: &Path) -> Result<PathBuf, ProvisionError> {
        let target = host_gopath.join(BIN_SUBDIR);
        let link = self.bin_dir();
        let link_err = |source| ProvisionError::LinkHostBin {
            target: target.clone(),
            link: link.clone(),
            source,
        };

        fs::create_dir_all(&target).map_err(link_err)?;
        symlink_dir(&target, &link).map_err(link_err)?;
        tracing::debug!(host_bin = %target.display(), link = %link.display(), "linked host bin");
        Ok(link)
    }

    /// Recursively delete the workspace.
    ///
    /// The Go module cache is written read-only; if the first removal fails
    /// the tree is made owner-writable and removal is retried once. Symlinks
    /// are removed, never followed.
    pub fn reclaim(self) -> Result<(), ReclaimError> {
        let Self { dir, root } = self;
        match dir.close() {
            Ok(()) => {}
            Err(first) => {
                if !root.exists() {
                    return Ok(());
                }
                tracing::debug!(path = %root.display(), "first removal failed ({}), retrying", first);
                make_tree_writable(&root);
                fs::remove_dir_all(&root).map_err(|source| ReclaimError {
                    path: root.clone(),
                    source,
                })?;
            }
        }
        info_log!("Deleted workspace {}", root.display());
        Ok(())
    }
}

fn make_tree_writable(root: &Path) {
    for entry in WalkDir::new(root).follow_links(false).into_iter().flatten() {
        if !entry.file_type().is_dir() {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        let mut perms = meta.permissions();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            perms.set_mode(perms.mode() | 0o700);
        }
        #[cfg(not(unix))]
        {
            perms.set_readonly(false);
        }
        if let Err(e) = fs::set_permissions(entry.path(), perms) {
            tracing::debug!(path = %entry.path().display(), "chmod before delete failed: {}", e);
        }
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink_dir(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provision_creates_unique_absolute_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let a = Workspace::provision_in(tmp.path(), "goinst").unwrap();
        let b = Workspace::provision_in(tmp.path(), "goinst").unwrap();

        assert!(a.root().is_absolute());
        assert!(a.root().is_dir());
        assert_ne!(a.root(), b.root());
        let name = a.root().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("goinst"), "{name}");
        assert_eq!(a.bin_dir(), a.root().join("bin"));
    }

    #[test]
    fn test_provision_missing_temp_root_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let err = Workspace::provision_in(&missing, "goinst").unwrap_err();
        assert!(matches!(err, ProvisionError::TempRootUnavailable(_)));
    }

    #[test]
    fn test_reclaim_removes_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::provision_in(tmp.path(), "goinst").unwrap();
        let root = ws.root().to_path_buf();
        fs::create_dir_all(ws.bin_dir()).unwrap();
        fs::write(ws.bin_dir().join("tool"), b"bin").unwrap();

        ws.reclaim().unwrap();
        assert!(!root.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_reclaim_handles_read_only_module_cache() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::provision_in(tmp.path(), "goinst").unwrap();
        let root = ws.root().to_path_buf();
        let module = root.join("pkg").join("mod").join("example.com").join("m@v1.0.0");
        fs::create_dir_all(&module).unwrap();
        fs::write(module.join("go.mod"), b"module example.com/m\n").unwrap();
        fs::set_permissions(&module, fs::Permissions::from_mode(0o555)).unwrap();

        ws.reclaim().unwrap();
        assert!(!root.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_link_host_bin_and_reclaim_keeps_target() {
        let tmp = tempfile::tempdir().unwrap();
        let gopath = tmp.path().join("gopath");
        let ws = Workspace::provision_in(tmp.path(), "goinst").unwrap();

        let link = ws.link_host_bin(&gopath).unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        fs::write(link.join("existing"), b"host tool").unwrap();

        ws.reclaim().unwrap();
        assert_eq!(
            fs::read(gopath.join("bin").join("existing")).unwrap(),
            b"host tool"
        );
    }
}
