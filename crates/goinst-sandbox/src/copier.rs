//! Copy built artifacts out of the workspace into the destination directory.
//!
//! Only direct entries of the source directory are copied; subdirectories are
//! skipped, matching the flat layout of `GOBIN`. Destination files are
//! overwritten and receive the source's permission bits.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CopyError, CopyPhase};

/// Regular files directly under `source_dir`, sorted by file name.
pub fn list_artifacts(source_dir: &Path) -> Result<Vec<PathBuf>, CopyError> {
    let list_err = |e| CopyError::new(source_dir, CopyPhase::List, e);

    let mut files = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(list_err)? {
        let path = entry.map_err(list_err)?.path();
        // Follows symlinks, so a link to a binary counts as a file.
        if fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false) {
            tracing::debug!(path = %path.display(), "skipping subdirectory");
            continue;
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Copy one file: content, durable sync, then permission bits.
///
/// Handles are scoped to this call and dropped on every exit path; the first
/// failure is the one returned.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), CopyError> {
    let perms = fs::metadata(src)
        .map_err(|e| CopyError::new(src, CopyPhase::Stat, e))?
        .permissions();

    {
        let mut input = File::open(src).map_err(|e| CopyError::new(src, CopyPhase::OpenSource, e))?;
        let mut output =
            File::create(dst).map_err(|e| CopyError::new(dst, CopyPhase::CreateDest, e))?;
        io::copy(&mut input, &mut output).map_err(|e| CopyError::new(dst, CopyPhase::Write, e))?;
        output
            .sync_all()
            .map_err(|e| CopyError::new(dst, CopyPhase::Sync, e))?;
    }

    fs::set_permissions(dst, perms).map_err(|e| CopyError::new(dst, CopyPhase::Chmod, e))
}

/// Copy every artifact from `source_dir` into `dest_dir`, calling `on_file`
/// before each copy. Stops at the first failure. Returns the written paths.
pub fn copy_all<F>(
    source_dir: &Path,
    dest_dir: &Path,
    mut on_file: F,
) -> Result<Vec<PathBuf>, CopyError>
where
    F: FnMut(&Path, &Path),
{
    let mut written = Vec::new();
    for src in list_artifacts(source_dir)? {
        let Some(name) = src.file_name() else {
            continue;
        };
        let dst = dest_dir.join(name);
        on_file(&src, &dst);
        copy_file(&src, &dst)?;
        tracing::debug!(src = %src.display(), dst = %dst.display(), "copied artifact");
        written.push(dst);
    }
    Ok(written)
}
