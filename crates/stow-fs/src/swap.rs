//! Backup-and-rename replacement of a directory tree.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::effects::FileSystem;
use crate::error::{Error, Result};
use crate::remove::remove_tree;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapOutcome {
    /// A previous tree existed at the destination and was moved aside.
    pub had_previous:   bool,
    /// No backup tree is left behind.
    pub backup_removed: bool,
}

/// `<dest>.<unix-nanos>.<suffix>`, in the same parent as `dest`.
pub fn backup_path(dest: &Path, suffix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut name = OsString::from(dest.as_os_str());
    name.push(format!(".{nanos}.{suffix}"));
    PathBuf::from(name)
}

/// Replace `dest` with the fully prepared tree at `staging`.
///
/// `dest` is renamed to `backup` (absent `dest` is a first install), then
/// `staging` is renamed to `dest`. If the second rename fails the backup is
/// renamed back and the rename error is returned. After a successful swap
/// the backup is deleted on a best-effort basis.
pub fn swap_in<F: FileSystem + ?Sized>(
    fs: &F,
    staging: &Path,
    dest: &Path,
    backup: &Path,
) -> Result<SwapOutcome> {
    let had_previous = match fs.rename(dest, backup) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(source) => {
            return Err(Error::Rename {
                from: dest.to_path_buf(),
                to: backup.to_path_buf(),
                source,
            });
        }
    };

    if let Err(source) = fs.rename(staging, dest) {
        if had_previous {
            if let Err(e) = fs.rename(backup, dest) {
                tracing::error!(
                    dest = %dest.display(),
                    backup = %backup.display(),
                    error = %e,
                    "failed to restore previous tree; destination is absent"
                );
            }
        }
        return Err(Error::Rename {
            from: staging.to_path_buf(),
            to: dest.to_path_buf(),
            source,
        });
    }

    let backup_removed = if had_previous {
        match remove_tree(fs, backup) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(backup = %backup.display(), error = %e, "stale backup left behind");
                false
            }
        }
    } else {
        true
    };

    Ok(SwapOutcome {
        had_previous,
        backup_removed,
    })
}
