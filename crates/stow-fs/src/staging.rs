use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A temporary directory next to an install destination.
///
/// Lives in the destination's parent so the final rename never crosses a
/// filesystem. Removed on drop unless [`Staging::commit`] was called.
///
/// Creation and removal use the real filesystem directly, not
/// [`FileSystem`](crate::FileSystem).
#[derive(Debug)]
pub struct Staging {
    path:      PathBuf,
    committed: bool,
}

impl Staging {
    pub fn sibling_of(destination: impl AsRef<Path>) -> Result<Self> {
        let destination = destination.as_ref();
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::NoParent(destination.to_path_buf()))?;

        let prefix = match destination.file_name() {
            Some(name) => format!(".{}.stage-", name.to_string_lossy()),
            None => ".stage-".to_string(),
        };

        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(parent)
            .map_err(|e| Error::Staging {
                parent: parent.to_path_buf(),
                source: e,
            })?;

        let path = dir.keep();
        tracing::debug!(staging = %path.display(), "created staging directory");

        Ok(Self {
            path,
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the directory: its contents have been moved into place.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        staging = %self.path.display(),
                        error = %e,
                        "failed to remove staging directory"
                    );
                }
            }
        }
    }
}
