use std::io;
use std::path::Path;

use crate::effects::FileSystem;
use crate::error::{Error, Result};

/// Recursively delete `path`.
///
/// Refuses relative paths: every caller derives the target from an absolute
/// destination, and a relative path here means that derivation went wrong.
/// A path that is already gone counts as removed.
pub fn remove_tree<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<()> {
    if !path.is_absolute() {
        return Err(Error::NotAbsolute(path.to_path_buf()));
    }

    match fs.remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}
