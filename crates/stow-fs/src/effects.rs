//! Filesystem effects used by the installer.
//!
//! Reading and writing fingerprints, creating the parent, the backup and
//! rename-in renames, and backup removal go through [`FileSystem`], so tests
//! can substitute a double that fails a chosen operation.
//!
//! [`Staging`](crate::Staging) is the exception: its directory is created
//! by `tempfile` and removed with `std::fs` on drop, so a double can neither
//! observe nor fail staging creation or cleanup. Cleanup of an abandoned
//! staging directory therefore still happens when the double's
//! `remove_dir_all` fails.

use std::io;
use std::path::Path;

pub trait FileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> { std::fs::read(path) }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> { std::fs::write(path, content) }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> { std::fs::create_dir_all(path) }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> { std::fs::rename(from, to) }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> { std::fs::remove_dir_all(path) }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> { (**self).read(path) }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> { (**self).write(path, content) }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> { (**self).create_dir_all(path) }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> { (**self).rename(from, to) }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> { (**self).remove_dir_all(path) }
}
