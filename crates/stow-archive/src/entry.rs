use std::path::PathBuf;

use tar::EntryType;

/// What an archive entry turns into on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Symlink { target: PathBuf },
    File { size: u64, mode: Option<u32> },
}

impl EntryKind {
    /// Classify a tar header.
    ///
    /// Returns `None` for types that are never materialized: hard links,
    /// device nodes, fifos, and symlinks without a target.
    pub fn classify(header: &tar::Header, link_name: Option<PathBuf>) -> Option<Self> {
        let entry_type = header.entry_type();

        if entry_type.is_dir() {
            return Some(Self::Directory);
        }

        if entry_type.is_symlink() {
            return link_name
                .filter(|t| !t.as_os_str().is_empty())
                .map(|target| Self::Symlink { target });
        }

        if entry_type == EntryType::Regular {
            return Some(Self::File {
                size: header.entry_size().unwrap_or(0),
                mode: header.mode().ok(),
            });
        }

        None
    }

    pub fn is_executable(&self) -> bool {
        matches!(self, Self::File { mode: Some(m), .. } if m & 0o111 != 0)
    }
}
