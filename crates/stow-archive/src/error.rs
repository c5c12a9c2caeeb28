use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("entry '{entry}' escapes extraction root: resolves to '{resolved}'")]
    Escape { entry: PathBuf, resolved: PathBuf },

    #[error("unsupported entry '{path}': type {kind:?} is not a directory, symlink or regular file")]
    UnsupportedEntry { path: PathBuf, kind: tar::EntryType },

    #[error("unrecognized archive codec")]
    UnknownCodec,

    #[error("archive codec {0:?} is not enabled in this build")]
    CodecDisabled(crate::Codec),

    #[error("failed to read archive: {source}")]
    Read { source: io::Error },

    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreation { path: PathBuf, source: io::Error },

    #[error("failed to create '{path}': {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to copy into '{path}': {source}")]
    Copy { path: PathBuf, source: io::Error },

    #[error("failed to close '{path}': {source}")]
    Close { path: PathBuf, source: io::Error },

    #[error("failed to link '{link}' -> '{target}': {source}")]
    Symlink {
        target: PathBuf,
        link:   PathBuf,
        source: io::Error,
    },

    #[error("failed to set permissions on '{path}': {source}")]
    Permissions { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
