use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path is not absolute: '{0}'")]
    NotAbsolute(PathBuf),

    #[error("path has no parent directory: '{0}'")]
    NoParent(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create staging directory in '{parent}': {source}")]
    Staging { parent: PathBuf, source: io::Error },

    #[error("failed to rename '{from}' to '{to}': {source}")]
    Rename {
        from:   PathBuf,
        to:     PathBuf,
        source: io::Error,
    },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
