//! Error types for install operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("install destination must be an absolute path below a parent directory: '{0}'")]
    Precondition(PathBuf),

    #[error("bundle '{bundle}' is malformed: cannot read '{entry}': {source}")]
    MalformedBundle {
        bundle: String,
        entry:  String,
        source: io::Error,
    },

    #[error("failed to create parent directory '{path}': {source}")]
    Parent { path: PathBuf, source: io::Error },

    #[error("failed to stage bundle '{bundle}': {source}")]
    Stage {
        bundle: String,
        source: stow_fs::Error,
    },

    #[error("failed to extract bundle '{bundle}': {source}")]
    Extract {
        bundle: String,
        source: stow_archive::Error,
    },

    #[error("failed to swap in '{dest}': {source}")]
    Swap {
        dest:   PathBuf,
        source: stow_fs::Error,
    },

    #[error("'{dir}' has no file matching {patterns:?}: {source}")]
    NotFound {
        dir:      PathBuf,
        patterns: Vec<String>,
        source:   io::Error,
    },

    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source:  glob::PatternError,
    },

    #[error("failed to make '{path}' executable: {source}")]
    Permissions { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
