use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no writable data directory could be determined")]
    NoDataDir,

    #[error("failed to create data directory '{path}': {source}")]
    DataDir {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("failed to start {cmd}: {source}")]
    CommandFailed { cmd: String, source: std::io::Error },

    #[error("failed to write stdin of {cmd}: {source}")]
    Stdin { cmd: String, source: std::io::Error },

    #[error("{cmd} exited with {status}: {stderr}")]
    CommandStatus {
        cmd:    String,
        status: ExitStatus,
        stderr: String,
    },
}
