use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot resolve data directory")]
    DataDir(#[source] stow_platform::Error),

    #[error("cannot install piper voice")]
    Voice(#[source] stow_install::Error),

    #[error("cannot install piper engine")]
    Engine(#[source] stow_install::Error),

    #[error("cannot create temporary output directory")]
    TempDir(#[source] io::Error),

    #[error("synthesis failed")]
    Synthesize(#[source] stow_platform::Error),

    #[error("cannot read synthesized audio '{path}': {source}")]
    ReadOutput { path: PathBuf, source: io::Error },
}
