use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Overrides the data directory when set and non-empty.
pub const DATA_DIR_ENV: &str = "STOW_DATA_DIR";

const APP_DIR: &str = "stow-piper";

pub fn user_home() -> Option<PathBuf> {
    home::home_dir()
}

pub fn user_data() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("LOCALAPPDATA").map(PathBuf::from)
    }
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Application Support"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        env::var_os("XDG_DATA_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| user_home().map(|p| p.join(".local/share")))
    }
}

/// Where installed trees live when the caller does not pick a directory.
///
/// `STOW_DATA_DIR` wins; otherwise `<user data>/stow-piper`. The directory
/// is created if missing.
pub fn default_data_dir() -> Result<PathBuf> {
    let dir = resolve_data_dir(env::var_os(DATA_DIR_ENV), user_data())?;
    std::fs::create_dir_all(&dir).map_err(|e| Error::DataDir {
        path:   dir.clone(),
        source: e,
    })?;
    Ok(dir)
}

fn resolve_data_dir(overridden: Option<OsString>, user_data: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = overridden.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    user_data.map(|p| p.join(APP_DIR)).ok_or(Error::NoDataDir)
}
