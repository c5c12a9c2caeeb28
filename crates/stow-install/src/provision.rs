//! Voice and engine provisioning under a data directory.

use std::fmt;
use std::path::{Path, PathBuf};

use stow_fs::FileSystem;
use stow_platform::PlatformCaps;

use crate::bundle::Bundle;
use crate::error::{Error, Result};
use crate::installer::Installer;
use crate::locate::{VoiceConfig, locate};

pub const VOICE_DIR_PREFIX: &str = "piper-voice-";
pub const ENGINE_DIR_PREFIX: &str = "piper-bin-";
pub const ENGINE_STEM: &str = "piper";

/// Where a voice comes from.
pub enum Provision<'a> {
    /// Installed into `<data>/piper-voice-<name>` first.
    Bundle(&'a dyn Bundle),
    /// Used in place; nothing is installed.
    Extracted(PathBuf),
}

impl fmt::Debug for Provision<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundle(bundle) => f.debug_tuple("Bundle").field(&bundle.name()).finish(),
            Self::Extracted(dir) => f.debug_tuple("Extracted").field(dir).finish(),
        }
    }
}

pub fn voice_dir(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{VOICE_DIR_PREFIX}{name}"))
}

pub fn engine_dir(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{ENGINE_DIR_PREFIX}{name}"))
}

/// Make a voice available and locate its files.
///
/// A bundled voice keeps the bundle's name; an extracted one is named after
/// its directory.
pub fn provision_voice<F: FileSystem>(
    installer: &Installer<F>,
    data_dir: &Path,
    voice: Provision<'_>,
) -> Result<VoiceConfig> {
    match voice {
        Provision::Bundle(bundle) => {
            let dir = voice_dir(data_dir, bundle.name());
            installer.install(&dir, bundle)?;
            VoiceConfig::locate(bundle.name(), &dir)
        }
        Provision::Extracted(dir) => {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            VoiceConfig::locate(name, &dir)
        }
    }
}

/// Install the engine bundle and return the path of its executable.
pub fn install_engine<F: FileSystem>(
    installer: &Installer<F>,
    data_dir: &Path,
    bundle: &dyn Bundle,
    caps: &PlatformCaps,
) -> Result<PathBuf> {
    let dir = engine_dir(data_dir, bundle.name());
    installer.install(&dir, bundle)?;

    let exe = locate(&dir, &[caps.executable(ENGINE_STEM).as_str()])?;
    make_executable(&exe)?;
    Ok(exe)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|source| {
        Error::Permissions {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
