//! Atomic install of a bundle into a destination directory.

use std::path::{Path, PathBuf};

use stow_archive::{Codec, ExtractOptions, ExtractReport, extract_from_reader};
use stow_fs::{FileSystem, OsFileSystem, backup_path, clean, swap_in};

use crate::bundle::{ARCHIVE_NAME, Bundle, FINGERPRINT_NAME};
use crate::error::{Error, Result};
use crate::fingerprint::{Check, check_and_stage};

#[derive(Clone, Debug)]
pub struct InstallOptions {
    pub archive_name:     String,
    pub fingerprint_name: String,
    pub backup_suffix:    String,
    /// `None` detects the codec from the archive's first bytes.
    pub codec:            Option<Codec>,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            archive_name:     ARCHIVE_NAME.to_string(),
            fingerprint_name: FINGERPRINT_NAME.to_string(),
            backup_suffix:    "bak".to_string(),
            codec:            None,
        }
    }
}

impl InstallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = name.into();
        self
    }

    pub fn fingerprint_name(mut self, name: impl Into<String>) -> Self {
        self.fingerprint_name = name.into();
        self
    }

    pub fn backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = Some(codec);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallReport {
    pub extract:           ExtractReport,
    pub replaced_previous: bool,
    /// False when the previous tree could not be deleted after the swap.
    pub backup_removed:    bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    UpToDate,
    Installed(InstallReport),
}

impl InstallOutcome {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate)
    }
}

/// Installs bundles so that the destination is always either the previous
/// complete tree or the new complete tree.
///
/// At most one installer may target a given destination at a time; no
/// locking is performed.
#[derive(Clone, Debug, Default)]
pub struct Installer<F: FileSystem = OsFileSystem> {
    fs:      F,
    options: InstallOptions,
}

impl Installer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: FileSystem> Installer<F> {
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            options: InstallOptions::default(),
        }
    }

    pub fn options(mut self, options: InstallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn install_options(&self) -> &InstallOptions {
        &self.options
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Install `bundle` into `dest`, skipping all work when the installed
    /// fingerprint already matches.
    ///
    /// `dest` must be absolute. Extraction happens in a sibling staging
    /// directory; `dest` is only touched by the final backup-and-rename.
    pub fn install(&self, dest: &Path, bundle: &dyn Bundle) -> Result<InstallOutcome> {
        let dest = destination(dest)?;
        let parent = dest.parent().ok_or_else(|| Error::Precondition(dest.clone()))?;
        self.fs.create_dir_all(parent).map_err(|source| Error::Parent {
            path: parent.to_path_buf(),
            source,
        })?;

        let staging = match check_and_stage(&self.fs, &dest, bundle, &self.options.fingerprint_name)? {
            Check::UpToDate => {
                tracing::info!(bundle = bundle.name(), dest = %dest.display(), "already installed");
                return Ok(InstallOutcome::UpToDate);
            }
            Check::Stale(staging) => staging,
        };

        let archive = bundle.open_archive(&self.options.archive_name)?;
        let mut extract_options = ExtractOptions::new();
        if let Some(codec) = self.options.codec {
            extract_options = extract_options.codec(codec);
        }
        let extract = extract_from_reader(archive, staging.path(), &extract_options).map_err(|source| {
            Error::Extract {
                bundle: bundle.name().to_string(),
                source,
            }
        })?;

        let backup = backup_path(&dest, &self.options.backup_suffix);
        let swap = swap_in(&self.fs, staging.path(), &dest, &backup).map_err(|source| Error::Swap {
            dest: dest.clone(),
            source,
        })?;
        staging.commit();

        tracing::info!(
            bundle = bundle.name(),
            dest = %dest.display(),
            files = extract.files,
            bytes = extract.bytes,
            replaced = swap.had_previous,
            "installed"
        );

        Ok(InstallOutcome::Installed(InstallReport {
            extract,
            replaced_previous: swap.had_previous,
            backup_removed: swap.backup_removed,
        }))
    }
}

fn destination(dest: &Path) -> Result<PathBuf> {
    if !dest.is_absolute() {
        return Err(Error::Precondition(dest.to_path_buf()));
    }
    let dest = clean(dest);
    match dest.parent() {
        Some(_) if dest.file_name().is_some() => Ok(dest),
        _ => Err(Error::Precondition(dest)),
    }
}
