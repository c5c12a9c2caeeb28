//! Streaming tar extraction.
//!
//! Entries are materialized in stream order. Every entry name goes through
//! [`guard::resolve`] before anything is written, and the first failure
//! aborts the whole extraction: a hostile archive never partially applies
//! past the offending entry.
//!
//! Symlink targets are written exactly as stored. They are not resolved at
//! extraction time, so a target such as `../../etc` is accepted here and
//! only followed later by whatever reads the tree. A later entry whose name
//! is the same as an earlier symlink, or lies below it, is written through
//! the link by `File::create` and `create_dir_all`, and so may land outside
//! the destination.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::entry::EntryKind;
use crate::error::{Error, Result};
use crate::format::detect_codec;
use crate::guard;
use crate::options::ExtractOptions;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub files:       usize,
    pub symlinks:    usize,
    pub directories: usize,
    pub bytes:       u64,
}

/// Decompress and extract `reader` into `root`.
///
/// The codec comes from `options.codec`, or is detected from the stream.
pub fn extract_from_reader<R: Read>(
    reader: R,
    root: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let mut reader = BufReader::new(reader);
    let codec = match options.codec {
        Some(codec) => codec,
        None => detect_codec(&mut reader)?,
    };
    tracing::debug!(?codec, root = %root.display(), "extracting archive");

    let decoder = codec.decoder(reader)?;
    extract_tar(decoder, root, options)
}

/// Extract an already decompressed tar stream into `root`.
pub fn extract_tar<R: Read>(reader: R, root: &Path, options: &ExtractOptions) -> Result<ExtractReport> {
    let mut archive = tar::Archive::new(reader);
    let mut report = ExtractReport::default();

    let entries = archive.entries().map_err(|source| Error::Read { source })?;
    for entry in entries {
        let mut entry = entry.map_err(|source| Error::Read { source })?;
        let name = entry.path().map_err(|source| Error::Read { source })?.into_owned();
        let dest = guard::resolve(root, &name)?;

        let link_name = entry
            .link_name()
            .map_err(|source| Error::Read { source })?
            .map(|l| l.into_owned());
        let kind = EntryKind::classify(entry.header(), link_name).ok_or_else(|| {
            Error::UnsupportedEntry {
                path: dest.clone(),
                kind: entry.header().entry_type(),
            }
        })?;

        match &kind {
            EntryKind::Directory => report.directories += 1,
            EntryKind::Symlink { target } => {
                ensure_parent(&dest)?;
                write_symlink(target, &dest)?;
                report.symlinks += 1;
            }
            EntryKind::File { .. } => {
                let expected = entry.size();
                report.bytes += write_file(&mut entry, &dest, expected)?;
                if options.keep_executable && kind.is_executable() {
                    mark_executable(&dest)?;
                }
                report.files += 1;
            }
        }

        tracing::trace!(entry = %name.display(), ?kind, "extracted entry");
        if let Some(callback) = &options.on_entry {
            callback(&name);
        }
    }

    Ok(report)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreation {
            path:   parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

fn write_file<R: Read>(reader: &mut R, dest: &Path, expected: u64) -> Result<u64> {
    ensure_parent(dest)?;

    let mut file = File::create(dest).map_err(|e| Error::Create {
        path:   dest.to_path_buf(),
        source: e,
    })?;

    let copied = io::copy(reader, &mut file).map_err(|e| Error::Copy {
        path:   dest.to_path_buf(),
        source: e,
    })?;
    if copied != expected {
        return Err(Error::Copy {
            path:   dest.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("copied {copied} of {expected} bytes"),
            ),
        });
    }

    // Surfaces deferred write errors that a plain drop would swallow.
    file.sync_all().map_err(|e| Error::Close {
        path:   dest.to_path_buf(),
        source: e,
    })?;

    Ok(copied)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|e| {
        Error::Permissions {
            path:   path.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| Error::Symlink {
        target: target.to_path_buf(),
        link:   link.to_path_buf(),
        source: e,
    })
}

#[cfg(windows)]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    use std::os::windows::fs;
    let is_dir_target = link
        .parent()
        .map(|p| p.join(target).is_dir())
        .unwrap_or(false)
        || target.to_string_lossy().ends_with('/');
    let result = if is_dir_target {
        fs::symlink_dir(target, link)
    } else {
        fs::symlink_file(target, link)
    };
    result.map_err(|e| Error::Symlink {
        target: target.to_path_buf(),
        link:   link.to_path_buf(),
        source: e,
    })
}
