//! Fingerprint comparison deciding whether a tree must be re-extracted.

use std::fmt;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use stow_fs::{FileSystem, Staging};

use crate::bundle::Bundle;
use crate::error::{Error, Result};

/// Opaque bytes identifying a bundle's content. Compared byte for byte.
#[derive(Clone, PartialEq, Eq)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Short hex digest, for log lines.
    pub fn short(&self) -> String {
        let digest = Sha256::digest(&self.0);
        hex::encode(&digest[..6])
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

/// Result of [`check_and_stage`].
#[derive(Debug)]
pub enum Check {
    /// The tree at the destination carries the bundle's fingerprint.
    UpToDate,
    /// A fresh staging directory already holding the bundle's fingerprint.
    Stale(Staging),
}

/// Compare the bundle's fingerprint with the one stored in `dest`.
///
/// An unreadable fingerprint at `dest` (including a missing tree) counts as
/// stale. On a mismatch a sibling staging directory is created and the new
/// fingerprint written into it; a failure there removes the staging
/// directory again.
pub fn check_and_stage<F: FileSystem + ?Sized>(
    fs: &F,
    dest: &Path,
    bundle: &dyn Bundle,
    fingerprint_name: &str,
) -> Result<Check> {
    let wanted = bundle.read_fingerprint(fingerprint_name)?;

    match fs.read(&dest.join(fingerprint_name)) {
        Ok(current) if current == wanted.as_bytes() => {
            tracing::debug!(
                bundle = bundle.name(),
                fingerprint = %wanted.short(),
                "installed tree is current"
            );
            return Ok(Check::UpToDate);
        }
        Ok(current) => tracing::debug!(
            bundle = bundle.name(),
            installed = %Fingerprint::new(current).short(),
            wanted = %wanted.short(),
            "fingerprint changed"
        ),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(bundle = bundle.name(), "no installed fingerprint")
        }
        Err(e) => tracing::debug!(bundle = bundle.name(), error = %e, "installed fingerprint unreadable"),
    }

    let staging = Staging::sibling_of(dest).map_err(|source| Error::Stage {
        bundle: bundle.name().to_string(),
        source,
    })?;

    let target = staging.path().join(fingerprint_name);
    fs.write(&target, wanted.as_bytes()).map_err(|source| Error::Stage {
        bundle: bundle.name().to_string(),
        source: stow_fs::Error::Write { path: target, source },
    })?;

    Ok(Check::Stale(staging))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{EmbeddedBundle, FINGERPRINT_NAME};
    use stow_fs::OsFileSystem;

    fn bundle(fingerprint: &'static [u8]) -> EmbeddedBundle {
        EmbeddedBundle::new("alan", &b""[..], fingerprint)
    }

    #[test]
    fn missing_tree_is_stale_and_staged() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("piper-voice-alan");

        match check_and_stage(&OsFileSystem, &dest, &bundle(b"v1"), FINGERPRINT_NAME).unwrap() {
            Check::Stale(staging) => {
                assert_eq!(staging.path().parent(), Some(dir.path()));
                assert_eq!(std::fs::read(staging.path().join(FINGERPRINT_NAME)).unwrap(), b"v1");
            }
            Check::UpToDate => panic!("nothing is installed yet"),
        }
    }

    #[test]
    fn equal_fingerprint_is_up_to_date_without_staging() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join(FINGERPRINT_NAME), "v1").unwrap();

        let check = check_and_stage(&OsFileSystem, &dest, &bundle(b"v1"), FINGERPRINT_NAME).unwrap();
        assert!(matches!(check, Check::UpToDate));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn different_fingerprint_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join(FINGERPRINT_NAME), "v1").unwrap();

        let check = check_and_stage(&OsFileSystem, &dest, &bundle(b"v2"), FINGERPRINT_NAME).unwrap();
        assert!(matches!(check, Check::Stale(_)));
    }

    #[test]
    fn bundle_without_fingerprint_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let empty = EmbeddedBundle::empty("broken");
        let result = check_and_stage(&OsFileSystem, &dir.path().join("dest"), &empty, FINGERPRINT_NAME);
        assert!(matches!(result, Err(Error::MalformedBundle { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn short_digest_is_stable() {
        let a = Fingerprint::new(b"v1".to_vec());
        assert_eq!(a.short().len(), 12);
        assert_eq!(a.short(), Fingerprint::new(b"v1".to_vec()).short());
        assert_ne!(a.short(), Fingerprint::new(b"v2".to_vec()).short());
    }
}
