//! Read-only sources of an archive blob and its fingerprint.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fingerprint::Fingerprint;

/// Name of the compressed tar blob inside a bundle.
pub const ARCHIVE_NAME: &str = "dist.tzst";
/// Name of the fingerprint blob inside a bundle and next to an installed tree.
pub const FINGERPRINT_NAME: &str = "dist.json";

/// A named, read-only view over a handful of blobs.
pub trait Bundle {
    fn name(&self) -> &str;

    fn open(&self, entry: &str) -> io::Result<Box<dyn Read + '_>>;

    fn read_fingerprint(&self, entry: &str) -> Result<Fingerprint> {
        let mut bytes = Vec::new();
        self.open(entry)
            .and_then(|mut r| r.read_to_end(&mut bytes))
            .map_err(|source| self.malformed(entry, source))?;
        Ok(Fingerprint::new(bytes))
    }

    fn open_archive(&self, entry: &str) -> Result<Box<dyn Read + '_>> {
        self.open(entry).map_err(|source| self.malformed(entry, source))
    }

    fn malformed(&self, entry: &str, source: io::Error) -> Error {
        Error::MalformedBundle {
            bundle: self.name().to_string(),
            entry: entry.to_string(),
            source,
        }
    }
}

/// Blobs compiled into the binary, e.g. with `include_bytes!`.
#[derive(Clone, Debug)]
pub struct EmbeddedBundle {
    name:    String,
    entries: BTreeMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedBundle {
    pub fn new(
        name: impl Into<String>,
        archive: impl Into<Cow<'static, [u8]>>,
        fingerprint: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        Self::empty(name)
            .with_entry(ARCHIVE_NAME, archive)
            .with_entry(FINGERPRINT_NAME, fingerprint)
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entry(mut self, entry: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.entries.insert(entry.into(), bytes.into());
        self
    }
}

impl Bundle for EmbeddedBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self, entry: &str) -> io::Result<Box<dyn Read + '_>> {
        match self.entries.get(entry) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.as_ref()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no entry '{entry}' in embedded bundle"),
            )),
        }
    }
}

/// Blobs stored as plain files in a directory.
#[derive(Clone, Debug)]
pub struct DirBundle {
    name: String,
    root: PathBuf,
}

impl DirBundle {
    /// Named after the directory's last component.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, root }
    }

    pub fn named(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Bundle for DirBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self, entry: &str) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(self.root.join(entry))?))
    }
}
