//! Finding well-known files inside an installed tree.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Optional descriptive text shipped next to a voice model.
pub const MODEL_CARD: &str = "MODEL_CARD";

const MODEL_PATTERNS: [&str; 2] = ["voice.onnx", "*.onnx"];
const CONFIG_PATTERNS: [&str; 2] = ["voice.json", "*.onnx.json"];

/// Return the first file in `dir` matching one of `patterns`, tried in order.
///
/// Patterns are literal names or glob patterns relative to `dir`; within one
/// pattern the lexically first match wins.
pub fn locate(dir: &Path, patterns: &[&str]) -> Result<PathBuf> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    for pattern in patterns {
        let full = format!("{base}/{pattern}");
        let matches = glob::glob(&full).map_err(|source| Error::Pattern {
            pattern: full.clone(),
            source,
        })?;
        if let Some(found) = matches.filter_map(|m| m.ok()).next() {
            tracing::trace!(pattern, path = %found.display(), "located");
            return Ok(found);
        }
    }

    Err(Error::NotFound {
        dir:      dir.to_path_buf(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        source:   io::Error::from(io::ErrorKind::NotFound),
    })
}

/// The model and config files of an installed voice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VoiceConfig {
    pub name:       String,
    pub model:      PathBuf,
    pub config:     PathBuf,
    pub model_card: Option<String>,
}

impl VoiceConfig {
    /// Locate the voice files in `dir`.
    ///
    /// The model card is read on a best-effort basis; a missing or
    /// unreadable card leaves `model_card` empty.
    pub fn locate(name: impl Into<String>, dir: &Path) -> Result<Self> {
        let model = locate(dir, &MODEL_PATTERNS)?;
        let config = locate(dir, &CONFIG_PATTERNS)?;

        let card_path = dir.join(MODEL_CARD);
        let model_card = match std::fs::read_to_string(&card_path) {
            Ok(card) => Some(card),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %card_path.display(), error = %e, "model card unreadable");
                }
                None
            }
        };

        Ok(Self {
            name: name.into(),
            model,
            config,
            model_card,
        })
    }
}
