//! Compressed tar extraction with escape-checked entry paths.
//!
//! # Architecture
//!
//! - `guard.rs` - Entry path resolution (escape prevention)
//! - `format.rs` - Codec detection and decompression
//! - `entry.rs` - Tar header classification
//! - `extract.rs` - Streaming extraction

pub use entry::EntryKind;
pub use error::{Error, Result};
pub use extract::{ExtractReport, extract_from_reader, extract_tar};
pub use format::{Codec, detect_codec};
pub use guard::resolve;
pub use options::{EntryCallback, ExtractOptions};

mod entry;
mod error;
mod extract;
mod format;
mod guard;
mod options;
