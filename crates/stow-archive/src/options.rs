use std::path::Path;
use std::sync::Arc;

use crate::format::Codec;

pub type EntryCallback = Arc<dyn Fn(&Path) + Send + Sync>;

#[derive(Clone)]
pub struct ExtractOptions {
    /// `None` detects the codec from the stream's magic bytes.
    pub codec:           Option<Codec>,
    /// Keep the executable bit of regular files (unix only).
    pub keep_executable: bool,
    pub on_entry:        Option<EntryCallback>,
}

impl Default for ExtractOptions {
    fn default() -> Self { Self::new() }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self {
            codec:           None,
            keep_executable: true,
            on_entry:        None,
        }
    }

    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn keep_executable(mut self, keep: bool) -> Self {
        self.keep_executable = keep;
        self
    }

    pub fn on_entry(mut self, callback: EntryCallback) -> Self {
        self.on_entry = Some(callback);
        self
    }
}

impl std::fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("codec", &self.codec)
            .field("keep_executable", &self.keep_executable)
            .field("on_entry", &self.on_entry.is_some())
            .finish()
    }
}
