//! Text to speech through an installed piper engine.
//!
//! [`Tts::new`] installs a voice and the engine under a data directory
//! (both skipped when already current), then [`Tts::synthesize`] runs the
//! engine once per call with the text on stdin and returns WAV bytes.

use std::path::{Path, PathBuf};

use stow_fs::FileSystem;
use stow_install::{Bundle, Installer, Provision, VoiceConfig, install_engine, provision_voice};
use stow_platform::{Command, PlatformCaps, default_data_dir};

pub use error::{Error, Result};

mod error;

/// Directory in the engine tree holding espeak-ng phoneme data.
const ESPEAK_DATA: &str = "espeak-ng-data";
const OUTPUT_NAME: &str = "tts.wav";

#[derive(Clone, Debug)]
pub struct Tts {
    voice:       VoiceConfig,
    exe:         PathBuf,
    engine_dir:  PathBuf,
    espeak_data: Option<PathBuf>,
    caps:        PlatformCaps,
}

impl Tts {
    /// Install `voice` and `engine` below `data_dir`, or below the default
    /// data directory when `None`.
    pub fn new(data_dir: Option<&Path>, voice: Provision<'_>, engine: &dyn Bundle) -> Result<Self> {
        Self::with_installer(&Installer::new(), data_dir, voice, engine, PlatformCaps::current())
    }

    pub fn with_installer<F: FileSystem>(
        installer: &Installer<F>,
        data_dir: Option<&Path>,
        voice: Provision<'_>,
        engine: &dyn Bundle,
        caps: PlatformCaps,
    ) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_data_dir().map_err(Error::DataDir)?,
        };

        let voice = provision_voice(installer, &data_dir, voice).map_err(Error::Voice)?;
        let exe = install_engine(installer, &data_dir, engine, &caps).map_err(Error::Engine)?;
        let engine_dir = exe.parent().map(Path::to_path_buf).unwrap_or_else(|| data_dir.clone());

        let espeak_data = Some(engine_dir.join(ESPEAK_DATA)).filter(|p| p.is_dir());

        tracing::debug!(
            voice = %voice.name,
            exe = %exe.display(),
            espeak = espeak_data.is_some(),
            "piper ready"
        );

        Ok(Self {
            voice,
            exe,
            engine_dir,
            espeak_data,
            caps,
        })
    }

    pub fn voice(&self) -> &VoiceConfig {
        &self.voice
    }

    pub fn voice_name(&self) -> &str {
        &self.voice.name
    }

    pub fn model_card(&self) -> Option<&str> {
        self.voice.model_card.as_deref()
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    /// Synthesize `text` and return the WAV bytes.
    ///
    /// Audio is read from the engine's stdout where the platform passes
    /// binary stdout intact, otherwise from a file in a temporary directory
    /// that is removed afterwards.
    pub fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if self.caps.binary_stdout {
            let output = self.command("-").stdin(text).run().map_err(Error::Synthesize)?;
            return Ok(output.stdout);
        }

        let tmp = tempfile::Builder::new()
            .prefix("stow-piper.")
            .tempdir()
            .map_err(Error::TempDir)?;
        let out = tmp.path().join(OUTPUT_NAME);

        self.command(&out).stdin(text).capture_stdout(false).run().map_err(Error::Synthesize)?;
        std::fs::read(&out).map_err(|source| Error::ReadOutput { path: out, source })
    }

    fn command(&self, output: impl AsRef<Path>) -> Command {
        let mut cmd = Command::new(&self.exe)
            .arg("--model")
            .arg(&self.voice.model)
            .arg("--config")
            .arg(&self.voice.config)
            .arg("--output_file")
            .arg(output.as_ref());
        if let Some(espeak) = &self.espeak_data {
            cmd = cmd.arg("--espeak_data").arg(espeak);
        }
        cmd.current_dir(&self.engine_dir).caps(&self.caps)
    }
}
