//! Fingerprint-gated, atomically swapped installation of archive bundles.
//!
//! # Architecture
//!
//! - `bundle.rs` - Read-only bundle sources (embedded, directory)
//! - `fingerprint.rs` - Up-to-date check and staging
//! - `installer.rs` - Extract off to the side, then swap in
//! - `locate.rs` - Asset discovery inside an installed tree
//! - `provision.rs` - Voice and engine layout under a data directory
//!
//! ```no_run
//! use stow_install::{DirBundle, Installer};
//!
//! let bundle = DirBundle::new("/opt/bundles/alan");
//! let outcome = Installer::new().install("/data/piper-voice-alan".as_ref(), &bundle)?;
//! println!("{outcome:?}");
//! # Ok::<(), stow_install::Error>(())
//! ```

pub use bundle::{ARCHIVE_NAME, Bundle, DirBundle, EmbeddedBundle, FINGERPRINT_NAME};
pub use error::{Error, Result};
pub use fingerprint::{Check, Fingerprint, check_and_stage};
pub use installer::{InstallOptions, InstallOutcome, InstallReport, Installer};
pub use locate::{MODEL_CARD, VoiceConfig, locate};
pub use provision::{Provision, engine_dir, install_engine, provision_voice, voice_dir};

mod bundle;
mod error;
mod fingerprint;
mod installer;
mod locate;
mod provision;
