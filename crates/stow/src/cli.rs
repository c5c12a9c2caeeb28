use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use stow_install::{DirBundle, InstallOutcome, Installer, Provision, VoiceConfig, install_engine, provision_voice};
use stow_platform::{DATA_DIR_ENV, PlatformCaps, default_data_dir};
use stow_tts::Tts;

#[derive(Clone, Debug, Parser)]
#[command(name = "stow", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "i", name = "install", about = "Install a bundle directory")]
    Install(InstallArg),
    #[command(alias = "l", name = "locate", about = "Show the voice files in an installed directory")]
    Locate(LocateArg),
    #[command(alias = "s", name = "speak", about = "Synthesize text to a WAV file")]
    Speak(SpeakArg),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    #[default]
    Voice,
    Engine,
}

#[derive(Args, Clone, Debug)]
pub struct InstallArg {
    #[arg(help = "Directory holding dist.tzst and dist.json")]
    pub bundle: PathBuf,
    #[arg(long, help = "Install into exactly this directory")]
    pub dest: Option<PathBuf>,
    #[arg(long, env = DATA_DIR_ENV, help = "Data directory used when --dest is not given")]
    pub data_dir: Option<PathBuf>,
    #[arg(long = "as", value_enum, default_value_t = Kind::Voice)]
    pub kind: Kind,
}

#[derive(Args, Clone, Debug)]
pub struct LocateArg {
    pub dir: PathBuf,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone, Debug)]
pub struct SpeakArg {
    #[arg(long, help = "Engine bundle directory")]
    pub engine: PathBuf,
    #[arg(long, help = "Voice bundle directory")]
    pub voice: PathBuf,
    #[arg(long, help = "Use --voice as an already extracted voice directory")]
    pub extracted: bool,
    #[arg(long, help = "Text to speak; read from stdin when omitted")]
    pub text: Option<String>,
    #[arg(long, short)]
    pub out: PathBuf,
    #[arg(long, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,
}

impl App {
    pub fn run(self) -> Result<()> {
        match self.cmd {
            Commands::Install(arg) => install(arg),
            Commands::Locate(arg) => locate(arg),
            Commands::Speak(arg) => speak(arg),
        }
    }
}

fn data_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => absolute(&dir),
        None => default_data_dir().context("Failed to resolve data directory"),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Failed to resolve '{}'", path.display()))
}

fn install(arg: InstallArg) -> Result<()> {
    let bundle = DirBundle::new(absolute(&arg.bundle)?);
    let installer = Installer::new();

    if let Some(dest) = arg.dest {
        let dest = absolute(&dest)?;
        let outcome = installer
            .install(&dest, &bundle)
            .with_context(|| format!("Failed to install '{}'", bundle.root().display()))?;
        match outcome {
            InstallOutcome::UpToDate => println!("{} is up to date", dest.display()),
            InstallOutcome::Installed(report) => {
                println!("installed {} files into {}", report.extract.files, dest.display())
            }
        }
        return Ok(());
    }

    let data = data_dir(arg.data_dir)?;
    match arg.kind {
        Kind::Voice => {
            let voice = provision_voice(&installer, &data, Provision::Bundle(&bundle))
                .context("Failed to install voice")?;
            println!("{}", voice.model.display());
        }
        Kind::Engine => {
            let exe = install_engine(&installer, &data, &bundle, &PlatformCaps::current())
                .context("Failed to install engine")?;
            println!("{}", exe.display());
        }
    }
    Ok(())
}

fn locate(arg: LocateArg) -> Result<()> {
    let dir = absolute(&arg.dir)?;
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let voice = VoiceConfig::locate(name, &dir)?;

    if arg.json {
        println!("{}", serde_json::to_string_pretty(&voice)?);
        return Ok(());
    }

    println!("name:   {}", voice.name);
    println!("model:  {}", voice.model.display());
    println!("config: {}", voice.config.display());
    if let Some(card) = &voice.model_card {
        println!();
        println!("{}", card.trim_end());
    }
    Ok(())
}

fn speak(arg: SpeakArg) -> Result<()> {
    let text = match arg.text {
        Some(text) => text,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("Failed to read text from stdin")?;
            text
        }
    };
    if text.trim().is_empty() {
        bail!("Nothing to speak");
    }

    let data = data_dir(arg.data_dir)?;
    let engine = DirBundle::new(absolute(&arg.engine)?);
    let voice_dir = absolute(&arg.voice)?;
    let voice_bundle = DirBundle::new(&voice_dir);
    let voice = if arg.extracted {
        Provision::Extracted(voice_dir)
    } else {
        Provision::Bundle(&voice_bundle)
    };

    let tts = Tts::new(Some(&data), voice, &engine)?;
    tracing::info!(voice = tts.voice_name(), "speaking");
    let wav = tts.synthesize(&text)?;

    let mut out = std::fs::File::create(&arg.out)
        .with_context(|| format!("Failed to create '{}'", arg.out.display()))?;
    out.write_all(&wav)
        .with_context(|| format!("Failed to write '{}'", arg.out.display()))?;
    Ok(())
}
