//! Gallery - CLI
//!
//! Drives the capture/reload workflow against the local disk.

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{bail, Context};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use clap::{Parser, Subcommand, ValueEnum};

use gallery::config::GalleryConfig;
use gallery::desktop::{DesktopCamera, DesktopPlatform};
use gallery::filesystem::LocalFilesystem;
use gallery::platform::{CameraPermissions, PermissionKind, PermissionState, PlatformInfo};
use gallery::preferences::SqlitePreferences;
use gallery::{CaptureOutcome, OrphanAction, PhotoSession, Services};

#[derive(Parser)]
#[command(name = "gallery")]
#[command(version = gallery::VERSION)]
#[command(about = "Gallery - capture photos and keep them on this device")]
struct Cli {
    /// Data directory (overrides config and GALLERY_DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Behave like a plain web view
    #[arg(long)]
    web: bool,

    /// Refuse this permission when prompted
    #[arg(long, value_enum)]
    deny: Vec<Capability>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Capability {
    Camera,
    Photos,
}

impl From<Capability> for PermissionKind {
    fn from(c: Capability) -> Self {
        match c {
            Capability::Camera => PermissionKind::Camera,
            Capability::Photos => PermissionKind::Photos,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Take a photo (imports the given image file)
    Capture {
        /// Image to capture
        path: PathBuf,
    },

    /// List saved photos
    List,

    /// Write a saved photo to a file
    Export {
        /// Position in the list
        index: usize,

        /// Output path
        output: PathBuf,
    },

    /// Show camera and photo library grants
    Permissions {
        /// Prompt for missing grants first
        #[arg(long)]
        request: bool,
    },

    /// Look for photo files missing from the ledger
    Reconcile {
        /// Add them back
        #[arg(long, conflicts_with = "delete")]
        adopt: bool,

        /// Delete them
        #[arg(long)]
        delete: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn open_session(cli: &Cli) -> anyhow::Result<(PhotoSession, Arc<DesktopCamera>)> {
    let mut config = match &cli.config {
        Some(path) => GalleryConfig::load(path)?,
        None => GalleryConfig::default(),
    }
    .with_env();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    let filesystem = LocalFilesystem::new(&config.data_dir)
        .with_context(|| format!("cannot use data dir {}", config.data_dir.display()))?;
    let preferences = SqlitePreferences::open(&config.preferences_path())
        .context("cannot open preferences")?;

    let mut answers = CameraPermissions::granted();
    for &denied in &cli.deny {
        answers.set(denied.into(), PermissionState::Denied);
    }
    let camera = Arc::new(DesktopCamera::new(answers));

    let platform: Arc<dyn PlatformInfo> = if cli.web {
        Arc::new(DesktopPlatform::web())
    } else {
        Arc::new(DesktopPlatform::native())
    };

    let session = PhotoSession::new(
        Services {
            camera: camera.clone(),
            filesystem: Arc::new(filesystem),
            preferences: Arc::new(preferences),
            platform,
        },
        config,
    );

    Ok((session, camera))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (mut session, camera) = open_session(&cli)?;
    let report = session.initialize()?;

    if report.ledger_quarantined {
        println!("⚠️ Photo list was unreadable; it has been set aside and started fresh");
    }
    for missing in &report.missing {
        println!("⚠️ Missing photo removed from list: {}", missing);
    }
    for unreadable in &report.unreadable {
        println!("⚠️ Could not read photo (kept on list): {}", unreadable);
    }

    match cli.command {
        Commands::Capture { path } => {
            if !path.is_file() {
                bail!("no such file: {}", path.display());
            }

            println!("📷 Capturing {}", path.display());
            camera.load_from(&path);

            match session.take_photo() {
                CaptureOutcome::Captured(record) => {
                    println!("✅ Saved: {}", record.storage_reference);
                }
                CaptureOutcome::Unsaved { record, .. } => {
                    println!("⚠️ Saved {} but it was not added to the list", record.storage_reference);
                    for message in session.errors().drain() {
                        println!("   - {}", message);
                    }
                    println!("   Run `gallery reconcile --adopt` to recover it");
                }
                CaptureOutcome::Failed(e) => {
                    let messages = session.errors().drain().join("; ");
                    return Err(anyhow::Error::new(e).context(messages));
                }
            }
        }

        Commands::List => {
            let photos = session.photos();

            if photos.is_empty() {
                println!("📭 No photos yet");
            } else {
                println!("📷 Photos ({}):", photos.len());
                println!("{:-<60}", "");
                for (i, photo) in photos.iter().enumerate() {
                    let size = photo.payload().len() / 4 * 3;
                    let pending = if photo.transient { " (unsaved)" } else { "" };
                    println!(
                        "{:>3}  {:<5} ~{} bytes  {}{}",
                        i, photo.format, size, photo.storage_reference, pending
                    );
                }
            }
        }

        Commands::Export { index, output } => {
            let Some(photo) = session.catalog().get(index) else {
                bail!("no photo at position {}", index);
            };

            let data = STANDARD
                .decode(photo.payload())
                .context("stored photo is not valid base64")?;
            std::fs::write(&output, &data)
                .with_context(|| format!("cannot write {}", output.display()))?;

            println!("✅ Photo exported to: {}", output.display());
        }

        Commands::Permissions { request } => {
            let perms = if request {
                session.request_permissions()
            } else {
                session.permissions()
            };

            println!("🔐 Permissions:");
            println!("   Camera:        {}", state_label(perms.camera));
            println!("   Photo library: {}", state_label(perms.photos));
        }

        Commands::Reconcile { adopt, delete } => {
            let action = if adopt {
                OrphanAction::Adopt
            } else if delete {
                OrphanAction::Delete
            } else {
                OrphanAction::Report
            };

            let report = session.reconcile(action)?;

            if report.orphans.is_empty() {
                println!("💚 Every photo file is on the list");
            } else {
                println!("🔍 Orphaned files: {}", report.orphans.len());
                for orphan in &report.orphans {
                    println!("   - {}", orphan);
                }
                if report.adopted > 0 {
                    println!("✅ Added back: {}", report.adopted);
                }
                if report.deleted > 0 {
                    println!("🗑️ Deleted: {}", report.deleted);
                }
            }
        }
    }

    Ok(())
}

fn state_label(state: PermissionState) -> &'static str {
    match state {
        PermissionState::Granted => "✅ granted",
        PermissionState::Denied => "❌ denied",
        PermissionState::Prompt => "❔ not asked",
    }
}
