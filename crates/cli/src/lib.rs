pub mod script;

use anyhow::{Context, Result};
use butterpaper_comments::{
    CommentConfig, CommentPanel, FixedClock, NoopRevealer, PanelView, RecordingStore,
    SequentialReplyIds, StoreEvent,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use script::Script;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "butterpaper-comments")]
#[command(about = "ButterPaper comment sidebar tools")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a JSON event script and print the resulting sidebar and store notifications.
    Replay {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        /// JSON configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Author label for replies, overriding the configuration
        #[arg(long)]
        user: Option<String>,
        /// Clock value used to stamp replies (RFC 3339)
        #[arg(long, default_value = "1970-01-01T00:00:00Z")]
        now: DateTime<Utc>,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    view: PanelView,
    events: Vec<StoreEvent>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Replay { script, config, user, now } => {
            run_replay(&script, config.as_deref(), user, now)
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_replay(
    script_path: &Path,
    config_path: Option<&Path>,
    user: Option<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    ensure_file_exists(script_path)?;

    let mut config = match config_path {
        Some(path) => CommentConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CommentConfig::default(),
    }
    .merge_env()
    .context("invalid comment settings in environment")?;
    if let Some(user) = user {
        config.current_user = user;
    }

    let bytes = fs::read(script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;
    let script: Script = serde_json::from_slice(&bytes).context("failed to parse script")?;

    let mut panel = CommentPanel::with_revealer(config, RecordingStore::new(), NoopRevealer)
        .with_reply_ids(SequentialReplyIds::default())
        .with_clock(FixedClock(now));

    script.replay(&mut panel).context("replay failed")?;

    let output = ReplayOutput { view: panel.view(), events: panel.store_mut().take_events() };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
