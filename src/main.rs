//! Centerline - a terminal markdown editor with typewriter auto-centering.
//!
//! # Usage
//!
//! ```bash
//! centerline notes.md
//! centerline --watch notes.md
//! centerline --idle-timeout 5000 notes.md
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use centerline::app::App;
use centerline::config::{IDLE_TIMEOUT_MAX_MS, load_settings, settings_path};

/// A terminal markdown editor with typewriter auto-centering
#[derive(Parser, Debug)]
#[command(name = "centerline", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit (created on first save if missing)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Watch the file and reload external changes
    #[arg(short, long)]
    watch: bool,

    /// Start with idle auto-centering disabled
    #[arg(long)]
    no_auto_center: bool,

    /// Idle timeout override in milliseconds, 0-60000 (0 disables)
    #[arg(long, value_name = "MS")]
    idle_timeout: Option<u64>,

    /// Use an alternate settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let settings_file = cli.config.clone().unwrap_or_else(settings_path);
    let mut settings = load_settings(&settings_file);
    if let Some(ms) = cli.idle_timeout {
        settings.idle_timeout_ms = ms.min(IDLE_TIMEOUT_MAX_MS);
    }

    let mut app = App::new(cli.file)
        .with_watch(cli.watch)
        .with_auto_center(!cli.no_auto_center)
        .with_settings(settings, Some(settings_file));

    app.run().context("Application error")
}
