//! Lecture Notebooks - Entry Point
//!
//! Wiring sequence:
//! 1. Parse CLI arguments
//! 2. Load lectures.toml + validate
//! 3. Init tracing (JSON or pretty, `RUST_LOG` overrides config)
//! 4. Create filesystem adapters (TextSource + NotebookSink ports)
//! 5. Build the selected lectures, exit non-zero if any failed

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lecture_notebooks::adapters::fs::{FsTextSource, NotebookWriter};
use lecture_notebooks::config::{self, LogFormat};
use lecture_notebooks::usecases::notebook_builder::{BuildSettings, NotebookBuilder};

/// Build Jupyter lecture notebooks from course materials.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Lecture configuration file.
    #[arg(short, long, default_value = "lectures.toml")]
    config: String,

    /// Only build these lectures (by key, e.g. "Class 2"). Repeatable.
    #[arg(short, long = "lecture")]
    lectures: Vec<String>,

    /// Override the configured output directory.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Load configuration ───────────────────────────────
    let mut config = config::loader::load_config(&cli.config)
        .context("Failed to load configuration")?;
    if let Some(dir) = cli.output_dir {
        config.notebook.output_dir = dir;
    }

    // ── 2. Initialize structured logging ────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level));
    match config.app.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        lectures = config.lectures.len(),
        output_dir = %config.notebook.output_dir.display(),
        "Starting lecture notebook build"
    );

    // ── 3. Select lectures ──────────────────────────────────
    let selected = config.select_lectures(&cli.lectures)?;

    // ── 4. Wire adapters and build ──────────────────────────
    let builder = NotebookBuilder::new(
        Arc::new(FsTextSource::new()),
        Arc::new(NotebookWriter::new()),
        BuildSettings::from_config(&config)?,
    );

    let summary = builder.build_all(selected).await;

    if !summary.is_success() {
        let failed: Vec<&str> = summary.failures.iter().map(|(key, _)| key.as_str()).collect();
        anyhow::bail!("{} lecture(s) failed: {}", failed.len(), failed.join(", "));
    }

    info!(notebooks = summary.reports.len(), "All notebooks built");
    Ok(())
}
