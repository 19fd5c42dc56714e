//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `lectures.toml`, resolving source paths against the
//! config file's directory, validating all parameters, and providing
//! clear error messages for misconfiguration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;
use crate::domain::{Assembler, MarkerPattern};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Load and validate configuration from a TOML file.
///
/// Relative paths in the file are taken relative to the directory that
/// holds it.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
  let config = parse_config(&content, base_dir)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    lectures = config.lectures.len(),
    outline = %config.sources.outline.display(),
    output_dir = %config.notebook.output_dir.display(),
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration text.
///
/// # Errors
/// Fails on TOML errors or validation failures.
pub fn parse_config(content: &str, base_dir: &Path) -> Result<AppConfig> {
  let mut config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse lecture config")?;

  resolve_paths(&mut config, base_dir);
  validate_config(&config)?;

  Ok(config)
}

fn resolve_paths(config: &mut AppConfig, base_dir: &Path) {
  let resolve = |p: &PathBuf| -> PathBuf {
    if p.is_absolute() { p.clone() } else { base_dir.join(p) }
  };

  config.sources.outline = resolve(&config.sources.outline);
  config.notebook.output_dir = resolve(&config.notebook.output_dir);
  for lecture in &mut config.lectures {
    lecture.demo = resolve(&lecture.demo);
    lecture.interpretation = lecture.interpretation.as_ref().map(resolve);
  }
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A known log level
/// - A marker pattern with number and name groups
/// - Non-empty, uniquely named lecture definitions
/// - Compilable excerpt patterns
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()),
    "log_level must be one of {:?}, got {}",
    LOG_LEVELS,
    config.app.log_level
  );

  let marker = MarkerPattern::new(&config.sources.marker_pattern)
    .context("Invalid sources.marker_pattern")?;

  // Lecture validation
  anyhow::ensure!(
    !config.lectures.is_empty(),
    "At least one lecture must be configured"
  );

  let mut keys = HashSet::new();
  let mut outputs = HashSet::new();

  for (i, lecture) in config.lectures.iter().enumerate() {
    anyhow::ensure!(!lecture.key.trim().is_empty(), "Lecture {} has empty key", i);
    anyhow::ensure!(
      !lecture.title.trim().is_empty(),
      "Lecture {} ({}) has empty title",
      i,
      lecture.key
    );
    anyhow::ensure!(
      lecture.output.ends_with(".ipynb"),
      "Lecture {} ({}) output must be an .ipynb file name, got {}",
      i,
      lecture.key,
      lecture.output
    );
    anyhow::ensure!(
      keys.insert(lecture.key.to_ascii_lowercase()),
      "Lecture key {} is configured more than once",
      lecture.key
    );
    anyhow::ensure!(
      outputs.insert(lecture.output.as_str()),
      "Output {} is used by more than one lecture",
      lecture.output
    );

    Assembler::new(lecture.plan(), marker.clone())
      .with_context(|| format!("Lecture {} ({}) has an invalid commentary rule", i, lecture.key))?;
  }

  Ok(())
}
