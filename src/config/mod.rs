//! Configuration Module - TOML-based Lecture Configuration
//!
//! Loads and validates configuration from `lectures.toml`. Every path,
//! marker pattern and per-lecture remap table lives here; the domain
//! layer holds nothing lecture-specific.

pub mod loader;

use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

use crate::domain::code_blocks::DEFAULT_MARKER_PATTERN;
use crate::domain::notebook::NotebookMetadata;
use crate::domain::plan::{
  AssemblyPlan, ClosingItem, CommentaryDefault, CommentaryRule, ConceptLink, LeadConcept,
};

/// Top-level configuration.
///
/// Loaded from `lectures.toml` at startup. All fields are validated
/// before any source file is read.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Application identity and logging.
  #[serde(default)]
  pub app: AppSettings,
  /// Shared lecture sources.
  pub sources: SourcesConfig,
  /// Notebook output settings.
  #[serde(default)]
  pub notebook: NotebookConfig,
  /// One entry per lecture notebook.
  pub lectures: Vec<LectureConfig>,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
  /// Human-readable name used in logs.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Log output format.
  #[serde(default)]
  pub log_format: LogFormat,
}

impl Default for AppSettings {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      log_format: LogFormat::default(),
    }
  }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  /// Structured JSON lines.
  #[default]
  Json,
  /// Human-readable lines.
  Pretty,
}

/// Sources shared by all lectures.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
  /// Markdown concept outline covering every lecture.
  pub outline: PathBuf,
  /// Regex for demo script section markers (groups: number, name).
  #[serde(default = "default_marker_pattern")]
  pub marker_pattern: String,
}

/// Notebook output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotebookConfig {
  /// Directory notebooks are written to.
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,
  /// Jupyter kernel name.
  #[serde(default = "default_kernel_name")]
  pub kernel_name: String,
  /// Jupyter kernel display name.
  #[serde(default = "default_kernel_display_name")]
  pub kernel_display_name: String,
  /// Notebook language.
  #[serde(default = "default_language")]
  pub language: String,
}

impl Default for NotebookConfig {
  fn default() -> Self {
    Self {
      output_dir: default_output_dir(),
      kernel_name: default_kernel_name(),
      kernel_display_name: default_kernel_display_name(),
      language: default_language(),
    }
  }
}

impl NotebookConfig {
  /// Notebook metadata for every generated notebook.
  pub fn metadata(&self) -> NotebookMetadata {
    NotebookMetadata::new(&self.kernel_name, &self.kernel_display_name, &self.language)
  }
}

/// Individual lecture configuration.
///
/// Maps one demo script (plus optional interpretation notes) onto the
/// lecture's section of the concept outline.
#[derive(Debug, Clone, Deserialize)]
pub struct LectureConfig {
  /// Lecture heading in the outline (e.g. "Class 2").
  pub key: String,
  /// Notebook title.
  pub title: String,
  /// Intro paragraph; the outline's lecture preamble is used when absent.
  pub intro: Option<String>,
  /// Demo script path.
  pub demo: PathBuf,
  /// Interpretation notes path.
  pub interpretation: Option<PathBuf>,
  /// Notebook file name inside the output directory.
  pub output: String,
  /// Commentary for blocks without a rule.
  #[serde(default)]
  pub commentary_default: CommentaryDefault,
  /// Code block to concept remaps.
  #[serde(default)]
  pub concept_links: Vec<ConceptLink>,
  /// Per-block commentary rules.
  #[serde(default)]
  pub commentary: Vec<CommentaryRule>,
  /// Concepts shown before any code.
  #[serde(default)]
  pub lead_concepts: Vec<LeadConcept>,
  /// Material shown after the code walk.
  #[serde(default)]
  pub closing: Vec<ClosingItem>,
}

impl LectureConfig {
  /// The assembly plan for this lecture.
  pub fn plan(&self) -> AssemblyPlan {
    AssemblyPlan {
      key: self.key.clone(),
      title: self.title.clone(),
      intro: self.intro.clone(),
      concept_links: self.concept_links.clone(),
      commentary: self.commentary.clone(),
      commentary_default: self.commentary_default,
      lead_concepts: self.lead_concepts.clone(),
      closing: self.closing.clone(),
    }
  }
}

impl AppConfig {
  /// Lectures whose key matches one of `keys` (all lectures if empty).
  ///
  /// # Errors
  /// Fails if any requested key matches no configured lecture.
  pub fn select_lectures(&self, keys: &[String]) -> Result<Vec<&LectureConfig>> {
    let unknown: Vec<&str> = keys
      .iter()
      .filter(|k| !self.lectures.iter().any(|l| k.eq_ignore_ascii_case(&l.key)))
      .map(String::as_str)
      .collect();

    anyhow::ensure!(
      unknown.is_empty(),
      "Unknown lecture key(s) {:?}; configured: {:?}",
      unknown,
      self.lectures.iter().map(|l| l.key.as_str()).collect::<Vec<_>>()
    );

    Ok(
      self
        .lectures
        .iter()
        .filter(|l| keys.is_empty() || keys.iter().any(|k| k.eq_ignore_ascii_case(&l.key)))
        .collect(),
    )
  }
}

// Default value functions for serde

fn default_name() -> String {
  "lecture-notebooks".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_marker_pattern() -> String {
  DEFAULT_MARKER_PATTERN.to_string()
}

fn default_output_dir() -> PathBuf {
  PathBuf::from("notebooks")
}

fn default_kernel_name() -> String {
  "python3".to_string()
}

fn default_kernel_display_name() -> String {
  "Python 3".to_string()
}

fn default_language() -> String {
  "python".to_string()
}
