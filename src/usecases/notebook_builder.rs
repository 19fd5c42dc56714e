//! Notebook Builder - Lecture Build Workflow
//!
//! For each configured lecture:
//! 1. Reads the concept outline, demo script and interpretation notes
//!    through the `TextSource` port
//! 2. Assembles the cell sequence
//! 3. Writes the notebook through the `NotebookSink` port
//!
//! A lecture that fails to write is logged and counted; the remaining
//! lectures are still built.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, instrument, warn};

use crate::config::{AppConfig, LectureConfig};
use crate::domain::{Assembler, LectureSources, MarkerPattern, Notebook, NotebookMetadata};
use crate::ports::notebook_sink::NotebookSink;
use crate::ports::text_source::TextSource;

/// Settings shared by every lecture build.
#[derive(Debug, Clone)]
pub struct BuildSettings {
  /// Concept outline covering all lectures.
  pub outline: PathBuf,
  /// Compiled demo script marker pattern.
  pub marker: MarkerPattern,
  /// Directory notebooks are written to.
  pub output_dir: PathBuf,
  /// Kernel metadata for every notebook.
  pub metadata: NotebookMetadata,
}

impl BuildSettings {
  /// Settings from a validated configuration.
  ///
  /// # Errors
  /// Fails if the marker pattern does not compile.
  pub fn from_config(config: &AppConfig) -> Result<Self> {
    Ok(Self {
      outline: config.sources.outline.clone(),
      marker: MarkerPattern::new(&config.sources.marker_pattern)
        .context("Invalid sources.marker_pattern")?,
      output_dir: config.notebook.output_dir.clone(),
      metadata: config.notebook.metadata(),
    })
  }
}

/// Outcome of one successful lecture build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
  pub lecture: String,
  pub path: PathBuf,
  pub cells: usize,
  pub code_cells: usize,
  pub placeholders: usize,
}

/// Outcome of a multi-lecture build.
#[derive(Debug, Default)]
pub struct BuildSummary {
  pub reports: Vec<BuildReport>,
  /// Lecture key and error for each failed build.
  pub failures: Vec<(String, anyhow::Error)>,
}

impl BuildSummary {
  pub fn is_success(&self) -> bool {
    self.failures.is_empty()
  }
}

/// Builds lecture notebooks from their sources.
pub struct NotebookBuilder<S: TextSource, W: NotebookSink> {
  /// Lecture material reader.
  source: Arc<S>,
  /// Notebook writer.
  sink: Arc<W>,
  /// Shared build settings.
  settings: BuildSettings,
}

impl<S: TextSource, W: NotebookSink> NotebookBuilder<S, W> {
  /// Create a new notebook builder.
  pub fn new(source: Arc<S>, sink: Arc<W>, settings: BuildSettings) -> Self {
    Self {
      source,
      sink,
      settings,
    }
  }

  /// Build and write one lecture's notebook.
  ///
  /// Missing sources produce placeholder cells, not errors.
  ///
  /// # Errors
  /// Fails if a commentary pattern is invalid or the notebook cannot be
  /// written.
  #[instrument(skip(self, lecture), fields(lecture = %lecture.key))]
  pub async fn build_lecture(&self, lecture: &LectureConfig) -> Result<BuildReport> {
    let assembler = Assembler::new(lecture.plan(), self.settings.marker.clone())
      .with_context(|| format!("Invalid commentary rules for {}", lecture.key))?;

    let outline = self.source.read_text(&self.settings.outline).await;
    let demo = self.read_demo(&lecture.demo).await;
    let interpretation = match &lecture.interpretation {
      Some(path) => self.source.read_text(path).await,
      None => String::new(),
    };

    let assembly = assembler.assemble(&LectureSources {
      outline: &outline,
      demo: &demo,
      interpretation: &interpretation,
    });

    let report = BuildReport {
      lecture: lecture.key.clone(),
      path: self.settings.output_dir.join(&lecture.output),
      cells: assembly.cells.len(),
      code_cells: assembly.code_cells(),
      placeholders: assembly.placeholders,
    };

    let notebook = Notebook::new(assembly.cells, self.settings.metadata.clone());
    self
      .sink
      .write_notebook(&report.path, &notebook)
      .await
      .with_context(|| format!("Failed to write notebook {}", report.path.display()))?;

    info!(
      path = %report.path.display(),
      cells = report.cells,
      code_cells = report.code_cells,
      placeholders = report.placeholders,
      "Notebook built"
    );

    Ok(report)
  }

  /// Build every lecture in order.
  ///
  /// Failures are logged and collected; they do not stop later lectures.
  #[instrument(skip_all, name = "build_all")]
  pub async fn build_all<'a, I>(&self, lectures: I) -> BuildSummary
  where
    I: IntoIterator<Item = &'a LectureConfig>,
  {
    let mut summary = BuildSummary::default();

    for lecture in lectures {
      match self.build_lecture(lecture).await {
        Ok(report) => summary.reports.push(report),
        Err(e) => {
          error!(lecture = %lecture.key, error = %format!("{e:#}"), "Lecture build failed");
          summary.failures.push((lecture.key.clone(), e));
        }
      }
    }

    info!(
      built = summary.reports.len(),
      failed = summary.failures.len(),
      "Build finished"
    );

    summary
  }

  async fn read_demo(&self, path: &Path) -> String {
    if !self.source.exists(path).await {
      warn!(
        demo = %path.display(),
        "Demo script missing, notebook will hold concepts only"
      );
      return String::new();
    }
    self.source.read_text(path).await
  }
}
