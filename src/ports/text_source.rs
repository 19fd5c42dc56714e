//! Text Source Port - Lecture Material Input
//!
//! Reads outline, demo and interpretation files. Reading never fails:
//! a missing or unreadable source is empty text plus a warning, so one
//! absent file degrades a notebook instead of aborting the build.

use std::path::Path;

use async_trait::async_trait;

/// Trait for lecture material providers.
#[async_trait]
pub trait TextSource: Send + Sync + 'static {
  /// Full text at `path`, or `""` if it cannot be read.
  async fn read_text(&self, path: &Path) -> String;

  /// Whether a source exists at `path`.
  async fn exists(&self, path: &Path) -> bool;
}
