//! Notebook Sink Port - Notebook Output
//!
//! Defines where assembled notebooks go. The filesystem adapter writes
//! `.ipynb` files; tests substitute mocks.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::notebook::Notebook;

/// Trait for notebook destinations.
#[async_trait]
pub trait NotebookSink: Send + Sync + 'static {
  /// Persist `notebook` at `path`, replacing any previous version.
  async fn write_notebook(&self, path: &Path, notebook: &Notebook) -> anyhow::Result<()>;
}
