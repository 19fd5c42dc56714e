//! Notebook Writer - Atomic `.ipynb` Output
//!
//! Writes notebooks with atomic writes (write to a tmp file, then
//! rename), so a notebook on disk is always either the previous or the
//! new version, never a partial one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::{info, instrument};

use crate::domain::notebook::Notebook;
use crate::ports::notebook_sink::NotebookSink;

/// Atomic filesystem notebook writer.
#[derive(Debug, Clone, Default)]
pub struct NotebookWriter;

impl NotebookWriter {
    pub fn new() -> Self {
        Self
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

#[async_trait]
impl NotebookSink for NotebookWriter {
    #[instrument(skip(self, notebook), fields(path = %path.display()))]
    async fn write_notebook(&self, path: &Path, notebook: &Notebook) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        }

        let json = notebook.to_json().context("Failed to serialize notebook")?;

        // Write to tmp file
        let tmp = Self::tmp_path(path);
        fs::write(&tmp, &json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;

        // Atomic rename
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e)
                .with_context(|| format!("Failed to rename notebook into {}", path.display()));
        }

        info!(
            cells = notebook.cells.len(),
            code_cells = notebook.code_cells(),
            "Notebook written"
        );

        Ok(())
    }
}
