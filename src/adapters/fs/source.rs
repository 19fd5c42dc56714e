//! Filesystem Text Source - Lecture Material Reader
//!
//! Reads UTF-8 text with `tokio::fs`. Any read failure (missing file,
//! permissions, invalid UTF-8) is logged and yields empty text.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument, warn};

use crate::ports::text_source::TextSource;

/// Reads lecture sources from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsTextSource;

impl FsTextSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextSource for FsTextSource {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn read_text(&self, path: &Path) -> String {
        match fs::read_to_string(path).await {
            Ok(text) => {
                debug!(bytes = text.len(), "Source read");
                text
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Source file not found, using empty text");
                String::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read source file, using empty text");
                String::new()
            }
        }
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }
}
