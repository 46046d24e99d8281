//! Status list from a local file.

use std::path::PathBuf;

use color_eyre::eyre::WrapErr as _;

use crate::{RevocationList, StatusSource};

/// Reads a saved copy of the status list.
pub struct FileStatusSource {
    path: PathBuf,
}

impl FileStatusSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatusSource for FileStatusSource {
    async fn fetch(&self) -> color_eyre::eyre::Result<RevocationList> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .wrap_err_with(|| format!("failed to read {}", self.path.display()))?;

        let list = RevocationList::from_json(&bytes)
            .wrap_err_with(|| format!("invalid status list in {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), entries = list.len(), "status list loaded");
        Ok(list)
    }
}
