//! File storage for file-reference fields: bytes on disk under the media root, locators in records.

use crate::error::AppError;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct MediaStorage {
    root: PathBuf,
    url: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        MediaStorage {
            root: root.into(),
            url: url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix files are served under (e.g. `/media/`).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Write `bytes` under `upload_to` and return the stored relative path
    /// (`posts/<uuid>-<name>`). The original name is reduced to a safe basename.
    pub async fn save(&self, upload_to: &str, file_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        let dir = upload_to.trim_matches('/');
        let name = format!("{}-{}", uuid::Uuid::new_v4().simple(), sanitize_file_name(file_name));
        let relative = if dir.is_empty() { name } else { format!("{}/{}", dir, name) };
        let full = self.root.join(&relative);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        tracing::info!(path = %relative, size = bytes.len(), "stored upload");
        Ok(relative)
    }

    /// Delete a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, relative: &str) -> Result<(), AppError> {
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
