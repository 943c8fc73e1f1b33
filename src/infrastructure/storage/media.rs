//! Filesystem storage for uploaded node label images

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::node::LABEL_PREFIX;
use crate::shared::InfraError;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Media root plus the public URL prefix it is served under.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Lowercased extension if the filename names a supported image type.
    pub fn image_extension(filename: &str) -> Option<String> {
        let ext = Path::new(filename)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
    }

    /// Write an image under `photos/` with a fresh name and return its
    /// relative media path.
    pub async fn save_label(&self, extension: &str, bytes: &[u8]) -> Result<String, InfraError> {
        let dir = self.root.join(LABEL_PREFIX.trim_end_matches('/'));
        tokio::fs::create_dir_all(&dir).await?;

        let relative = format!("{}{}.{}", LABEL_PREFIX, uuid::Uuid::new_v4(), extension);
        tokio::fs::write(self.root.join(&relative), bytes).await?;
        info!("Stored label image {} ({} bytes)", relative, bytes.len());
        Ok(relative)
    }

    /// Remove a previously stored label; a missing file is not an error.
    pub async fn remove_label(&self, relative: &str) -> Result<(), InfraError> {
        if !relative.starts_with(LABEL_PREFIX) || relative.contains("..") {
            return Ok(());
        }
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
