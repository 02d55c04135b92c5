//! Local image storage
//!
//! Writes validated uploads under server-generated names and resolves stored
//! names back to public paths, falling back to a placeholder when the file is
//! gone.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::ImageStorageConfig;
use crate::core::error::Result;
use crate::features::reports::dtos::{get_extension_from_content_type, ImageUpload};
use crate::shared::validation::FILE_EXTENSION_REGEX;

/// Image directory on local disk
pub struct ImageStore {
    images_dir: PathBuf,
    public_path: String,
    placeholder: String,
}

impl ImageStore {
    pub fn new(config: ImageStorageConfig) -> Self {
        Self {
            images_dir: config.images_dir,
            public_path: config.public_path.trim_matches('/').to_string(),
            placeholder: config.placeholder,
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Create the images directory if missing
    pub async fn ensure_dir_exists(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.images_dir).await?;
        debug!("Images directory ready: {}", self.images_dir.display());
        Ok(())
    }

    /// Write an upload under a fresh name and return that name.
    ///
    /// The upload must already be validated.
    pub async fn save(&self, upload: &ImageUpload) -> Result<String> {
        let filename = generate_filename(&upload.file_name, &upload.content_type);

        self.ensure_dir_exists().await?;
        tokio::fs::write(self.images_dir.join(&filename), &upload.data).await?;

        info!(
            "Image stored: name={}, size={}",
            filename,
            upload.data.len()
        );

        Ok(filename)
    }

    /// Remove a file written by [`save`](Self::save). Failures are logged, not returned.
    pub async fn remove(&self, filename: &str) {
        let Some(name) = stored_file_name(filename) else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(self.images_dir.join(name)).await {
            warn!("Failed to remove image {}: {}", name, e);
        }
    }

    /// Public path for a stored image name, or the placeholder when the
    /// name is empty or the file is not on disk right now.
    pub async fn public_url(&self, stored: Option<&str>) -> String {
        let Some(name) = stored.and_then(stored_file_name) else {
            return self.placeholder.clone();
        };

        match tokio::fs::metadata(self.images_dir.join(name)).await {
            Ok(meta) if meta.is_file() => format!("{}/{}", self.public_path, name),
            _ => {
                debug!("Image {} missing, using placeholder", name);
                self.placeholder.clone()
            }
        }
    }
}

/// Only the last path component of a stored value is ever used, so a
/// crafted value cannot point outside the images directory.
fn stored_file_name(stored: &str) -> Option<&str> {
    let trimmed = stored.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Path::new(trimmed)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
}

/// `report_<uuid>_<unix-seconds>.<ext>`
///
/// The extension comes from the client name when it looks like one,
/// otherwise from the content type.
pub fn generate_filename(original_name: &str, content_type: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| FILE_EXTENSION_REGEX.is_match(e))
        .map(|e| e.to_ascii_lowercase())
        .or_else(|| get_extension_from_content_type(content_type).map(str::to_string))
        .unwrap_or_else(|| "bin".to_string());

    format!(
        "report_{}_{}.{}",
        Uuid::new_v4().simple(),
        Utc::now().timestamp(),
        extension
    )
}
