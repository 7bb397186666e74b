//! Durable filesystem store: one raster file + one metadata document per
//! image.
//!
//! Layout:
//!
//! ```text
//! {images_dir}/{id}.png     raster bytes
//! {metadata_dir}/{id}.json  {id, prompt, model, aspectRatio, timestamp}
//! ```
//!
//! Both directories are created on demand. The public reference URL for a
//! stored image is `/generated-images/{id}.png`, served statically by the
//! API layer.

use std::path::{Path, PathBuf};

use tokio::fs;

use fluxdeck_core::error::CoreError;
use fluxdeck_core::image::{GeneratedImage, ImageMetadata};

/// URL prefix under which stored images are served.
pub const PUBLIC_IMAGE_PREFIX: &str = "/generated-images";

/// Validate an image id before using it as a file name.
///
/// Ids come from the provider (or a caller) and become path segments, so
/// anything that could escape the storage directories is rejected.
pub fn validate_image_id(id: &str) -> Result<(), CoreError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Image ID must not be empty".to_string(),
        ));
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed.contains("..") {
        return Err(CoreError::Validation(format!(
            "Image ID '{trimmed}' contains path separators"
        )));
    }
    Ok(())
}

/// Filesystem-backed durable image store.
pub struct FileStore {
    images_dir: PathBuf,
    metadata_dir: PathBuf,
}

impl FileStore {
    pub fn new(images_dir: impl Into<PathBuf>, metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            metadata_dir: metadata_dir.into(),
        }
    }

    /// Directory holding the raster files (the API serves this statically).
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Public reference URL for a stored image.
    pub fn public_url(id: &str) -> String {
        format!("{PUBLIC_IMAGE_PREFIX}/{id}.png")
    }

    /// Write the raster file and its metadata document, creating the
    /// directories if needed. Returns the public reference URL.
    pub async fn save(&self, image: &GeneratedImage, bytes: &[u8]) -> Result<String, CoreError> {
        validate_image_id(&image.id)?;

        fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| storage_error("create image directory", &self.images_dir, e))?;
        fs::create_dir_all(&self.metadata_dir)
            .await
            .map_err(|e| storage_error("create metadata directory", &self.metadata_dir, e))?;

        let image_path = self.image_path(&image.id);
        fs::write(&image_path, bytes)
            .await
            .map_err(|e| storage_error("write image", &image_path, e))?;

        let metadata = ImageMetadata::from_image(image);
        let document = serde_json::to_vec_pretty(&metadata)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize metadata: {e}")))?;
        let metadata_path = self.metadata_path(&image.id);
        fs::write(&metadata_path, document)
            .await
            .map_err(|e| storage_error("write metadata", &metadata_path, e))?;

        tracing::info!(image_id = %image.id, path = %image_path.display(), "Image stored");

        Ok(Self::public_url(&image.id))
    }

    /// Read every metadata document, newest first.
    ///
    /// Unreadable or unparsable documents are skipped with a warning -- one
    /// corrupt record must not hide the rest of the gallery. A missing
    /// metadata directory simply yields an empty list.
    pub async fn list(&self) -> Result<Vec<GeneratedImage>, CoreError> {
        let mut dir = match fs::read_dir(&self.metadata_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error("read metadata directory", &self.metadata_dir, e)),
        };

        let mut images = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| storage_error("read metadata directory", &self.metadata_dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            match read_metadata(&path).await {
                Ok(metadata) => images.push(metadata.into_image(Self::public_url(id))),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable metadata document");
                }
            }
        }

        images.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(images)
    }

    /// Remove the raster file and metadata document for `id`.
    ///
    /// Absence of either file is not an error; only real I/O failures are.
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        validate_image_id(id)?;

        remove_if_present(&self.image_path(id)).await?;
        remove_if_present(&self.metadata_path(id)).await?;

        tracing::info!(image_id = %id, "Image deleted");
        Ok(())
    }

    // ---- private helpers ----

    fn image_path(&self, id: &str) -> PathBuf {
        self.images_dir.join(format!("{id}.png"))
    }

    fn metadata_path(&self, id: &str) -> PathBuf {
        self.metadata_dir.join(format!("{id}.json"))
    }
}

async fn read_metadata(path: &Path) -> Result<ImageMetadata, CoreError> {
    let content = fs::read(path)
        .await
        .map_err(|e| storage_error("read metadata", path, e))?;
    serde_json::from_slice(&content)
        .map_err(|e| CoreError::Storage(format!("Malformed metadata {}: {e}", path.display())))
}

async fn remove_if_present(path: &Path) -> Result<(), CoreError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(storage_error("remove file", path, e)),
    }
}

fn storage_error(action: &str, path: &Path, err: std::io::Error) -> CoreError {
    CoreError::Storage(format!("Failed to {action} at {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids_accepted() {
        assert!(validate_image_id("abc-123").is_ok());
        assert!(validate_image_id("019204ff-uuid").is_ok());
    }

    #[test]
    fn empty_id_rejected() {
        assert!(validate_image_id("").is_err());
        assert!(validate_image_id("   ").is_err());
    }

    #[test]
    fn path_traversal_rejected() {
        assert!(validate_image_id("../etc/passwd").is_err());
        assert!(validate_image_id("a/b").is_err());
        assert!(validate_image_id("a\\b").is_err());
    }

    #[test]
    fn public_url_shape() {
        assert_eq!(
            FileStore::public_url("job-1"),
            "/generated-images/job-1.png"
        );
    }
}
