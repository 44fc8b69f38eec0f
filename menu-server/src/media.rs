//! Uploaded image storage (local filesystem)
//!
//! Images live under `{MEDIA_DIR}/menu/` and are named by the SHA-256 of
//! their content, so identical uploads share one file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use shared::models::MENU_IMAGE_PREFIX;
use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};

use crate::db::repository::menu_item;
use crate::utils::AppError;

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate an upload and return the canonical extension of its real format.
///
/// The declared extension must be supported, and the content must decode as
/// an image of one of the supported formats.
pub fn validate_image(data: &[u8], filename: &str) -> Result<&'static str, AppError> {
    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            shared::error::ErrorCode::InvalidImage,
            format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }

    let declared = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime_ok = mime_guess::from_path(filename)
        .first()
        .is_some_and(|m| m.type_() == mime_guess::mime::IMAGE);
    if !SUPPORTED_FORMATS.contains(&declared.as_str()) || !mime_ok {
        return Err(AppError::with_message(
            shared::error::ErrorCode::InvalidImage,
            format!(
                "Unsupported file format '{declared}'. Supported: {}",
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    let invalid = |detail: String| {
        AppError::with_message(
            shared::error::ErrorCode::InvalidImage,
            format!("Invalid image file: {detail}"),
        )
    };

    let format = image::guess_format(data).map_err(|e| invalid(e.to_string()))?;
    let ext = match format {
        image::ImageFormat::Png => "png",
        image::ImageFormat::Jpeg => "jpg",
        image::ImageFormat::WebP => "webp",
        other => return Err(invalid(format!("{other:?} is not supported"))),
    };

    // Verify it's actually an image by trying to load it
    image::load_from_memory_with_format(data, format).map_err(|e| invalid(e.to_string()))?;

    Ok(ext)
}

/// 媒体文件存储
///
/// Files are shared by content, so saving + recording a reference and
/// counting references + deleting run under the same lock.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    refs: Arc<Mutex<()>>,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            refs: Arc::new(Mutex::new(())),
        }
    }

    /// Hold while storing a file and recording its reference in the database.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.refs.lock().await
    }

    /// Store validated image bytes; returns the relative path (`menu/{hash}.{ext}`)
    pub async fn save(&self, data: &[u8], ext: &str) -> Result<String, AppError> {
        let relative = format!("{MENU_IMAGE_PREFIX}{}.{ext}", calculate_hash(data));
        let path = self.root.join(&relative);

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(path = %relative, "Image already stored, reusing");
            return Ok(relative);
        }

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| AppError::with_message(
                    shared::error::ErrorCode::StorageError,
                    format!("Failed to create media directory: {e}"),
                ))?;
        }
        tokio::fs::write(&path, data).await.map_err(|e| {
            AppError::with_message(
                shared::error::ErrorCode::StorageError,
                format!("Failed to write image: {e}"),
            )
        })?;

        tracing::info!(path = %relative, size = data.len(), "Image stored");
        Ok(relative)
    }

    /// Remove a stored image if no menu item references it any more.
    ///
    /// Failures are logged, never returned. Must not be called while holding
    /// [`MediaStore::lock`].
    pub async fn remove_if_unreferenced(&self, pool: &SqlitePool, relative: &str) {
        if !relative.starts_with(MENU_IMAGE_PREFIX) || relative.contains("..") {
            tracing::warn!(path = %relative, "Refusing to remove image outside media prefix");
            return;
        }
        let _guard = self.lock().await;
        match menu_item::count_image_refs(pool, relative).await {
            Ok(0) => {}
            Ok(_) => return,
            Err(e) => {
                tracing::warn!(error = %e, path = %relative, "Could not count image references");
                return;
            }
        }
        let path = self.root.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %relative, "Unreferenced image removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(error = %e, path = %relative, "Failed to remove image"),
        }
    }

    pub fn path_of(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}
