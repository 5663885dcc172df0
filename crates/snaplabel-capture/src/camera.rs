use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use snaplabel_core::Camera;
use snaplabel_types::{CaptureOutcome, IMAGE_EXTRA};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

/// Camera backed by files on disk.
///
/// `source` is either one image, returned on every shot, or a directory whose
/// images are handed out one per shot in name order, wrapping around.
pub struct FileCamera {
    source: PathBuf,
    extra_key: String,
    next_shot: AtomicUsize,
}

impl FileCamera {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            extra_key: IMAGE_EXTRA.to_string(),
            next_shot: AtomicUsize::new(0),
        }
    }

    /// Store each shot under `key` instead of the default extra
    pub fn with_extra_key(mut self, key: impl Into<String>) -> Self {
        self.extra_key = key.into();
        self
    }

    pub fn extra_key(&self) -> &str {
        &self.extra_key
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    fn pick_shot(&self) -> Result<PathBuf> {
        if self.source.is_file() {
            return Ok(self.source.clone());
        }

        let images = list_images(&self.source)?;
        anyhow::ensure!(
            !images.is_empty(),
            "No images in {}",
            self.source.display()
        );

        let shot = self.next_shot.fetch_add(1, Ordering::SeqCst) % images.len();
        Ok(images[shot].clone())
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by name
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_image_file(path))
        .collect();
    images.sort();
    Ok(images)
}

#[async_trait::async_trait]
impl Camera for FileCamera {
    fn is_available(&self) -> bool {
        if self.source.is_file() {
            return true;
        }

        list_images(&self.source)
            .map(|images| !images.is_empty())
            .unwrap_or(false)
    }

    async fn capture(&self) -> CaptureOutcome {
        let shot = match self.pick_shot() {
            Ok(shot) => shot,
            Err(e) => {
                tracing::error!("Capture failed: {:#}", e);
                return CaptureOutcome::cancelled();
            }
        };

        tracing::debug!("Capturing {}", shot.display());
        match tokio::fs::read(&shot).await {
            Ok(bytes) => {
                tracing::debug!("Captured {} bytes", bytes.len());
                CaptureOutcome::ok_with_extra(self.extra_key.as_str(), bytes)
            }
            Err(e) => {
                tracing::error!("Failed to read {}: {}", shot.display(), e);
                CaptureOutcome::cancelled()
            }
        }
    }
}
