// ABOUTME: Deterministic on-disk locations for cached image files.
// ABOUTME: Maps image metadata to <base_dir>/<reference>.tar.gz; only ensure_base_dir touches disk.

use crate::types::ImageMetadata;
use std::path::{Path, PathBuf};

/// Directory under the instances path holding cached image files.
pub const BASE_DIR_NAME: &str = "_base";

/// Extension of cached image files (LXD unified tarballs).
pub const IMAGE_EXTENSION: &str = "tar.gz";

/// Resolves where cached image files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePaths {
    base_dir: PathBuf,
}

impl ImagePaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Cache rooted at `<instances_path>/_base`.
    pub fn from_instances_path(instances_path: &Path) -> Self {
        Self::new(instances_path.join(BASE_DIR_NAME))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Local file for an image. Pure: the same metadata always yields the same path.
    ///
    /// Keyed by reference rather than name, since references are unique per
    /// image and validated to be safe file-name stems.
    pub fn image_path(&self, image: &ImageMetadata) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", image.reference, IMAGE_EXTENSION))
    }

    /// Create the base directory and any missing parents.
    ///
    /// Succeeds if the directory already exists, including when another task
    /// creates it between our check and our mkdir.
    pub async fn ensure_base_dir(&self) -> std::io::Result<()> {
        if tokio::fs::try_exists(&self.base_dir).await? {
            return Ok(());
        }
        tracing::debug!("Creating image base directory {}", self.base_dir.display());
        tokio::fs::create_dir_all(&self.base_dir).await
    }
}
