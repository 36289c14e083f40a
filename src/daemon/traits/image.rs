// ABOUTME: Image operations trait for the image daemon.
// ABOUTME: Check whether an image is registered and upload a local image file.

use crate::types::ImageReference;
use async_trait::async_trait;
use std::path::Path;

/// Image operations: existence check and upload.
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// Whether the daemon already has an image registered under `reference`.
    async fn image_defined(&self, reference: &ImageReference) -> Result<bool, ImageError>;

    /// Register the contents of the file at `path` as a new image.
    async fn image_upload(&self, path: &Path) -> Result<(), ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to read image file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("daemon error: {0}")]
    Api(String),
}
