// ABOUTME: Remote image service client.
// ABOUTME: ImageService trait (download by reference) and the Glance HTTP implementation.

mod glance;

pub use glance::GlanceImageService;

use crate::types::{ImageReference, RequestContext};
use async_trait::async_trait;
use std::path::Path;

/// Materializes image bytes held by a remote image service.
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Fetch the full bytes of `reference` into `dest`.
    ///
    /// Makes no promise about `dest` after a failure: a partial file may remain.
    async fn download(
        &self,
        ctx: &RequestContext,
        reference: &ImageReference,
        dest: &Path,
    ) -> Result<(), DownloadError>;
}

/// Errors from image downloads.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("invalid image service endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("image not found in image service: {0}")]
    NotFound(String),

    #[error("not authorized to download image {0}")]
    Unauthorized(String),

    #[error("image {0} has no data")]
    NoData(String),

    #[error("image service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("download truncated: expected {expected} bytes, received {received}")]
    Truncated { expected: u64, received: u64 },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
