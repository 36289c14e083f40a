// ABOUTME: Error types for the image acquisition pipeline.
// ABOUTME: ImageUnacceptable for rejected images; collaborator errors pass through untranslated.

use crate::daemon::{AliasError, ImageError};
use crate::image_service::DownloadError;
use crate::types::ImageReference;
use std::path::PathBuf;

/// Reason given when the daemon already holds the image or its alias.
pub const IMAGE_EXISTS_REASON: &str = "Image already exists.";

/// Errors that can occur while ensuring an image is present.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The daemon refused the image. Fatal to this provisioning attempt.
    #[error("image {reference} is unacceptable: {reason}")]
    ImageUnacceptable {
        reference: ImageReference,
        reason: String,
    },

    /// Listing aliases failed.
    #[error("failed to list image aliases: {0}")]
    AliasQuery(AliasError),

    /// Checking whether the image is registered failed.
    #[error("failed to check image registration: {0}")]
    ImageQuery(ImageError),

    /// The image service could not deliver the image.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Local filesystem failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    ImageUnacceptable,
    Daemon,
    Download,
    Filesystem,
}

impl FetchError {
    pub fn unacceptable(reference: &ImageReference, reason: impl Into<String>) -> Self {
        FetchError::ImageUnacceptable {
            reference: reference.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::ImageUnacceptable { .. } => FetchErrorKind::ImageUnacceptable,
            FetchError::AliasQuery(_) | FetchError::ImageQuery(_) => FetchErrorKind::Daemon,
            FetchError::Download(_) => FetchErrorKind::Download,
            FetchError::Io { .. } => FetchErrorKind::Filesystem,
        }
    }

    /// The rejection reason, if the image was found unacceptable.
    pub fn unacceptable_reason(&self) -> Option<&str> {
        match self {
            FetchError::ImageUnacceptable { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
