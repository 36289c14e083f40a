// ABOUTME: Drop guard that deletes a local file unless explicitly disarmed.
// ABOUTME: Covers error returns, panics and cancelled futures alike.

use std::path::{Path, PathBuf};

/// Removes `path` when dropped, unless [`RemoveOnError::disarm`] was called first.
#[must_use = "the file is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RemoveOnError {
    path: Option<PathBuf>,
}

impl RemoveOnError {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Keep the file.
    pub fn disarm(mut self) {
        self.path = None;
    }
}

impl Drop for RemoveOnError {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };

        // Drop can't be async; a single unlink is fine to do inline
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::warn!("Removed {} after failed image fetch", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}
