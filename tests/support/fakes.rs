// ABOUTME: In-memory daemon and image service that record every call.
// ABOUTME: Failure modes are switched on per test through the shared state.

use async_trait::async_trait;
use lxd_image::daemon::{AliasConfig, AliasError, AliasOps, ImageError, ImageOps};
use lxd_image::image_service::{DownloadError, ImageService};
use lxd_image::types::{ImageReference, RequestContext};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct DaemonState {
    pub aliases: Vec<String>,
    pub defined: bool,
    pub fail_upload: Option<String>,
    pub panic_on_upload: bool,
    pub fail_alias: bool,

    pub alias_list_calls: usize,
    pub defined_calls: usize,
    /// Path and the bytes it held when the upload happened.
    pub uploads: Vec<(PathBuf, Vec<u8>)>,
    pub created_aliases: Vec<AliasConfig>,
}

impl DaemonState {
    pub fn total_calls(&self) -> usize {
        self.alias_list_calls + self.defined_calls + self.uploads.len() + self.created_aliases.len()
    }
}

/// Daemon double. Clones share state, so tests keep one handle for assertions.
#[derive(Debug, Clone, Default)]
pub struct FakeDaemon {
    pub state: Arc<Mutex<DaemonState>>,
}

impl FakeDaemon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aliases(aliases: &[&str]) -> Self {
        let daemon = Self::new();
        daemon.state.lock().aliases = aliases.iter().map(|s| s.to_string()).collect();
        daemon
    }
}

#[async_trait]
impl AliasOps for FakeDaemon {
    async fn alias_list(&self) -> Result<Vec<String>, AliasError> {
        let mut state = self.state.lock();
        state.alias_list_calls += 1;
        Ok(state.aliases.clone())
    }

    async fn alias_create(&self, alias: &AliasConfig) -> Result<(), AliasError> {
        let mut state = self.state.lock();
        if state.fail_alias || state.aliases.contains(&alias.name) {
            return Err(AliasError::AlreadyExists(alias.name.clone()));
        }
        state.aliases.push(alias.name.clone());
        state.created_aliases.push(alias.clone());
        Ok(())
    }
}

#[async_trait]
impl ImageOps for FakeDaemon {
    async fn image_defined(&self, _reference: &ImageReference) -> Result<bool, ImageError> {
        let mut state = self.state.lock();
        state.defined_calls += 1;
        Ok(state.defined)
    }

    async fn image_upload(&self, path: &Path) -> Result<(), ImageError> {
        let data = std::fs::read(path).map_err(|e| ImageError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut state = self.state.lock();
        if state.panic_on_upload {
            drop(state);
            panic!("daemon client crashed mid-upload");
        }
        if let Some(reason) = &state.fail_upload {
            return Err(ImageError::UploadFailed(reason.clone()));
        }
        state.uploads.push((path.to_path_buf(), data));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFailure {
    /// Fail before writing anything.
    NotFound,
    /// Write half the bytes, then fail.
    Partial,
    /// Write half the bytes, then never finish.
    Hang,
}

#[derive(Debug, Default)]
pub struct ServiceState {
    pub data: Vec<u8>,
    pub failure: Option<DownloadFailure>,
    pub delay: Option<Duration>,
    pub calls: Vec<(ImageReference, PathBuf)>,
    pub tokens: Vec<Option<String>>,
}

/// Image service double writing `data` to the destination.
#[derive(Debug, Clone, Default)]
pub struct FakeImageService {
    pub state: Arc<Mutex<ServiceState>>,
}

impl FakeImageService {
    pub fn serving(data: &[u8]) -> Self {
        let service = Self::default();
        service.state.lock().data = data.to_vec();
        service
    }

    pub fn failing(failure: DownloadFailure, data: &[u8]) -> Self {
        let service = Self::serving(data);
        service.state.lock().failure = Some(failure);
        service
    }

    pub fn download_count(&self) -> usize {
        self.state.lock().calls.len()
    }
}

#[async_trait]
impl ImageService for FakeImageService {
    async fn download(
        &self,
        ctx: &RequestContext,
        reference: &ImageReference,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        let (data, failure, delay) = {
            let mut state = self.state.lock();
            state.calls.push((reference.clone(), dest.to_path_buf()));
            state.tokens.push(ctx.auth_token.clone());
            (state.data.clone(), state.failure, state.delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let write = |bytes: &[u8]| {
            std::fs::write(dest, bytes).map_err(|source| DownloadError::Write {
                path: dest.display().to_string(),
                source,
            })
        };

        match failure {
            None => write(&data),
            Some(DownloadFailure::NotFound) => Err(DownloadError::NotFound(reference.to_string())),
            Some(DownloadFailure::Partial) => {
                write(&data[..data.len() / 2])?;
                Err(DownloadError::Truncated {
                    expected: data.len() as u64,
                    received: (data.len() / 2) as u64,
                })
            }
            Some(DownloadFailure::Hang) => {
                write(&data[..data.len() / 2])?;
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}
