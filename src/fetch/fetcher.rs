// ABOUTME: ImageFetcher orchestrates alias check, download, upload and alias creation.
// ABOUTME: The local file is removed on any failure once the download step is entered.

use super::cleanup::RemoveOnError;
use super::digest::image_digest;
use super::error::{FetchError, IMAGE_EXISTS_REASON};
use super::locks::ImageLocks;
use crate::daemon::{AliasConfig, Daemon};
use crate::image_service::ImageService;
use crate::paths::ImagePaths;
use crate::types::{ImageMetadata, Instance, RequestContext};

/// Makes sure an image is downloaded, uploaded to the daemon and aliased.
///
/// Both collaborators are injected, so one fetcher can be shared (behind an
/// `Arc`) by every instance boot on the host.
pub struct ImageFetcher<D, S> {
    daemon: D,
    image_service: S,
    paths: ImagePaths,
    locks: Option<ImageLocks>,
}

impl<D, S> std::fmt::Debug for ImageFetcher<D, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("paths", &self.paths)
            .field("locks", &self.locks.is_some())
            .finish()
    }
}

impl<D: Daemon, S: ImageService> ImageFetcher<D, S> {
    pub fn new(daemon: D, image_service: S, paths: ImagePaths) -> Self {
        Self {
            daemon,
            image_service,
            paths,
            locks: None,
        }
    }

    /// Serialize concurrent fetches of the same image name through `locks`.
    ///
    /// Without this, two callers racing on a new image both download it and
    /// the daemon's duplicate rejection decides the loser.
    pub fn with_image_locks(mut self, locks: ImageLocks) -> Self {
        self.locks = Some(locks);
        self
    }

    pub fn paths(&self) -> &ImagePaths {
        &self.paths
    }

    pub fn daemon(&self) -> &D {
        &self.daemon
    }

    /// Ensure `image` is registered with the daemon under its name.
    ///
    /// Returns immediately when the alias already exists. Otherwise downloads
    /// the image (unless a cached file is already present), uploads it and
    /// points the alias at the file's SHA-256.
    ///
    /// # Errors
    ///
    /// - `FetchError::ImageUnacceptable` if the daemon already has the image,
    ///   rejects the upload, or refuses the alias.
    /// - `FetchError::Download`, `FetchError::Io` and the query variants pass
    ///   collaborator failures through unchanged.
    ///
    /// Nothing is retried, and nothing is rolled back on the daemon side.
    pub async fn ensure_image(
        &self,
        ctx: &RequestContext,
        instance: &Instance,
        image: &ImageMetadata,
    ) -> Result<(), FetchError> {
        let _held = match &self.locks {
            Some(locks) => Some(locks.lock(&image.name).await),
            None => None,
        };

        tracing::debug!(
            instance = %instance.uuid,
            request_id = %ctx.request_id,
            "Fetching image {} ({})",
            image.name,
            image.reference
        );

        self.fetch(ctx, image).await
    }

    async fn fetch(&self, ctx: &RequestContext, image: &ImageMetadata) -> Result<(), FetchError> {
        let reference = &image.reference;

        let aliases = self
            .daemon
            .alias_list()
            .await
            .map_err(FetchError::AliasQuery)?;
        if aliases.iter().any(|alias| alias == image.name.as_str()) {
            tracing::debug!("Alias {} already present", image.name);
            return Ok(());
        }

        self.paths
            .ensure_base_dir()
            .await
            .map_err(|e| FetchError::io(self.paths.base_dir(), e))?;

        let path = self.paths.image_path(image);
        let cached = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| FetchError::io(&path, e))?;

        // From here on the file is ours to clean up, including a partial download
        let guard = RemoveOnError::new(&path);

        if cached {
            tracing::info!(
                "Found cached {} without alias {}, registering it",
                path.display(),
                image.name
            );
        } else {
            self.image_service.download(ctx, reference, &path).await?;
        }

        let defined = self
            .daemon
            .image_defined(reference)
            .await
            .map_err(FetchError::ImageQuery)?;
        if defined {
            return Err(FetchError::unacceptable(reference, IMAGE_EXISTS_REASON));
        }

        tracing::info!("Uploading image {}", path.display());
        self.daemon.image_upload(&path).await.map_err(|e| {
            FetchError::unacceptable(reference, format!("Image failed to upload: {}", e))
        })?;

        let fingerprint = image_digest(&path)
            .await
            .map_err(|e| FetchError::io(&path, e))?;

        let alias = AliasConfig::new(&image.name, fingerprint);
        tracing::info!("Creating alias {} -> {}", alias.name, alias.target);
        self.daemon.alias_create(&alias).await.map_err(|e| {
            tracing::debug!("Alias creation failed: {}", e);
            FetchError::unacceptable(reference, IMAGE_EXISTS_REASON)
        })?;

        guard.disarm();
        Ok(())
    }
}
