// ABOUTME: Fetch command implementation.
// ABOUTME: Connects to LXD and the image service, then runs the acquisition pipeline once.

use lxd_image::config::Config;
use lxd_image::daemon::LxdClient;
use lxd_image::error::Result;
use lxd_image::fetch::{ImageFetcher, ImageLocks};
use lxd_image::output::Output;
use lxd_image::types::{ImageMetadata, Instance, RequestContext};
use std::time::{SystemTime, UNIX_EPOCH};

/// Ensure one image is present in LXD.
pub async fn fetch(
    config: &Config,
    image: ImageMetadata,
    instance: Option<String>,
    mut output: Output,
) -> Result<()> {
    output.start_timer();

    output.progress("  → Connecting to LXD...");
    let daemon = LxdClient::connect(&config.lxd).await?;
    output.progress(&format!(
        "  → Using socket {}",
        daemon.socket_path().display()
    ));

    let image_service = config.image_service.client()?;

    let mut fetcher = ImageFetcher::new(daemon, image_service, config.image_paths());
    if config.serialize_per_image {
        fetcher = fetcher.with_image_locks(ImageLocks::new());
    }

    let ctx = RequestContext::new(request_id());
    let instance = Instance::new(instance.unwrap_or_default());

    output.progress(&format!(
        "  → Ensuring image {} ({})...",
        image.name, image.reference
    ));
    fetcher.ensure_image(&ctx, &instance, &image).await?;

    output.success(&format!("Image {} is available", image.name));
    Ok(())
}

fn request_id() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("req-{}-{}", std::process::id(), ts)
}
