// ABOUTME: Command module aggregator for the lxd-image CLI.
// ABOUTME: Re-exports fetch, path and status command handlers.

mod fetch;
mod path;
mod status;

pub use fetch::fetch;
pub use path::path;
pub use status::status;

use lxd_image::error::{Error, Result};
use lxd_image::types::{ImageMetadata, ImageName, ImageReference};

/// Validate the name/reference pair given on the command line.
pub fn parse_image(name: &str, reference: &str) -> Result<ImageMetadata> {
    let name = ImageName::new(name).map_err(|e| Error::InvalidArgument(e.to_string()))?;
    let reference =
        ImageReference::parse(reference).map_err(|e| Error::InvalidArgument(e.to_string()))?;
    Ok(ImageMetadata::new(name, reference))
}
