// ABOUTME: Path command implementation.
// ABOUTME: Prints the deterministic cache location of an image without touching LXD.

use lxd_image::config::Config;
use lxd_image::error::Result;
use lxd_image::output::Output;
use lxd_image::types::ImageMetadata;
use serde::Serialize;

#[derive(Serialize)]
struct PathReport {
    base_dir: String,
    path: String,
    exists: bool,
}

pub fn path(config: &Config, image: &ImageMetadata, output: &Output) -> Result<()> {
    let paths = config.image_paths();
    let path = paths.image_path(image);

    let report = PathReport {
        base_dir: paths.base_dir().display().to_string(),
        path: path.display().to_string(),
        exists: path.exists(),
    };
    output.result(&report.path, &report);
    Ok(())
}
