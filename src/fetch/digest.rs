// ABOUTME: Content digest of a local image file.
// ABOUTME: Hex SHA-256 over the whole file, used as the alias target.

use crate::types::Fingerprint;
use sha2::{Digest, Sha256};
use std::path::Path;

/// SHA-256 of the file's full contents, lowercase hex.
pub async fn image_digest(path: &Path) -> std::io::Result<Fingerprint> {
    let data = tokio::fs::read(path).await?;
    Ok(Fingerprint::new(hex::encode(Sha256::digest(&data))))
}
