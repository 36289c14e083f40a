// ABOUTME: Shared types used across daemon trait definitions.
// ABOUTME: AliasConfig for alias creation and DaemonMetadata for info queries.

use crate::types::{Fingerprint, ImageName};
use serde::Serialize;

/// Request body for creating an alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasConfig {
    /// Alias name.
    pub name: String,
    /// Fingerprint of the image the alias points at.
    pub target: Fingerprint,
    /// Free-form description.
    pub description: String,
}

impl AliasConfig {
    pub fn new(name: &ImageName, target: Fingerprint) -> Self {
        Self {
            name: name.to_string(),
            target,
            description: String::new(),
        }
    }
}

/// Daemon version information.
#[derive(Debug, Clone, Default)]
pub struct DaemonMetadata {
    /// Server version (e.g. "5.21.1").
    pub version: String,
    /// REST API version (e.g. "1.0").
    pub api_version: String,
    /// "trusted" or "untrusted".
    pub auth: String,
    /// Storage driver backing the image store.
    pub storage: String,
}
