// ABOUTME: Alias operations trait for the image daemon.
// ABOUTME: List alias names and bind a new name to an image fingerprint.

use super::shared_types::AliasConfig;
use async_trait::async_trait;

/// Alias operations: list and create.
#[async_trait]
pub trait AliasOps: Send + Sync {
    /// Names of every alias currently known to the daemon.
    async fn alias_list(&self) -> Result<Vec<String>, AliasError>;

    /// Bind `alias.name` to `alias.target`. Fails if the name is already bound.
    async fn alias_create(&self, alias: &AliasConfig) -> Result<(), AliasError>;
}

/// Errors from alias operations.
#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    #[error("alias already exists: {0}")]
    AlreadyExists(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("daemon error: {0}")]
    Api(String),
}
