// ABOUTME: Daemon info trait.
// ABOUTME: Query server version and check connectivity.

use super::shared_types::DaemonMetadata;
use async_trait::async_trait;

/// Daemon metadata operations.
#[async_trait]
pub trait DaemonInfo: Send + Sync {
    /// Get server version and metadata.
    async fn info(&self) -> Result<DaemonMetadata, DaemonInfoError>;

    /// Ping the daemon to check connectivity.
    async fn ping(&self) -> Result<(), DaemonInfoError>;
}

/// Errors from daemon info operations.
#[derive(Debug, thiserror::Error)]
pub enum DaemonInfoError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("daemon error: {0}")]
    Api(String),
}
