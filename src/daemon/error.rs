// ABOUTME: Daemon error types with SNAFU pattern.
// ABOUTME: Unifies socket detection and connection errors for programmatic handling.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::DaemonInfoError;

/// Unified daemon error for detection and connection failures.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DaemonError {
    #[snafu(display("LXD socket detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("LXD connection failed: {source}"))]
    Connection { source: DaemonInfoError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonErrorKind {
    /// No daemon socket found on the system.
    NoSocketFound,
    /// Failed to connect to the daemon socket.
    ConnectionFailed,
    /// The daemon answered with an error.
    DaemonOperation,
}

impl DaemonError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DaemonErrorKind {
        match self {
            DaemonError::Detection { .. } => DaemonErrorKind::NoSocketFound,
            DaemonError::Connection { source } => match source {
                DaemonInfoError::ConnectionFailed(_) => DaemonErrorKind::ConnectionFailed,
                DaemonInfoError::Api(_) => DaemonErrorKind::DaemonOperation,
            },
        }
    }

    /// Returns connection error details if this is a connection failure.
    pub fn connection_details(&self) -> Option<&str> {
        match self {
            DaemonError::Connection {
                source: DaemonInfoError::ConnectionFailed(msg),
            } => Some(msg),
            _ => None,
        }
    }
}

impl From<DetectionError> for DaemonError {
    fn from(source: DetectionError) -> Self {
        DaemonError::Detection { source }
    }
}

impl From<DaemonInfoError> for DaemonError {
    fn from(source: DaemonInfoError) -> Self {
        DaemonError::Connection { source }
    }
}
