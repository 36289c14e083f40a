// ABOUTME: Daemon connection type definitions.
// ABOUTME: Includes Installation enum, SocketInfo and the daemon config section.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// How the daemon was installed, which decides where its socket lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installation {
    /// `$LXD_DIR` or an explicitly configured socket.
    Custom,
    /// Snap package (`/var/snap/lxd/common/lxd`).
    Snap,
    /// Distribution package (`/var/lib/lxd`).
    Native,
}

impl std::fmt::Display for Installation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Installation::Custom => write!(f, "custom"),
            Installation::Snap => write!(f, "snap"),
            Installation::Native => write!(f, "native"),
        }
    }
}

/// Detected socket information.
#[derive(Debug, Clone)]
pub struct SocketInfo {
    /// Where the socket was found.
    pub installation: Installation,
    /// Path to the daemon's Unix socket.
    pub socket_path: PathBuf,
}

/// The `lxd` section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Explicit socket path (overrides detection).
    #[serde(default)]
    pub socket: Option<PathBuf>,
    /// Passed to the daemon as the wait timeout for background operations.
    #[serde(default = "default_operation_timeout", with = "humantime_serde")]
    pub operation_timeout: Duration,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket: None,
            operation_timeout: default_operation_timeout(),
        }
    }
}

fn default_operation_timeout() -> Duration {
    Duration::from_secs(300)
}
