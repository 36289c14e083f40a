// ABOUTME: Daemon socket detection on the local system.
// ABOUTME: Checks $LXD_DIR, then the snap socket, then the native package socket.

use super::types::{DaemonConfig, Installation, SocketInfo};
use std::path::{Path, PathBuf};

/// Error during socket detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no LXD socket found (checked $LXD_DIR, snap and native locations)")]
    NoSocketFound,

    #[error("configured LXD socket does not exist: {0}")]
    ConfiguredSocketMissing(PathBuf),
}

const SNAP_SOCKET: &str = "/var/snap/lxd/common/lxd/unix.socket";
const NATIVE_SOCKET: &str = "/var/lib/lxd/unix.socket";

/// Detect the daemon socket on the local system.
///
/// Detection order (when not explicitly configured):
/// 1. `$LXD_DIR/unix.socket`
/// 2. Snap socket (`/var/snap/lxd/common/lxd/unix.socket`)
/// 3. Native socket (`/var/lib/lxd/unix.socket`)
pub fn detect_local(config: Option<&DaemonConfig>) -> Result<SocketInfo, DetectionError> {
    if let Some(cfg) = config
        && let Some(socket) = &cfg.socket
    {
        if !socket.exists() {
            return Err(DetectionError::ConfiguredSocketMissing(socket.clone()));
        }
        return Ok(SocketInfo {
            installation: Installation::Custom,
            socket_path: socket.clone(),
        });
    }

    // 1. $LXD_DIR
    if let Ok(dir) = std::env::var("LXD_DIR") {
        let socket = Path::new(&dir).join("unix.socket");
        if socket.exists() {
            return Ok(SocketInfo {
                installation: Installation::Custom,
                socket_path: socket,
            });
        }
    }

    // 2. Snap
    if Path::new(SNAP_SOCKET).exists() {
        return Ok(SocketInfo {
            installation: Installation::Snap,
            socket_path: PathBuf::from(SNAP_SOCKET),
        });
    }

    // 3. Native
    if Path::new(NATIVE_SOCKET).exists() {
        return Ok(SocketInfo {
            installation: Installation::Native,
            socket_path: PathBuf::from(NATIVE_SOCKET),
        });
    }

    Err(DetectionError::NoSocketFound)
}
