// ABOUTME: Client side of the local LXD daemon's image store.
// ABOUTME: Socket detection, capability traits, and the REST client over the Unix socket.

mod detection;
mod error;
mod lxd;
pub mod traits;
mod types;

pub use detection::{DetectionError, detect_local};
pub use error::{DaemonError, DaemonErrorKind};
pub use lxd::LxdClient;
pub use traits::{
    AliasConfig, AliasError, AliasOps, Daemon, DaemonInfo, DaemonInfoError, DaemonMetadata,
    ImageError, ImageOps,
};
pub use types::{DaemonConfig, Installation, SocketInfo};
