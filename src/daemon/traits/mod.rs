// ABOUTME: Composable capability traits for the local image daemon.
// ABOUTME: Defines AliasOps, ImageOps and DaemonInfo, plus the Daemon umbrella trait.

mod alias;
mod daemon_info;
mod image;
mod shared_types;

pub use alias::{AliasError, AliasOps};
pub use daemon_info::{DaemonInfo, DaemonInfoError};
pub use image::{ImageError, ImageOps};
pub use shared_types::*;

/// Everything the acquisition pipeline needs from the daemon.
///
/// Implemented automatically for any type providing both capabilities.
pub trait Daemon: AliasOps + ImageOps {}

impl<T: AliasOps + ImageOps> Daemon for T {}
