// ABOUTME: Application-wide error types for lxd-image.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::daemon::{AliasError, DaemonError, DaemonInfoError};
use crate::fetch::FetchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Daemon(#[from] DaemonError),

    #[error("LXD query failed: {0}")]
    DaemonQuery(String),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<AliasError> for Error {
    fn from(err: AliasError) -> Self {
        Error::DaemonQuery(err.to_string())
    }
}

impl From<DaemonInfoError> for Error {
    fn from(err: DaemonInfoError) -> Self {
        Error::DaemonQuery(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
