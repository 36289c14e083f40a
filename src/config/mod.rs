// ABOUTME: Configuration types and parsing for lxd-image.yml.
// ABOUTME: Handles YAML parsing, discovery, validation and env var indirection.

mod env_value;
mod image_service;
mod init;

pub use crate::daemon::DaemonConfig;
pub use env_value::EnvValue;
pub use image_service::ImageServiceConfig;
pub use init::init_config;

use crate::error::{Error, Result};
use crate::paths::ImagePaths;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "lxd-image.yml";
pub const CONFIG_FILENAME_ALT: &str = "lxd-image.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".lxd-image/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_instances_path")]
    pub instances_path: PathBuf,

    #[serde(default)]
    pub serialize_per_image: bool,

    #[serde(default)]
    pub lxd: DaemonConfig,

    pub image_service: ImageServiceConfig,
}

fn default_instances_path() -> PathBuf {
    PathBuf::from("/var/lib/nova/instances")
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        if self.instances_path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "instances_path cannot be empty".to_string(),
            ));
        }
        // The daemon takes the wait timeout in whole seconds
        if self.lxd.operation_timeout < Duration::from_secs(1) {
            return Err(Error::InvalidConfig(
                "lxd.operation_timeout must be at least 1s".to_string(),
            ));
        }
        self.image_service.validate()
    }

    /// Path resolver rooted at `<instances_path>/_base`.
    pub fn image_paths(&self) -> ImagePaths {
        ImagePaths::from_instances_path(&self.instances_path)
    }
}
