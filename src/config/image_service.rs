// ABOUTME: Image service section of the config file.
// ABOUTME: Endpoint URL and the optional default auth token.

use super::EnvValue;
use crate::error::{Error, Result};
use crate::image_service::GlanceImageService;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ImageServiceConfig {
    /// Base URL, e.g. `http://controller:9292`.
    pub endpoint: String,
    /// Used when the request context carries no token.
    #[serde(default)]
    pub token: Option<EnvValue>,
}

impl ImageServiceConfig {
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        let host = endpoint.strip_prefix("http://").ok_or_else(|| {
            Error::InvalidConfig(format!(
                "image_service.endpoint must start with http://, got {}",
                endpoint
            ))
        })?;
        if host.is_empty() || host.starts_with('/') {
            return Err(Error::InvalidConfig(
                "image_service.endpoint is missing a host".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the client, resolving the token from the environment if needed.
    pub fn client(&self) -> Result<GlanceImageService> {
        let token = self.token.as_ref().map(EnvValue::resolve).transpose()?;
        GlanceImageService::new(self.endpoint.trim(), token)
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}
