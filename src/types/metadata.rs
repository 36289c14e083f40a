// ABOUTME: Caller-supplied records passed into the acquisition pipeline.
// ABOUTME: ImageMetadata, the instance being provisioned, and the request context.

use super::{ImageName, ImageReference};
use serde::{Deserialize, Serialize};

/// Descriptive record for an image, as handed over by the compute layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub name: ImageName,
    pub reference: ImageReference,
}

impl ImageMetadata {
    pub fn new(name: ImageName, reference: ImageReference) -> Self {
        Self { name, reference }
    }
}

/// The instance whose boot triggered the fetch. Only used to correlate logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instance {
    pub uuid: String,
}

impl Instance {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into() }
    }
}

/// Per-request credentials and identifiers passed through to the image service.
#[derive(Clone, Default)]
pub struct RequestContext {
    pub request_id: String,
    pub auth_token: Option<String>,
    pub project_id: Option<String>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Default::default()
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

// The token stays out of logs.
impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("project_id", &self.project_id)
            .finish()
    }
}
