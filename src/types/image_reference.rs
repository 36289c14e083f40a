// ABOUTME: Opaque image reference issued by the remote image service.
// ABOUTME: Validated so it can double as a file-name stem and URL path segment.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum ImageReferenceError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("image reference exceeds maximum length of 255 characters")]
    TooLong,

    #[error("image reference cannot start with '.'")]
    LeadingDot,

    #[error("invalid character in image reference: {0:?}")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn parse(input: &str) -> Result<Self, ImageReferenceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ImageReferenceError::Empty);
        }

        if input.len() > MAX_LEN {
            return Err(ImageReferenceError::TooLong);
        }

        if input.starts_with('.') {
            return Err(ImageReferenceError::LeadingDot);
        }

        // UUIDs and most opaque ids fit: alphanumeric, hyphen, underscore, dot
        for c in input.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
                return Err(ImageReferenceError::InvalidChar(c));
            }
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ImageReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ImageReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ImageReference::parse(&s).map_err(serde::de::Error::custom)
    }
}
