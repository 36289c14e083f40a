// ABOUTME: Validated human-readable image name used as the daemon alias.
// ABOUTME: Rejects names the daemon cannot store as an alias path segment.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum ImageNameError {
    #[error("image name cannot be empty")]
    Empty,

    #[error("image name exceeds maximum length of 255 characters")]
    TooLong,

    #[error("image name cannot contain '/'")]
    ContainsSlash,

    #[error("invalid character in image name: {0:?}")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName(String);

impl ImageName {
    pub fn new(value: &str) -> Result<Self, ImageNameError> {
        if value.is_empty() {
            return Err(ImageNameError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(ImageNameError::TooLong);
        }

        for c in value.chars() {
            if c == '/' {
                return Err(ImageNameError::ContainsSlash);
            }
            if c.is_whitespace() || c.is_control() {
                return Err(ImageNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ImageName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ImageName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ImageName::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dotted_names() {
        assert!(ImageName::new("ubuntu-22.04_amd64").is_ok());
    }

    #[test]
    fn rejects_slash_before_other_checks() {
        assert!(matches!(
            ImageName::new("a/b"),
            Err(ImageNameError::ContainsSlash)
        ));
    }

    #[test]
    fn rejects_tab() {
        assert!(matches!(
            ImageName::new("a\tb"),
            Err(ImageNameError::InvalidChar('\t'))
        ));
    }
}
