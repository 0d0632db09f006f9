use super::version::parse_release_version;
use crate::error::{ReleaseError, Result};

const VERSION_PLACEHOLDER: &str = "{version}";

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pattern: String,
}

impl TagPattern {
    /// Create a tag pattern, rejecting patterns without a `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains(VERSION_PLACEHOLDER) {
            return Err(ReleaseError::config(format!(
                "Tag format '{}' must contain {} placeholder",
                pattern, VERSION_PLACEHOLDER
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &semver::Version) -> String {
        self.pattern.replace(VERSION_PLACEHOLDER, &version.to_string())
    }

    /// Recover the version from a tag written with this pattern
    ///
    /// Tags that do not carry the pattern's prefix and suffix are parsed as
    /// bare versions, so `1.2.3` and `v1.2.3` are accepted by any pattern.
    pub fn parse(&self, tag: &str) -> Option<semver::Version> {
        let (prefix, suffix) = self
            .pattern
            .split_once(VERSION_PLACEHOLDER)
            .unwrap_or((self.pattern.as_str(), ""));
        tag.strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(suffix))
            .and_then(parse_release_version)
            .or_else(|| parse_release_version(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: "v{version}".to_string(),
        }
    }
}
