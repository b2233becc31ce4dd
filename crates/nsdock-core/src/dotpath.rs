//! Dotted flag keys and their CLI rendering.
//!
//! A key like `pipeline.model.near_plane` renders as the flag token
//! `--pipeline.model.near-plane`: underscores become hyphens inside each dot
//! segment, the segments stay joined by dots. Keys are validated at the call
//! that introduces them, so a malformed chain fails where it was written.
//!
//! Keys are compared by normalized name. `viewer.websocket_port` and
//! `viewer_websocket_port` normalize to `viewer.websocket-port` and
//! `viewer-websocket-port`, which are different keys; no collision. Prefix collisions
//! (`viewer` vs `viewer.port`) are checked on whole dot segments only.

use crate::error::{Error, Result};

/// A validated dotted flag key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotPath {
    key: String,
    cli_name: String,
}

impl DotPath {
    /// Parse and normalize a dotted key (underscores → hyphens per segment).
    pub fn parse(key: &str) -> Result<Self> {
        Self::parse_inner(key, false)
    }

    /// Parse a dotted key keeping underscores as-is. Some wrapped tools expose
    /// flags that genuinely contain underscores.
    pub fn parse_verbatim(key: &str) -> Result<Self> {
        Self::parse_inner(key, true)
    }

    fn parse_inner(key: &str, verbatim: bool) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::InvalidArgument("empty flag key".to_string()));
        }
        let mut segments = Vec::new();
        for segment in key.split('.') {
            if segment.is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "flag key `{key}` has an empty dot segment"
                )));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(Error::InvalidArgument(format!(
                    "flag key `{key}`: segment `{segment}` contains characters outside [A-Za-z0-9_-]"
                )));
            }
            segments.push(if verbatim {
                segment.to_string()
            } else {
                segment.replace('_', "-")
            });
        }
        Ok(Self {
            key: key.to_string(),
            cli_name: segments.join("."),
        })
    }

    /// The key as written at the call site.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The normalized name used for comparison and rendering.
    pub fn cli_name(&self) -> &str {
        &self.cli_name
    }

    /// The rendered flag token, e.g. `--viewer.quit-on-train-completion`.
    pub fn flag_token(&self) -> String {
        format!("--{}", self.cli_name)
    }

    /// Whole-segment prefix test on normalized names: `viewer` is a prefix of
    /// `viewer.port` but not of `viewer-port`.
    pub fn is_segment_prefix_of(&self, other: &DotPath) -> bool {
        other.cli_name.len() > self.cli_name.len()
            && other.cli_name.starts_with(&self.cli_name)
            && other.cli_name.as_bytes()[self.cli_name.len()] == b'.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenation_per_segment() {
        let p = DotPath::parse("pipeline.model.near_plane").unwrap();
        assert_eq!(p.cli_name(), "pipeline.model.near-plane");
        assert_eq!(p.flag_token(), "--pipeline.model.near-plane");
    }

    #[test]
    fn test_verbatim_keeps_underscores() {
        let p = DotPath::parse_verbatim("some_tool.raw_flag").unwrap();
        assert_eq!(p.flag_token(), "--some_tool.raw_flag");
    }

    #[test]
    fn test_flat_key_with_underscores() {
        let p = DotPath::parse("viewer_websocket_port").unwrap();
        assert_eq!(p.cli_name(), "viewer-websocket-port");
    }

    #[test]
    fn test_rejects_empty_and_malformed() {
        assert!(DotPath::parse("").is_err());
        assert!(DotPath::parse("viewer..port").is_err());
        assert!(DotPath::parse(".port").is_err());
        assert!(DotPath::parse("viewer.po rt").is_err());
        assert!(DotPath::parse("viewer.$port").is_err());
    }

    #[test]
    fn test_segment_prefix() {
        let ns = DotPath::parse("viewer").unwrap();
        let nested = DotPath::parse("viewer.websocket_port").unwrap();
        let flat = DotPath::parse("viewer_websocket_port").unwrap();
        assert!(ns.is_segment_prefix_of(&nested));
        assert!(!ns.is_segment_prefix_of(&flat));
        assert!(!nested.is_segment_prefix_of(&ns));
    }
}
