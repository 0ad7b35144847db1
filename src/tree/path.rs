//! Tag path parsing and normalization utilities

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// A `/`-delimited tag path relative to a provider root.
///
/// Segments are trimmed, empty segments are dropped, and each segment is normalized to
/// Unicode NFC so that lookups by name are deterministic. The empty path denotes the
/// provider root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagPath {
    segments: Vec<String>,
}

impl TagPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-delimited path. Backslashes are accepted as separators too.
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split(['/', '\\'])
            .map(normalize_segment)
            .filter(|s| !s.is_empty())
            .collect();
        Self { segments }
    }

    /// Parse a provider-qualified path such as `[default]Area1/Motor`.
    ///
    /// Returns the provider name (if the path carries one) and the provider-relative path.
    pub fn parse_qualified(raw: &str) -> (Option<String>, Self) {
        let trimmed = raw.trim();
        if let Some(rest) = trimmed.strip_prefix('[') {
            if let Some(end) = rest.find(']') {
                let provider = rest[..end].trim().to_string();
                return (Some(provider), Self::parse(&rest[end + 1..]));
            }
        }
        (None, Self::parse(trimmed))
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = segments
            .into_iter()
            .map(|s| normalize_segment(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn parent(&self) -> Option<TagPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn join(&self, segment: &str) -> TagPath {
        let mut segments = self.segments.clone();
        let segment = normalize_segment(segment);
        if !segment.is_empty() {
            segments.push(segment);
        }
        Self { segments }
    }

    pub fn concat(&self, other: &TagPath) -> TagPath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Segment-wise prefix test: `Area1` is a prefix of `Area1/Motor` but not of `Area10`.
    pub fn starts_with(&self, prefix: &TagPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Remaining path after `prefix`, if `prefix` is a segment-wise prefix.
    pub fn strip_prefix(&self, prefix: &TagPath) -> Option<TagPath> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Self {
            segments: self.segments[prefix.segments.len()..].to_vec(),
        })
    }

    /// Path with the first `n` segments removed.
    pub fn skip(&self, n: usize) -> TagPath {
        Self {
            segments: self.segments.iter().skip(n).cloned().collect(),
        }
    }

    /// Whether this path lies under `base` for target selection.
    ///
    /// An empty base covers every path; the provider root is only covered by an empty base.
    pub fn is_under(&self, base: &TagPath) -> bool {
        base.is_root() || (!self.is_root() && self.starts_with(base))
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl From<&str> for TagPath {
    fn from(raw: &str) -> Self {
        TagPath::parse(raw)
    }
}

impl Serialize for TagPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TagPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TagPath::parse(&raw))
    }
}

/// Normalize one path segment: trim whitespace and compose Unicode to NFC.
pub fn normalize_segment(segment: &str) -> String {
    segment.trim().nfc().collect()
}
