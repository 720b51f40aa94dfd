use std::fmt;

use serde::Serialize;

/// An ordered sequence of non-empty segments identifying a subtree of a
/// document. Parsed from a `$ref` string by splitting on `/` and discarding
/// the leading `#` anchor. Equality is segment-wise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RefPath(Vec<String>);

impl RefPath {
    /// Parse a reference string like `#/components/schemas/Pet`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.strip_prefix('#').unwrap_or(raw);
        Self(
            trimmed
                .split('/')
                .filter(|s| !s.is_empty())
                .map(decode_segment)
                .collect(),
        )
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments.into_iter().filter(|s| !s.is_empty()).collect())
    }

    /// A new path with one more segment appended.
    pub fn join(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RefPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#/{}", self.0.join("/"))
    }
}

/// JSON pointer unescaping: `~1` is `/`, `~0` is `~`.
fn decode_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
