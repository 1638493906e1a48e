use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// A single segment in a location: an object key or an array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSegment<'a> {
    Key(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for LocationSegment<'a> {
    fn from(value: &'a str) -> Self {
        LocationSegment::Key(value)
    }
}

impl<'a> From<&'a String> for LocationSegment<'a> {
    fn from(value: &'a String) -> Self {
        LocationSegment::Key(value.as_str())
    }
}

impl From<usize> for LocationSegment<'_> {
    fn from(value: usize) -> Self {
        LocationSegment::Index(value)
    }
}

/// A rendered path into a JSON document, e.g. `feeds[0].items[0].title`.
///
/// Keys join with `.` (no leading dot at the root), indexes render as
/// `[i]`. Immutable and cheap to clone; `join` allocates a new location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(Arc<str>);

impl Location {
    /// The empty root location.
    #[must_use]
    pub fn new() -> Self {
        Location(Arc::from(""))
    }

    /// A new location extended with the given segment.
    #[must_use]
    pub fn join<'a>(&self, segment: impl Into<LocationSegment<'a>>) -> Location {
        let mut buffer = String::with_capacity(self.0.len() + 8);
        buffer.push_str(&self.0);
        match segment.into() {
            LocationSegment::Key(key) => {
                if !buffer.is_empty() {
                    buffer.push('.');
                }
                buffer.push_str(key);
            }
            LocationSegment::Index(index) => {
                buffer.push('[');
                buffer.push_str(itoa::Buffer::new().format(index));
                buffer.push(']');
            }
        }
        Location(buffer.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a dotted/bracketed path back into its segments.
    ///
    /// Accepts the same form `Display` produces (`feeds[0].items[0].title`);
    /// an empty input is the root and yields no segments.
    pub fn parse(input: &str) -> Result<Vec<LocationSegment<'_>>, PathParseError> {
        let mut segments = Vec::new();
        let mut rest = input;
        let mut first = true;
        while !rest.is_empty() {
            if let Some(inner) = rest.strip_prefix('[') {
                let Some(end) = inner.find(']') else {
                    return Err(PathParseError::UnterminatedIndex);
                };
                let index = inner[..end]
                    .parse()
                    .map_err(|_| PathParseError::InvalidIndex(inner[..end].to_string()))?;
                segments.push(LocationSegment::Index(index));
                rest = &inner[end + 1..];
            } else {
                let part = if first {
                    rest
                } else {
                    rest.strip_prefix('.')
                        .ok_or(PathParseError::MissingSeparator)?
                };
                let end = part.find(['.', '[']).unwrap_or(part.len());
                let key = &part[..end];
                if key.is_empty() {
                    return Err(PathParseError::EmptyKey);
                }
                segments.push(LocationSegment::Key(key));
                rest = &part[end..];
            }
            first = false;
        }
        Ok(segments)
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Why a path string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// A key segment was empty (`a..b`, a trailing `.`).
    EmptyKey,
    /// An `[` was never closed.
    UnterminatedIndex,
    /// The bracketed text is not a base-10 array index.
    InvalidIndex(String),
    /// A segment follows another without `.` or `[` between them.
    MissingSeparator,
}

impl fmt::Display for PathParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathParseError::EmptyKey => f.write_str("empty key segment"),
            PathParseError::UnterminatedIndex => f.write_str("unterminated `[` index"),
            PathParseError::InvalidIndex(index) => {
                write!(f, "`{index}` is not a valid array index")
            }
            PathParseError::MissingSeparator => f.write_str("missing `.` between segments"),
        }
    }
}

impl std::error::Error for PathParseError {}
