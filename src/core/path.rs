//! Path segments addressing nodes inside a JSON document
//!
//! A path is an ordered list of steps. Each step either names an object
//! property or is the wildcard `"[]"`, which fans out over every element of
//! the current array.

use crate::core::error::SpecError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Literal spelling of the array wildcard segment
pub const WILDCARD: &str = "[]";

/// One step of a traversal path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Descend into the named property of an object
    Property(String),

    /// Visit every element of an array
    Wildcard,
}

impl PathSegment {
    /// Parse a single segment, rejecting the empty string
    pub fn parse(raw: &str, index: usize) -> Result<Self, SpecError> {
        match raw {
            "" => Err(SpecError::EmptySegment { index }),
            WILDCARD => Ok(PathSegment::Wildcard),
            name => Ok(PathSegment::Property(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PathSegment::Property(name) => name,
            PathSegment::Wildcard => WILDCARD,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, validated sequence of [`PathSegment`]s
///
/// An empty path addresses the node the walk starts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPath {
    segments: Vec<PathSegment>,
}

impl LinkPath {
    /// The empty path ("inject here")
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from raw segment strings
    ///
    /// # Examples
    ///
    /// ```
    /// use hypermedia::core::path::{LinkPath, PathSegment};
    ///
    /// let path = LinkPath::parse(["Results", "[]"]).unwrap();
    /// assert_eq!(path.segments()[1], PathSegment::Wildcard);
    /// assert!(LinkPath::parse(["Results", ""]).is_err());
    /// ```
    pub fn parse<I, S>(raw: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = raw
            .into_iter()
            .enumerate()
            .map(|(index, segment)| PathSegment::parse(segment.as_ref(), index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for LinkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        let joined: Vec<&str> = self.segments.iter().map(PathSegment::as_str).collect();
        f.write_str(&joined.join("/"))
    }
}

impl Serialize for LinkPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.segments.iter().map(PathSegment::as_str))
    }
}

impl<'de> Deserialize<'de> for LinkPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        LinkPath::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_segments() {
        let path = LinkPath::parse(["Results", "[]", "Lines"]).unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Property("Results".to_string()),
                PathSegment::Wildcard,
                PathSegment::Property("Lines".to_string()),
            ]
        );
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_empty_path_is_root() {
        let path = LinkPath::parse(Vec::<String>::new()).unwrap();
        assert!(path.is_empty());
        assert_eq!(path, LinkPath::root());
        assert_eq!(path.to_string(), "$");
    }

    #[test]
    fn test_empty_segment_reports_index() {
        let err = LinkPath::parse(["a", "b", ""]).unwrap_err();
        assert_eq!(err, SpecError::EmptySegment { index: 2 });
    }

    #[test]
    fn test_property_names_are_not_normalized() {
        let path = LinkPath::parse(["orderNo", " [] "]).unwrap();
        assert_eq!(path.segments()[0].as_str(), "orderNo");
        assert_eq!(
            path.segments()[1],
            PathSegment::Property(" [] ".to_string())
        );
    }

    #[test]
    fn test_display_and_serde() {
        let path = LinkPath::parse(["Results", "[]"]).unwrap();
        assert_eq!(path.to_string(), "Results/[]");

        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!(["Results", "[]"]));

        let back: LinkPath = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);
    }
}
