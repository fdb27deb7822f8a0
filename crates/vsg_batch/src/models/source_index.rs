//! Source keys: which input file a track or path belongs to.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifies a job source by position.
///
/// Stored 0-based, shown 1-based: `SourceIndex::new(0)` is "Source 1", the
/// reference source. Serializes as its display key so layouts and queue
/// snapshots stay readable.
///
/// ```
/// use vsg_batch::models::SourceIndex;
///
/// let src = SourceIndex::parse("Source 2").unwrap();
/// assert_eq!(src.index(), 1);
/// assert_eq!(src.key(), "Source 2");
/// assert!(!src.is_reference());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceIndex(usize);

impl SourceIndex {
    /// Create from a 0-based position.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The reference source, "Source 1".
    pub const fn reference() -> Self {
        Self(0)
    }

    /// 0-based position.
    pub fn index(&self) -> usize {
        self.0
    }

    /// 1-based number used in keys.
    pub fn number(&self) -> usize {
        self.0 + 1
    }

    /// Display key: "Source 1", "Source 2", ...
    pub fn key(&self) -> String {
        format!("Source {}", self.number())
    }

    /// Whether this is the reference source.
    pub fn is_reference(&self) -> bool {
        self.0 == 0
    }

    /// Parse a "Source N" key (N >= 1).
    pub fn parse(s: &str) -> Option<Self> {
        s.trim()
            .strip_prefix("Source ")
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n >= 1)
            .map(|n| Self(n - 1))
    }
}

impl fmt::Display for SourceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source {}", self.number())
    }
}

impl Serialize for SourceIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for SourceIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid source key '{}', expected 'Source N' where N >= 1",
                s
            ))
        })
    }
}

/// Where a selected track comes from: an indexed job source, or a file the
/// user added by hand (external subtitles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRef {
    /// One of the job's sources.
    Index(SourceIndex),
    /// A user-supplied file outside the job's sources.
    External,
}

impl SourceRef {
    /// Wire key: "Source N" or "External".
    pub fn key(&self) -> String {
        match self {
            Self::Index(idx) => idx.key(),
            Self::External => "External".to_string(),
        }
    }

    /// Parse "Source N" or "External" (case-insensitive for the latter).
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("External") {
            Some(Self::External)
        } else {
            SourceIndex::parse(s).map(Self::Index)
        }
    }

    /// The indexed source, if any.
    pub fn as_index(&self) -> Option<SourceIndex> {
        match self {
            Self::Index(idx) => Some(*idx),
            Self::External => None,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External)
    }

    /// Whether this refers to "Source 1".
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Index(idx) if idx.is_reference())
    }
}

impl From<SourceIndex> for SourceRef {
    fn from(idx: SourceIndex) -> Self {
        Self::Index(idx)
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl Serialize for SourceRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for SourceRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid source reference '{}', expected 'Source N' or 'External'",
                s
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert_eq!(
            SourceIndex::parse("Source 1"),
            Some(SourceIndex::reference())
        );
        assert_eq!(SourceIndex::parse("Source 4"), Some(SourceIndex::new(3)));
        assert_eq!(SourceIndex::parse("Source 0"), None);
        assert_eq!(SourceIndex::parse("Source"), None);
        assert_eq!(SourceIndex::parse("Track 1"), None);
    }

    #[test]
    fn sources_order_by_number() {
        let mut keys = vec![
            SourceIndex::new(2),
            SourceIndex::reference(),
            SourceIndex::new(1),
        ];
        keys.sort();
        let names: Vec<String> = keys.iter().map(|k| k.key()).collect();
        assert_eq!(names, vec!["Source 1", "Source 2", "Source 3"]);
    }

    #[test]
    fn source_ref_reference_check() {
        assert!(SourceRef::Index(SourceIndex::reference()).is_reference());
        assert!(!SourceRef::Index(SourceIndex::new(1)).is_reference());
        assert!(!SourceRef::External.is_reference());
        assert_eq!(SourceRef::parse("external"), Some(SourceRef::External));
    }

    #[test]
    fn source_ref_serializes_as_key() {
        let json = serde_json::to_string(&SourceRef::Index(SourceIndex::new(1))).unwrap();
        assert_eq!(json, "\"Source 2\"");
        let parsed: SourceRef = serde_json::from_str("\"External\"").unwrap();
        assert_eq!(parsed, SourceRef::External);
        assert!(serde_json::from_str::<SourceRef>("\"Nowhere\"").is_err());
    }
}
