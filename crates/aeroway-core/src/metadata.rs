//! Call metadata: header/trailer key-value data carried alongside a call.
//!
//! Keys are normalized to lowercase on insert, matching RPC metadata
//! conventions, and iteration order is the insertion order so responses
//! are deterministic.

use indexmap::IndexMap;

/// An ordered, case-insensitive multimap of metadata entries.
///
/// # Example
///
/// ```
/// use aeroway_core::Metadata;
///
/// let mut md = Metadata::new();
/// md.append("X-Node", "dss-1");
/// md.append("x-node", "dss-2");
///
/// assert_eq!(md.get("x-node"), Some(&["dss-1".to_string(), "dss-2".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    inner: IndexMap<String, Vec<String>>,
}

impl Metadata {
    /// Creates an empty metadata map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under a key, preserving existing values.
    pub fn append(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.inner
            .entry(key.as_ref().to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Returns all values for a key, in insertion order.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.inner
            .get(&key.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// Returns the first value for a key.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    /// Iterates over (key, value) pairs in insertion order, one pair per
    /// value for repeated keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Returns true if no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Header and trailer metadata captured from one backend call.
///
/// Both sections are captured regardless of whether the call succeeded:
/// a failed call may still carry diagnostic metadata worth forwarding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallMetadata {
    /// Metadata delivered before the response payload.
    pub headers: Metadata,
    /// Metadata delivered after the response payload.
    pub trailers: Metadata,
}

impl CallMetadata {
    /// Creates empty call metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
