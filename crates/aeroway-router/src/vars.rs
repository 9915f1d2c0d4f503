//! Path variable storage.
//!
//! Small-vector backed (name, value) pairs; route templates declare at
//! most a handful of variables so the common case never touches the heap.

use smallvec::SmallVec;

/// Variables stored inline before spilling to the heap.
const INLINE_VARS: usize = 4;

/// Path variables extracted by a successful route match.
///
/// # Example
///
/// ```rust
/// use aeroway_router::PathVars;
///
/// let mut vars = PathVars::new();
/// vars.push("id", "abc123");
///
/// assert_eq!(vars.get("id"), Some("abc123"));
/// assert_eq!(vars.get("owner"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathVars {
    inner: SmallVec<[(String, String); INLINE_VARS]>,
}

impl PathVars {
    /// Creates an empty variable set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value of a variable by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if no variables were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over (name, value) pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Truncates to `len` variables, dropping later captures.
    ///
    /// Used by the matcher to backtrack after a failed variable branch.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }
}

impl FromIterator<(String, String)> for PathVars {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
