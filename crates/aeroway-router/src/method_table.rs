//! Per-node method table.
//!
//! Maps HTTP methods to template identifiers for one path shape. The DSS
//! surface registers at most a few methods per path, so a small vector
//! beats a hash map here.

use http::Method;
use smallvec::SmallVec;

/// Maps HTTP methods to template identifiers for a single path shape.
///
/// # Example
///
/// ```rust
/// use aeroway_router::MethodTable;
/// use http::Method;
///
/// let mut table = MethodTable::new();
/// table.insert(Method::GET, 2usize);
/// table.insert(Method::DELETE, 1usize);
///
/// assert_eq!(table.get(&Method::GET), Some(&2));
/// assert_eq!(table.get(&Method::POST), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MethodTable<T> {
    entries: SmallVec<[(Method, T); 2]>,
}

impl<T> MethodTable<T> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Registers a template for a method.
    ///
    /// Returns `false` and leaves the table unchanged if the method is
    /// already registered — the first registration wins.
    pub fn insert(&mut self, method: Method, template: T) -> bool {
        if self.entries.iter().any(|(m, _)| *m == method) {
            return false;
        }
        self.entries.push((method, template));
        true
    }

    /// Returns the template registered for a method.
    #[must_use]
    pub fn get(&self, method: &Method) -> Option<&T> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, t)| t)
    }

    /// Returns true if no methods are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
