//! Route-template matcher for the Aeroway gateway.
//!
//! Route templates (`DELETE /dss/subscriptions/{id}`) are compiled once at
//! startup into a radix tree. Matching an incoming method and path walks
//! the tree in time proportional to the path length, not to the number of
//! templates, and extracts the values of all declared path variables.
//!
//! # Matching rules
//!
//! - Literal segments are preferred over variable-capturing segments when
//!   both could match.
//! - The method participates in matching: a branch whose terminal is
//!   registered only for other methods is backtracked past, so a literal
//!   never shadows a variable sibling that does carry the method.
//! - The first-registered template wins: a later registration for the same
//!   method and path shape is ignored.
//! - A path with a trailing slash never matches a template without one; a
//!   variable never captures an empty segment.
//! - Paths containing undecoded percent-escapes never match.
//! - No match is a normal outcome, expressed as `None`.
//!
//! # Example
//!
//! ```rust
//! use aeroway_router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.route(Method::GET, "/dss/subscriptions", 0usize);
//! router.route(Method::GET, "/dss/subscriptions/{id}", 1usize);
//!
//! let matched = router.match_route(&Method::GET, "/dss/subscriptions/abc123").unwrap();
//! assert_eq!(matched.template, 1);
//! assert_eq!(matched.vars.get("id"), Some("abc123"));
//!
//! assert!(router.match_route(&Method::GET, "/dss/subscriptions/abc123/").is_none());
//! ```

mod method_table;
mod node;
mod vars;

pub use method_table::MethodTable;
pub use node::Node;
pub use vars::PathVars;

use http::Method;

/// A successful match: the template identifier plus the extracted
/// path variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<T> {
    /// Identifier of the matched template.
    pub template: T,
    /// Name-to-value map of all declared path variables.
    pub vars: PathVars,
}

/// A compiled, immutable route-template matcher.
///
/// Generic over the template identifier `T` so callers can key templates
/// by index, enum tag, or any other copyable handle. Built once at
/// startup, shared read-only thereafter.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T: Copy> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers a template for one method and path pattern.
    ///
    /// Patterns use `{name}` for variable segments, e.g.
    /// `/dss/identification_service_areas/{id}`. If a template is already
    /// registered for the same method and shape, the first registration
    /// wins and this call is a no-op returning `false`.
    pub fn route(&mut self, method: Method, pattern: &str, template: T) -> bool {
        let inserted = self.root.insert(pattern, method, template);
        if inserted {
            self.route_count += 1;
        }
        inserted
    }

    /// Matches a method and path against the compiled templates.
    ///
    /// Returns `None` when nothing matches — an expected outcome for
    /// unknown paths, trailing-slash variants, percent-escaped paths, and
    /// method mismatches.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<T>> {
        let segments = split_path(path)?;
        let mut vars = PathVars::new();
        let template = *self.root.match_segments(&segments, method, &mut vars)?;
        Some(RouteMatch { template, vars })
    }

    /// Returns the number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no templates are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}

/// Splits a request path into segments, rejecting shapes that never match.
///
/// Returns `None` for paths that do not start with `/`, contain an empty
/// segment (double or trailing slash), or carry an undecoded
/// percent-escape.
fn split_path(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.iter().any(|s| s.is_empty() || s.contains('%')) {
        return None;
    }
    Some(segments)
}
