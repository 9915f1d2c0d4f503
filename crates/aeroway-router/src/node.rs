//! Radix tree node.
//!
//! Each node represents one path segment. Literal children are kept
//! sorted for binary search; at most one variable child exists per node
//! and is tried only after literal children fail.

use crate::method_table::MethodTable;
use crate::vars::PathVars;
use http::Method;

/// Kind of path segment a node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment (e.g. `dss`, `subscriptions`).
    Literal,
    /// Named variable segment (e.g. `{id}`).
    Variable(String),
}

/// A node in the route-template tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// Segment text as written in the pattern.
    pub segment: String,
    /// Kind of segment.
    pub kind: SegmentKind,
    /// Method table when a template terminates at this node.
    pub methods: Option<MethodTable<T>>,
    /// Literal children, sorted by segment for binary search.
    pub literal_children: Vec<Node<T>>,
    /// Variable child (at most one per node).
    pub variable_child: Option<Box<Node<T>>>,
}

impl<T: Copy> Node<T> {
    /// Creates a literal node.
    #[must_use]
    pub fn new_literal(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            kind: SegmentKind::Literal,
            methods: None,
            literal_children: Vec::new(),
            variable_child: None,
        }
    }

    /// Creates a variable node.
    #[must_use]
    pub fn new_variable(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            segment: format!("{{{name}}}"),
            kind: SegmentKind::Variable(name),
            methods: None,
            literal_children: Vec::new(),
            variable_child: None,
        }
    }

    /// Creates the root node.
    #[must_use]
    pub fn root() -> Self {
        Self::new_literal("")
    }

    /// Inserts a template for a method and pattern.
    ///
    /// Returns `false` if a template was already registered for that
    /// method and path shape (first registration wins).
    pub fn insert(&mut self, pattern: &str, method: Method, template: T) -> bool {
        let segments = parse_pattern(pattern);
        self.insert_segments(&segments, method, template)
    }

    fn insert_segments(&mut self, segments: &[(String, SegmentKind)], method: Method, template: T) -> bool {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            return self.methods.get_or_insert_with(MethodTable::new).insert(method, template);
        };

        match kind {
            SegmentKind::Literal => {
                if let Some(child) = self
                    .literal_children
                    .iter_mut()
                    .find(|c| c.segment == *segment)
                {
                    child.insert_segments(remaining, method, template)
                } else {
                    let mut child = Self::new_literal(segment.clone());
                    let inserted = child.insert_segments(remaining, method, template);
                    self.literal_children.push(child);
                    // Keep sorted for binary search
                    self.literal_children.sort_by(|a, b| a.segment.cmp(&b.segment));
                    inserted
                }
            }
            SegmentKind::Variable(name) => {
                let child = self
                    .variable_child
                    .get_or_insert_with(|| Box::new(Self::new_variable(name.clone())));
                child.insert_segments(remaining, method, template)
            }
        }
    }

    /// Matches path segments and a method against this subtree.
    ///
    /// Literal children are tried before the variable child. A branch
    /// that dead-ends, or terminates without the requested method,
    /// backtracks and drops any capture it made. A literal sibling
    /// registered only for other methods never shadows a variable one.
    pub fn match_segments<'a>(
        &'a self,
        segments: &[&str],
        method: &Method,
        vars: &mut PathVars,
    ) -> Option<&'a T> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref().and_then(|table| table.get(method));
        };

        if let Some(child) = self.find_literal_child(segment) {
            if let Some(template) = child.match_segments(remaining, method, vars) {
                return Some(template);
            }
        }

        if let Some(child) = &self.variable_child {
            if let SegmentKind::Variable(name) = &child.kind {
                let mark = vars.len();
                vars.push(name.clone(), (*segment).to_string());
                if let Some(template) = child.match_segments(remaining, method, vars) {
                    return Some(template);
                }
                vars.truncate(mark);
            }
        }

        None
    }

    fn find_literal_child(&self, segment: &str) -> Option<&Self> {
        self.literal_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.literal_children[i])
    }
}

/// Parses a pattern into (segment, kind) pairs.
fn parse_pattern(pattern: &str) -> Vec<(String, SegmentKind)> {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                (s.to_string(), SegmentKind::Variable(name.to_string()))
            } else {
                (s.to_string(), SegmentKind::Literal)
            }
        })
        .collect()
}
