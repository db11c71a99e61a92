//! Lazy views over the live traversal cursor.

use std::cell::{Ref, RefCell, RefMut};

use crate::search::{self, SearchNode};
use crate::tree::node::Node;
use crate::tree::path::{join_path, MatchedPath, PathSegment};

/// A view of one traversal position, handed to hooks and the result builder.
///
/// Accessors compute on read from the engine's live cursor. Most traversal
/// steps never become a result, so nothing is materialized up front; reading
/// the same accessor twice recomputes it.
pub struct MatchEvent<'a, C> {
    pub(crate) path: &'a [PathSegment],
    pub(crate) parents: &'a [Node],
    pub(crate) frontier: &'a [&'a SearchNode],
    pub(crate) node: &'a Node,
    pub(crate) needles: &'a [String],
    pub(crate) joined: bool,
    pub(crate) context: &'a RefCell<Option<C>>,
}

impl<'a, C> MatchEvent<'a, C> {
    /// The path of the current node, joined or raw per the scan options.
    pub fn key(&self) -> MatchedPath {
        if self.joined {
            MatchedPath::Joined(join_path(self.path))
        } else {
            MatchedPath::Segments(self.path.to_vec())
        }
    }

    /// The current node.
    pub fn value(&self) -> Node {
        self.node.clone()
    }

    /// The `(path, value)` pair of the current node.
    pub fn entry(&self) -> (MatchedPath, Node) {
        (self.key(), self.value())
    }

    /// The final path segment, `None` at the root.
    pub fn property(&self) -> Option<PathSegment> {
        self.path.last().cloned()
    }

    /// The immediate parent container, `None` at the root.
    pub fn parent(&self) -> Option<Node> {
        self.parents.last().cloned()
    }

    /// All ancestor containers, immediate parent first.
    pub fn parents(&self) -> Vec<Node> {
        self.parents.iter().rev().cloned().collect()
    }

    /// Whether the current position is a confirmed, non-excluded match.
    pub fn is_match(&self) -> bool {
        search::frontier_is_match(self.frontier)
    }

    /// Needles matching the current position.
    pub fn matched_by(&self) -> Vec<&str> {
        self.resolve(search::frontier_matched(self.frontier))
    }

    /// Needles excluding the current position.
    pub fn excluded_by(&self) -> Vec<&str> {
        self.resolve(search::frontier_excluded(self.frontier))
    }

    /// Needles traversing the current position.
    pub fn traversed_by(&self) -> Vec<&str> {
        self.resolve(search::frontier_traversed(self.frontier))
    }

    /// Whether the current node already appears in its own ancestor chain.
    ///
    /// Identity only: two distinct containers that happen to be deeply equal
    /// are not circular.
    pub fn is_circular(&self) -> bool {
        self.parents.iter().any(|parent| parent.ptr_eq(self.node))
    }

    /// Reads the threaded context.
    pub fn context(&self) -> Ref<'_, Option<C>> {
        self.context.borrow()
    }

    /// Mutates the threaded context.
    pub fn context_mut(&self) -> RefMut<'_, Option<C>> {
        self.context.borrow_mut()
    }

    fn resolve(&self, ids: Vec<usize>) -> Vec<&str> {
        ids.into_iter()
            .filter_map(|id| self.needles.get(id))
            .map(String::as_str)
            .collect()
    }
}
