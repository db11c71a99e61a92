//! Compiled search trees.
//!
//! One or more parsed needles merge into a single [`SearchNode`] tree that
//! the scan engine walks. Child entries are keyed by raw segment text so
//! needles sharing a segment fold into one node while keeping per-needle
//! attribution (which needle matches, excludes, or merely traverses a node).

pub mod compiler;
pub mod wildcard;

use indexmap::IndexMap;

use wildcard::CompiledWildcard;

/// One node of a compiled search tree.
#[derive(Debug)]
pub struct SearchNode {
    raw: String,
    matcher: CompiledWildcard,
    is_recursive: bool,
    is_array_target: bool,
    entries: IndexMap<String, SearchNode>,
    /// Needles with a non-excluded terminal at this node.
    matched_by: Vec<usize>,
    /// Needles with an excluded terminal at this node.
    excluded_by: Vec<usize>,
    /// Needles whose path passes through this node.
    traversed_by: Vec<usize>,
    /// Any non-excluded terminal in this subtree; drives pruning.
    has_matches: bool,
}

impl SearchNode {
    pub(crate) fn new(raw: &str, matcher: CompiledWildcard) -> Self {
        Self {
            raw: raw.to_string(),
            is_recursive: raw == "**",
            is_array_target: raw.starts_with('['),
            matcher,
            entries: IndexMap::new(),
            matched_by: Vec::new(),
            excluded_by: Vec::new(),
            traversed_by: Vec::new(),
            has_matches: false,
        }
    }

    pub(crate) fn root() -> Self {
        SearchNode::new("", CompiledWildcard::Literal(String::new()))
    }

    pub(crate) fn raw(&self) -> &str {
        &self.raw
    }

    pub(crate) fn matcher(&self) -> &CompiledWildcard {
        &self.matcher
    }

    pub(crate) fn is_recursive(&self) -> bool {
        self.is_recursive
    }

    pub(crate) fn is_array_target(&self) -> bool {
        self.is_array_target
    }

    pub(crate) fn entries(&self) -> &IndexMap<String, SearchNode> {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut IndexMap<String, SearchNode> {
        &mut self.entries
    }

    pub(crate) fn has_matches(&self) -> bool {
        self.has_matches
    }

    pub(crate) fn matched_by(&self) -> &[usize] {
        &self.matched_by
    }

    pub(crate) fn excluded_by(&self) -> &[usize] {
        &self.excluded_by
    }

    pub(crate) fn traversed_by(&self) -> &[usize] {
        &self.traversed_by
    }

    pub(crate) fn record_traversal(&mut self, needle: usize) {
        if !self.traversed_by.contains(&needle) {
            self.traversed_by.push(needle);
        }
    }

    pub(crate) fn record_match(&mut self, needle: usize) {
        if !self.matched_by.contains(&needle) {
            self.matched_by.push(needle);
        }
    }

    pub(crate) fn record_exclusion(&mut self, needle: usize) {
        self.matched_by.retain(|id| *id != needle);
        if !self.excluded_by.contains(&needle) {
            self.excluded_by.push(needle);
        }
    }

    /// Recomputes the pruning flag for this subtree.
    pub(crate) fn finalize(&mut self) -> bool {
        let mut has = !self.matched_by.is_empty();
        for child in self.entries.values_mut() {
            has |= child.finalize();
        }
        self.has_matches = has;
        has
    }
}

/// Needles excluded at this frontier. A needle excluding a location through
/// any active node excludes it overall, even when another active node of the
/// same needle matches it (exclusion wins inside one needle).
pub(crate) fn frontier_excluded(frontier: &[&SearchNode]) -> Vec<usize> {
    let mut ids: Vec<usize> = frontier
        .iter()
        .flat_map(|node| node.excluded_by().iter().copied())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Needles matching at this frontier, with excluded needles subtracted.
pub(crate) fn frontier_matched(frontier: &[&SearchNode]) -> Vec<usize> {
    let excluded = frontier_excluded(frontier);
    let mut ids: Vec<usize> = frontier
        .iter()
        .flat_map(|node| node.matched_by().iter().copied())
        .filter(|id| !excluded.contains(id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Needles traversing this frontier.
pub(crate) fn frontier_traversed(frontier: &[&SearchNode]) -> Vec<usize> {
    let mut ids: Vec<usize> = frontier
        .iter()
        .flat_map(|node| node.traversed_by().iter().copied())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Whether this frontier is a confirmed match: the latest needle targeting
/// the location decides, and an exclusion by that needle anywhere in the
/// frontier wins over its matches.
pub(crate) fn frontier_is_match(frontier: &[&SearchNode]) -> bool {
    let mut last: Option<usize> = None;
    for node in frontier {
        for id in node.matched_by().iter().chain(node.excluded_by()) {
            last = Some(match last {
                Some(seen) if seen > *id => seen,
                _ => *id,
            });
        }
    }
    match last {
        Some(id) => !frontier.iter().any(|node| node.excluded_by().contains(&id)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> SearchNode {
        SearchNode::root()
    }

    #[test]
    fn test_frontier_empty_is_no_match() {
        let a = node();
        assert!(!frontier_is_match(&[&a]));
        assert!(frontier_matched(&[&a]).is_empty());
    }

    #[test]
    fn test_frontier_exclusion_wins_within_needle() {
        let mut star = node();
        star.record_match(0);
        let mut named = node();
        named.record_exclusion(0);
        let frontier = [&star, &named];
        assert!(!frontier_is_match(&frontier));
        assert!(frontier_matched(&frontier).is_empty());
        assert_eq!(frontier_excluded(&frontier), vec![0]);
    }

    #[test]
    fn test_frontier_later_needle_overrides() {
        let mut a = node();
        a.record_exclusion(0);
        a.record_match(1);
        assert!(frontier_is_match(&[&a]));
        assert_eq!(frontier_matched(&[&a]), vec![1]);

        let mut b = node();
        b.record_match(0);
        b.record_exclusion(1);
        assert!(!frontier_is_match(&[&b]));
    }

    #[test]
    fn test_record_exclusion_demotes_match() {
        let mut a = node();
        a.record_match(0);
        a.record_exclusion(0);
        assert!(a.matched_by().is_empty());
        assert_eq!(a.excluded_by(), &[0]);
    }

    #[test]
    fn test_finalize_propagates_has_matches() {
        let mut root = node();
        let mut child = SearchNode::new("a", CompiledWildcard::Literal("a".to_string()));
        child.record_match(0);
        root.entries_mut().insert("a".to_string(), child);
        root.finalize();
        assert!(root.has_matches());

        let mut excluded_only = node();
        let mut child = SearchNode::new("b", CompiledWildcard::Literal("b".to_string()));
        child.record_exclusion(0);
        excluded_only.entries_mut().insert("b".to_string(), child);
        excluded_only.finalize();
        assert!(!excluded_only.has_matches());
    }
}
