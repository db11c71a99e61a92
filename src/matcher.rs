//! Compile-and-scan API.
//!
//! [`compile_matcher`] turns a list of needles and a set of options into a
//! reusable [`Matcher`]: compile once, match many. A matcher is immutable
//! after construction; every invocation owns its traversal cursor, so one
//! matcher can serve any number of scans.

use crate::error::ScanError;
use crate::scan::{builder, engine, MatchEvent, ScanResult};
use crate::search::{compiler, SearchNode};
use crate::tree::node::Node;

/// Hook deciding whether a match event is kept.
pub type FilterFn<C> = Box<dyn Fn(&MatchEvent<'_, C>) -> bool>;

/// Hook deciding whether to prune descent below the current node.
pub type BreakFn<C> = Box<dyn Fn(&MatchEvent<'_, C>) -> bool>;

/// Requested return shape for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rtn {
    /// The threaded context.
    Context,
    /// Matched paths.
    Key,
    /// Matched values.
    Value,
    /// Matched `(path, value)` pairs.
    Entry,
    /// Final path segment of each match.
    Property,
    /// Immediate parent of each match.
    Parent,
    /// Ancestor chain of each match.
    Parents,
    /// Whether anything matched.
    Bool,
    /// Number of matches.
    Count,
}

/// Scan options.
///
/// The type parameter is the context threaded through the hooks and returned
/// by [`Rtn::Context`]; it defaults to `()` when no context is used.
pub struct Options<C = ()> {
    /// Predicate over a match event; returning `false` drops the match.
    pub filter_fn: Option<FilterFn<C>>,
    /// Predicate deciding whether to prune descent below the current node.
    pub break_fn: Option<BreakFn<C>>,
    /// Stop and return after the first accepted match.
    pub abort: bool,
    /// Requested shape. Defaults to `Key`, or `Context` when a context is
    /// supplied at scan time.
    pub rtn: Option<Rtn>,
    /// Return paths joined into single string keys instead of raw segments.
    pub joined: bool,
    /// Enable `[...]` syntax and treat sequences as indexable containers.
    /// When disabled, indices become transparent hops.
    pub use_array_selector: bool,
    /// Reject structurally questionable needle combinations at compile time.
    pub strict: bool,
}

impl<C> Default for Options<C> {
    fn default() -> Self {
        Self {
            filter_fn: None,
            break_fn: None,
            abort: false,
            rtn: None,
            joined: false,
            use_array_selector: true,
            strict: true,
        }
    }
}

/// A compiled, reusable matcher bound to one search tree.
pub struct Matcher<C = ()> {
    needles: Vec<String>,
    tree: Option<SearchNode>,
    options: Options<C>,
}

impl<C> std::fmt::Debug for Matcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("needles", &self.needles)
            .finish_non_exhaustive()
    }
}

/// Compiles needles into a reusable matcher.
///
/// All parse and compile errors surface here; a matcher that constructs
/// successfully cannot fail during a scan. An empty needle list yields a
/// matcher that returns the shape's empty form without traversing anything.
pub fn compile_matcher<C>(needles: &[&str], options: Options<C>) -> Result<Matcher<C>, ScanError> {
    let needles: Vec<String> = needles.iter().map(|needle| needle.to_string()).collect();
    let tree = if needles.is_empty() {
        None
    } else {
        Some(compiler::compile(
            &needles,
            options.strict,
            options.use_array_selector,
        )?)
    };
    Ok(Matcher {
        needles,
        tree,
        options,
    })
}

impl<C> Matcher<C> {
    /// Scans a haystack and returns the requested shape (default `Key`).
    pub fn scan(&self, haystack: &Node) -> ScanResult<C> {
        self.run(haystack, None)
    }

    /// Scans a haystack with a context threaded through the hooks.
    ///
    /// The default shape becomes `Context`: the context is handed back,
    /// carrying whatever the hooks folded into it.
    pub fn scan_with_context(&self, haystack: &Node, context: C) -> ScanResult<C> {
        self.run(haystack, Some(context))
    }

    /// Returns the needles this matcher was compiled from.
    pub fn needles(&self) -> &[String] {
        &self.needles
    }

    fn run(&self, haystack: &Node, context: Option<C>) -> ScanResult<C> {
        let rtn = self.options.rtn.unwrap_or(if context.is_some() {
            Rtn::Context
        } else {
            Rtn::Key
        });
        match &self.tree {
            Some(tree) => engine::find(haystack, tree, &self.options, rtn, context, &self.needles),
            None => builder::empty_result(rtn, context),
        }
    }
}
