//! The traversal loop.
//!
//! Haystack depth is caller-controlled and unbounded, so the walk uses an
//! explicit heap-resident work stack instead of native recursion; depth is
//! bounded only by available memory. Frames either expand a node (computing
//! the next search frontier per child key) or surface a confirmed match.

use std::cell::RefCell;

use crate::matcher::{Options, Rtn};
use crate::search::{self, SearchNode};
use crate::tree::node::Node;
use crate::tree::path::PathSegment;

use super::builder::ResultBuilder;
use super::event::MatchEvent;
use super::ScanResult;

struct Frame<'t> {
    is_result: bool,
    frontier: Vec<&'t SearchNode>,
    segment: Option<PathSegment>,
    depth: usize,
}

pub(crate) fn find<C>(
    root: &Node,
    tree: &SearchNode,
    options: &Options<C>,
    rtn: Rtn,
    context: Option<C>,
    needles: &[String],
) -> ScanResult<C> {
    let context = RefCell::new(context);
    let mut builder = ResultBuilder::new(rtn);
    let mut stack: Vec<Frame<'_>> = vec![Frame {
        is_result: false,
        frontier: vec![tree],
        segment: None,
        depth: 0,
    }];
    let mut path: Vec<PathSegment> = Vec::new();
    let mut parents: Vec<Node> = Vec::new();
    let mut current = root.clone();

    while let Some(frame) = stack.pop() {
        // Reconcile the cursor to the frame's depth.
        while path.len() > frame.depth {
            path.pop();
            parents.pop();
        }
        if frame.depth == path.len() + 1 {
            // Descend one level into the frame's segment.
            let segment = match frame.segment.clone() {
                Some(segment) => segment,
                None => continue,
            };
            let child = match current.child(&segment) {
                Some(child) => child,
                None => continue,
            };
            parents.push(current.clone());
            path.push(segment);
            current = child;
        } else if let Some(segment) = frame.segment.clone() {
            // Same depth: re-target the cursor onto a sibling key.
            match (path.last_mut(), parents.last()) {
                (Some(last), Some(parent)) => {
                    *last = segment.clone();
                    current = match parent.child(&segment) {
                        Some(node) => node,
                        None => continue,
                    };
                }
                _ => continue,
            }
        } else {
            current = root.clone();
        }

        if frame.is_result {
            let mut accepted = true;
            {
                let event = MatchEvent {
                    path: &path,
                    parents: &parents,
                    frontier: &frame.frontier,
                    node: &current,
                    needles,
                    joined: options.joined,
                    context: &context,
                };
                if let Some(filter) = &options.filter_fn {
                    accepted = filter(&event);
                }
                if accepted {
                    builder.on_match(&event);
                }
            }
            if accepted && options.abort {
                return builder.finish(context.into_inner());
            }
            continue;
        }

        // Nothing below any active search node can ever match: drop the
        // subtree without descending.
        if !frame.frontier.iter().any(|node| node.has_matches()) {
            continue;
        }

        let recurse = {
            let event = MatchEvent {
                path: &path,
                parents: &parents,
                frontier: &frame.frontier,
                node: &current,
                needles,
                joined: options.joined,
                context: &context,
            };
            match &options.break_fn {
                Some(break_fn) => !break_fn(&event),
                None => true,
            }
        };

        // With array selectors disabled, sequences are transparent hops:
        // indices are walked with the frontier unchanged and are never
        // matched as keys.
        if !options.use_array_selector && current.is_array() {
            if recurse {
                for segment in current.child_keys().into_iter().rev() {
                    stack.push(Frame {
                        is_result: false,
                        frontier: frame.frontier.clone(),
                        segment: Some(segment),
                        depth: frame.depth + 1,
                    });
                }
            }
            continue;
        }

        // Push order is children (reversed), then the root continuation,
        // then the result frame, so the LIFO stack surfaces the match at the
        // current node first and its children in key-insertion order.
        if recurse && current.is_container() {
            let is_array = current.is_array();
            for segment in current.child_keys().into_iter().rev() {
                let mut next: Vec<&SearchNode> = Vec::new();
                for &search in &frame.frontier {
                    if search.is_recursive() && search.matcher().matches(&segment) {
                        next.push(search);
                    }
                    for entry in search.entries().values() {
                        if is_wildcard_match(entry, &segment, is_array) {
                            next.push(entry);
                        }
                    }
                }
                if !next.is_empty() {
                    stack.push(Frame {
                        is_result: false,
                        frontier: next,
                        segment: Some(segment),
                        depth: frame.depth + 1,
                    });
                }
            }
        }

        // While the path holds nothing but indices, patterns registered
        // under the empty string may still begin matching here.
        if path.iter().all(PathSegment::is_index) {
            if let Some(init) = frame
                .frontier
                .first()
                .and_then(|node| node.entries().get(""))
            {
                stack.push(Frame {
                    is_result: false,
                    frontier: vec![init],
                    segment: frame.segment.clone(),
                    depth: frame.depth,
                });
            }
        }

        if search::frontier_is_match(&frame.frontier) {
            stack.push(Frame {
                is_result: true,
                frontier: frame.frontier,
                segment: frame.segment,
                depth: frame.depth,
            });
        }
    }

    builder.finish(context.into_inner())
}

/// Whether a child search entry stays alive for a key.
///
/// `**` matches unconditionally; `*` and `[*]` match the immediate key of
/// their own kind; a kind mismatch disqualifies the entry unless it is
/// recursive; everything else defers to the compiled matcher.
fn is_wildcard_match(entry: &SearchNode, segment: &PathSegment, is_array: bool) -> bool {
    if entry.raw() == "**" {
        return true;
    }
    if is_array {
        if entry.raw() == "[*]" {
            return true;
        }
    } else if entry.raw() == "*" {
        return true;
    }
    if is_array != entry.is_array_target() && !entry.is_recursive() {
        return false;
    }
    entry.matcher().matches(segment)
}
