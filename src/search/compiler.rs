//! Needle compilation: parsed patterns merged into one search tree.

use indexmap::map::Entry;

use crate::error::ScanError;
use crate::pattern::{self, Pattern};

use super::wildcard;
use super::SearchNode;

struct Apply<'a> {
    id: usize,
    needle: &'a str,
    needles: &'a [String],
    strict: bool,
    use_array_selector: bool,
}

/// Compiles needles into a single traversal-ready search tree.
pub(crate) fn compile(
    needles: &[String],
    strict: bool,
    use_array_selector: bool,
) -> Result<SearchNode, ScanError> {
    let mut root = SearchNode::root();
    for (id, needle) in needles.iter().enumerate() {
        let tree = pattern::parse(needle)?;
        let ctx = Apply {
            id,
            needle,
            needles,
            strict,
            use_array_selector,
        };
        apply_needle(&mut root, &tree, &ctx)?;
    }
    root.finalize();
    Ok(root)
}

fn apply_needle(root: &mut SearchNode, tree: &Pattern, ctx: &Apply) -> Result<(), ScanError> {
    root.record_traversal(ctx.id);
    if tree.is_empty() && !ctx.use_array_selector {
        // With array selectors disabled the empty needle matches every
        // element nested in top-level sequences; it registers as the
        // empty-string continuation the engine consults while the path is
        // still all indices.
        let child = child_entry(root, "", ctx.needle)?;
        child.record_traversal(ctx.id);
        return mark_terminal(child, false, ctx);
    }
    apply_sequence(root, &[tree], false, ctx)
}

/// Applies a flattened item list below `node`. Group members fan out by
/// re-applying the member in front of the remaining items; exclusion is
/// sticky from the segment that introduced it to the end of the expansion.
fn apply_sequence(
    node: &mut SearchNode,
    items: &[&Pattern],
    excluded: bool,
    ctx: &Apply,
) -> Result<(), ScanError> {
    let (first, rest) = match items.split_first() {
        None => return mark_terminal(node, excluded, ctx),
        Some(split) => split,
    };
    match first {
        Pattern::Sequence(inner) => {
            let mut flat: Vec<&Pattern> = inner.iter().collect();
            flat.extend_from_slice(rest);
            apply_sequence(node, &flat, excluded, ctx)
        }
        Pattern::Group { members, .. } => {
            for member in members {
                let mut flat: Vec<&Pattern> = vec![member];
                flat.extend_from_slice(rest);
                apply_sequence(node, &flat, excluded, ctx)?;
            }
            Ok(())
        }
        Pattern::Segment(wildcard) => {
            if wildcard.is_array_target() && !ctx.use_array_selector && ctx.strict {
                return Err(ScanError::Compile {
                    needle: ctx.needle.to_string(),
                    message: "array selector with array selectors disabled".to_string(),
                });
            }
            if wildcard.is_recursive() && node.is_recursive() && ctx.strict {
                return Err(ScanError::Compile {
                    needle: ctx.needle.to_string(),
                    message: "redundant recursion".to_string(),
                });
            }
            let child = child_entry(node, wildcard.raw(), ctx.needle)?;
            child.record_traversal(ctx.id);
            apply_sequence(child, rest, excluded || wildcard.is_excluded(), ctx)
        }
    }
}

fn child_entry<'n>(
    node: &'n mut SearchNode,
    raw: &str,
    needle: &str,
) -> Result<&'n mut SearchNode, ScanError> {
    match node.entries_mut().entry(raw.to_string()) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(slot) => {
            let matcher = wildcard::compile(raw, needle)?;
            Ok(slot.insert(SearchNode::new(raw, matcher)))
        }
    }
}

fn mark_terminal(node: &mut SearchNode, excluded: bool, ctx: &Apply) -> Result<(), ScanError> {
    // Within one needle, exclusion is permanent: a location excluded by one
    // group alternative stays excluded even if another alternative includes
    // it.
    let excluded = excluded || node.excluded_by().contains(&ctx.id);
    if ctx.strict {
        let clash = if excluded {
            node.excluded_by().iter().copied().find(|id| *id != ctx.id)
        } else {
            node.matched_by().iter().copied().find(|id| *id != ctx.id)
        };
        if let Some(other) = clash {
            let other_needle = ctx.needles.get(other).map(String::as_str).unwrap_or("");
            return Err(ScanError::Compile {
                needle: ctx.needle.to_string(),
                message: format!(
                    "redundant needle target: '{}' and '{}'",
                    other_needle, ctx.needle
                ),
            });
        }
    }
    if excluded {
        node.record_exclusion(ctx.id);
    } else {
        node.record_match(ctx.id);
    }
    Ok(())
}
