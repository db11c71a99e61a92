//! Integration tests for scanning haystacks with compiled matchers.

use serde_json::json;
use treescan::{
    compile_matcher, MatchedPath, Matcher, Node, Options, PathSegment, Rtn, ScanResult,
};

fn joined(needles: &[&str]) -> Matcher {
    compile_matcher(
        needles,
        Options {
            joined: true,
            ..Options::default()
        },
    )
    .unwrap()
}

fn keys(result: ScanResult) -> Vec<String> {
    result
        .into_keys()
        .unwrap()
        .into_iter()
        .map(|key| key.to_string())
        .collect()
}

/// A single `*` wildcard matches every map key at its position, in
/// key-insertion order.
#[test]
fn test_star_wildcard_matches_all_siblings() {
    let haystack = Node::from(json!({"a": {"b": {"c": 1}, "x": {"c": 2}}}));
    let matcher = joined(&["a.*.c"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["a.b.c", "a.x.c"]);
}

/// `**` matches one or more segments: children surface before their own
/// children, never the anchor itself.
#[test]
fn test_recursive_wildcard_matches_subtree() {
    let haystack = Node::from(json!({"a": {"b": 1, "c": {"d": 2}}}));
    let matcher = joined(&["a.**"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["a.b", "a.c", "a.c.d"]);
}

/// `**` crosses the array/map boundary.
#[test]
fn test_recursive_wildcard_crosses_arrays() {
    let haystack = Node::from(json!({"a": [{"b": 1}]}));
    let matcher = joined(&["**"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["a", "a[0]", "a[0].b"]);
}

/// A scan of a scalar haystack terminates with no matches.
#[test]
fn test_recursive_wildcard_on_scalar_haystack() {
    let matcher = joined(&["**"]);
    assert_eq!(keys(matcher.scan(&Node::from(json!(5)))), Vec::<String>::new());
    assert_eq!(
        keys(matcher.scan(&Node::from(json!({})))),
        Vec::<String>::new()
    );
}

/// The empty needle targets the haystack root.
#[test]
fn test_empty_needle_matches_root() {
    let haystack = Node::from(json!({"a": 1}));
    let matcher = joined(&[""]);
    assert_eq!(keys(matcher.scan(&haystack)), vec![""]);
}

/// Without `joined`, paths come back as raw segments.
#[test]
fn test_unjoined_paths_are_segments() {
    let haystack = Node::from(json!({"a": {"b": 1}}));
    let matcher: Matcher = compile_matcher(&["a.b"], Options::default()).unwrap();
    assert_eq!(
        matcher.scan(&haystack).into_keys().unwrap(),
        vec![MatchedPath::Segments(vec![
            PathSegment::Key("a".to_string()),
            PathSegment::Key("b".to_string()),
        ])]
    );
}

/// Array selectors address individual indices; `[*]` addresses them all.
#[test]
fn test_array_selectors() {
    let haystack = Node::from(json!({"a": [10, 20, 30]}));

    let matcher = joined(&["a[1]"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["a[1]"]);

    let matcher = joined(&["a[*]"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["a[0]", "a[1]", "a[2]"]);
}

/// A top-level array is addressed with a leading selector.
#[test]
fn test_top_level_array() {
    let haystack = Node::from(json!([1, 2]));
    let matcher = joined(&["[*]"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["[0]", "[1]"]);
}

/// Escaped specials in a needle match keys containing those characters
/// literally.
#[test]
fn test_escaped_needle_matches_literal_key() {
    let haystack = Node::from(json!({"a.b": 7, "ab": 8}));
    let matcher: Matcher = compile_matcher(
        &["a\\.b"],
        Options {
            rtn: Some(Rtn::Value),
            ..Options::default()
        },
    )
    .unwrap();
    assert_eq!(
        matcher.scan(&haystack).into_values().unwrap(),
        vec![Node::from(json!(7))]
    );
}

/// Partial wildcards compile to anchored matchers.
#[test]
fn test_partial_wildcards() {
    let haystack = Node::from(json!({"foo": 1, "foobar": 2, "bar": 3}));
    let matcher = joined(&["foo*"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["foo", "foobar"]);

    let matcher = joined(&["?ar"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["bar"]);
}

/// Group alternatives fan out and report in traversal order.
#[test]
fn test_group_alternatives() {
    let haystack = Node::from(json!({"a": {"x": 1}, "b": {"x": 2}, "c": {"x": 3}}));
    let matcher = joined(&["(a|c).x"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["a.x", "c.x"]);
}

/// A group member may be a whole sub-path.
#[test]
fn test_group_with_subpath_member() {
    let haystack = Node::from(json!({"a": 1, "b": {"c": 2}}));
    let matcher = joined(&["(a|b.c)"]);
    assert_eq!(keys(matcher.scan(&haystack)), vec!["a", "b.c"]);
}

/// `abort` returns after the first accepted match, first in traversal order.
#[test]
fn test_abort_returns_first_match() {
    let haystack = Node::from(json!({"a": {"b": 1}, "c": 2}));
    let matcher: Matcher = compile_matcher(
        &["**"],
        Options {
            abort: true,
            joined: true,
            ..Options::default()
        },
    )
    .unwrap();
    assert_eq!(keys(matcher.scan(&haystack)), vec!["a"]);
}

/// An empty needle list yields the shape's empty form without traversal.
#[test]
fn test_empty_needle_list() {
    let haystack = Node::from(json!({"a": 1}));

    let matcher: Matcher = compile_matcher(&[], Options::default()).unwrap();
    assert_eq!(matcher.scan(&haystack), ScanResult::Keys(vec![]));

    let matcher: Matcher = compile_matcher(
        &[],
        Options {
            rtn: Some(Rtn::Count),
            ..Options::default()
        },
    )
    .unwrap();
    assert_eq!(matcher.scan(&haystack), ScanResult::Count(0));

    let matcher: Matcher<u32> = compile_matcher(&[], Options::default()).unwrap();
    assert_eq!(
        matcher.scan_with_context(&haystack, 9),
        ScanResult::Context(Some(9))
    );
}

/// Every return shape folds matches as documented.
#[test]
fn test_return_shapes() {
    let haystack = Node::from(json!({"a": {"b": 1, "c": 2}}));

    let shape = |rtn| -> Matcher {
        compile_matcher(
            &["a.*"],
            Options {
                rtn: Some(rtn),
                joined: true,
                ..Options::default()
            },
        )
        .unwrap()
    };

    assert_eq!(
        shape(Rtn::Value).scan(&haystack).into_values().unwrap(),
        vec![Node::from(json!(1)), Node::from(json!(2))]
    );
    assert_eq!(
        shape(Rtn::Entry).scan(&haystack).into_entries().unwrap(),
        vec![
            (MatchedPath::Joined("a.b".to_string()), Node::from(json!(1))),
            (MatchedPath::Joined("a.c".to_string()), Node::from(json!(2))),
        ]
    );
    assert_eq!(
        shape(Rtn::Property).scan(&haystack),
        ScanResult::Properties(vec![
            Some(PathSegment::Key("b".to_string())),
            Some(PathSegment::Key("c".to_string())),
        ])
    );
    assert_eq!(shape(Rtn::Count).scan(&haystack), ScanResult::Count(2));
    assert_eq!(shape(Rtn::Bool).scan(&haystack), ScanResult::Bool(true));
    assert_eq!(
        shape(Rtn::Bool)
            .scan(&Node::from(json!({"z": 1})))
            .into_bool(),
        Some(false)
    );

    let inner = Node::from(json!({"b": 1, "c": 2}));
    let root = Node::from(json!({}));
    root.insert("a", inner.clone());
    match shape(Rtn::Parent).scan(&root) {
        ScanResult::Parent(found) => {
            assert_eq!(found.len(), 2);
            assert!(found[0].as_ref().unwrap().ptr_eq(&inner));
            assert!(found[1].as_ref().unwrap().ptr_eq(&inner));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    match shape(Rtn::Parents).scan(&root) {
        ScanResult::Parents(chains) => {
            assert_eq!(chains.len(), 2);
            assert!(chains[0][0].ptr_eq(&inner));
            assert!(chains[0][1].ptr_eq(&root));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

/// A root match has no property and no parent.
#[test]
fn test_root_match_shapes() {
    let haystack = Node::from(json!({"a": 1}));
    let matcher: Matcher = compile_matcher(
        &[""],
        Options {
            rtn: Some(Rtn::Property),
            ..Options::default()
        },
    )
    .unwrap();
    assert_eq!(matcher.scan(&haystack), ScanResult::Properties(vec![None]));

    let matcher: Matcher = compile_matcher(
        &[""],
        Options {
            rtn: Some(Rtn::Parent),
            ..Options::default()
        },
    )
    .unwrap();
    assert_eq!(matcher.scan(&haystack), ScanResult::Parent(vec![None]));
}

/// Matchers are reusable: compile once, scan many haystacks.
#[test]
fn test_matcher_reuse() {
    let matcher = joined(&["*.x"]);
    assert_eq!(
        keys(matcher.scan(&Node::from(json!({"a": {"x": 1}})))),
        vec!["a.x"]
    );
    assert_eq!(
        keys(matcher.scan(&Node::from(json!({"b": {"x": 2}, "c": {"y": 3}})))),
        vec!["b.x"]
    );
}

/// Traversal depth is bounded by memory, not the native call stack.
#[test]
fn test_deeply_nested_haystack() {
    let mut node = Node::from(json!(1));
    for _ in 0..5000 {
        let parent = Node::from(json!({}));
        parent.insert("k", node);
        node = parent;
    }
    let matcher: Matcher = compile_matcher(
        &["**"],
        Options {
            rtn: Some(Rtn::Count),
            ..Options::default()
        },
    )
    .unwrap();
    assert_eq!(matcher.scan(&node), ScanResult::Count(5000));
}

/// Subtrees no pattern can reach are pruned without being visited.
#[test]
fn test_pruning_skips_unreachable_subtrees() {
    use std::cell::Cell;
    use std::rc::Rc;

    let haystack = Node::from(json!({"a": {"x": 1}, "b": {"x": 2, "deep": {"x": 3}}}));
    let visits = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&visits);
    let matcher: Matcher = compile_matcher(
        &["a.x"],
        Options {
            break_fn: Some(Box::new(move |_| {
                counter.set(counter.get() + 1);
                false
            })),
            joined: true,
            ..Options::default()
        },
    )
    .unwrap();
    assert_eq!(keys(matcher.scan(&haystack)), vec!["a.x"]);
    // Root, `a`, and `a.x`; the `b` subtree is never expanded.
    assert_eq!(visits.get(), 3);
}
