//! treescan — find keys in arbitrarily nested tree structures using
//! wildcard path needles.
//!
//! A needle is a textual path pattern; one or more needles compile into a
//! single reusable [`Matcher`] that walks a haystack tree and returns matches
//! in a caller-selected shape (paths, values, parents, booleans, counts, or a
//! threaded context).
//!
//! # Supported Syntax
//!
//! - `key` - Named map key (escape specials with `\`)
//! - `*` - Any map key; `?` matches one character
//! - `[0]` - Array index; `[*]` - any index; `[(^\d$)]` - regex selector
//! - `**` - Recursive: one or more segments of any kind
//! - `(a|b)` - Alternatives at a position (members may be sub-paths)
//! - `!` - Marks a segment or group as an exclusion
//!
//! # Example
//!
//! ```
//! use treescan::{compile_matcher, MatchedPath, Matcher, Node, Options, ScanResult};
//! use serde_json::json;
//!
//! let haystack = Node::from(json!({"a": {"b": {"c": 1}, "x": {"c": 2}}}));
//! let matcher: Matcher = compile_matcher(
//!     &["a.*.c"],
//!     Options {
//!         joined: true,
//!         ..Options::default()
//!     },
//! )
//! .unwrap();
//!
//! match matcher.scan(&haystack) {
//!     ScanResult::Keys(keys) => assert_eq!(
//!         keys,
//!         vec![
//!             MatchedPath::Joined("a.b.c".to_string()),
//!             MatchedPath::Joined("a.x.c".to_string()),
//!         ]
//!     ),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

pub mod error;
pub mod matcher;
pub mod pattern;
pub mod scan;
pub mod search;
pub mod tree;

pub use error::ScanError;
pub use matcher::{compile_matcher, BreakFn, FilterFn, Matcher, Options, Rtn};
pub use scan::{MatchEvent, ScanResult};
pub use tree::node::{Node, Value};
pub use tree::path::{escape, join_path, MatchedPath, PathSegment};
