//! Parsed needle patterns.
//!
//! A needle string parses into a [`Pattern`] tree: a single wildcard segment,
//! an ordered sequence of sub-patterns (path continuation), or an unordered
//! group of alternatives from `(a|b)` syntax. Group exclusion is an explicit
//! field on the group node; segment exclusion is a field on the wildcard.
//!
//! Patterns re-serialize via `Display` into a normalized needle that parses
//! back to a structurally equal tree.

pub mod parser;

use std::fmt;

pub use parser::parse;

/// One wildcard step of a needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wildcard {
    raw: String,
    excluded: bool,
}

impl Wildcard {
    pub(crate) fn new(raw: String, excluded: bool) -> Self {
        Self { raw, excluded }
    }

    /// Returns the textual selector, e.g. `*`, `**`, `[3]`, or a literal.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns true if this segment marks matches as exclusions.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Returns true if this segment matches at any depth (`**`).
    pub fn is_recursive(&self) -> bool {
        self.raw == "**"
    }

    /// Returns true if this segment only matches array indices (`[...]`).
    pub fn is_array_target(&self) -> bool {
        self.raw.starts_with('[')
    }
}

/// The parsed form of one needle.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// A single wildcard step.
    Segment(Wildcard),
    /// Ordered sub-patterns; concatenation is path continuation.
    Sequence(Vec<Pattern>),
    /// Unordered alternatives from a `(a|b)` group.
    Group {
        members: Vec<Pattern>,
        /// The whole alternative set is subtractive (`!(a|b)`).
        excluded: bool,
    },
}

/// The collapse applied when a lexical scope closes.
///
/// A scope of one member is represented as that member directly, never as a
/// wrapped collection.
#[derive(Debug)]
pub(crate) enum Folded {
    Empty,
    Single(Pattern),
    Many(Vec<Pattern>),
}

impl Folded {
    pub(crate) fn from_items(mut items: Vec<Pattern>) -> Folded {
        match items.len() {
            0 => Folded::Empty,
            1 => items.pop().map(Folded::Single).unwrap_or(Folded::Empty),
            _ => Folded::Many(items),
        }
    }

    pub(crate) fn into_pattern(self) -> Pattern {
        match self {
            Folded::Empty => Pattern::Sequence(Vec::new()),
            Folded::Single(pattern) => pattern,
            Folded::Many(items) => Pattern::Sequence(items),
        }
    }
}

impl Pattern {
    /// Returns true for a pattern with no segments (the empty needle).
    pub fn is_empty(&self) -> bool {
        matches!(self, Pattern::Sequence(items) if items.is_empty())
    }
}

/// Array selectors attach to the preceding segment without a `.` separator.
fn attaches_dotless(pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Segment(wildcard) => wildcard.is_array_target(),
        Pattern::Sequence(items) => items.first().map_or(false, attaches_dotless),
        Pattern::Group { .. } => false,
    }
}

fn write_sequence(
    items: &[Pattern],
    f: &mut fmt::Formatter<'_>,
    suppress_first_exclusion: bool,
) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 && !attaches_dotless(item) {
            write!(f, ".")?;
        }
        write_pattern(item, f, suppress_first_exclusion && idx == 0)?;
    }
    Ok(())
}

fn write_pattern(
    pattern: &Pattern,
    f: &mut fmt::Formatter<'_>,
    suppress_exclusion: bool,
) -> fmt::Result {
    match pattern {
        Pattern::Segment(wildcard) => {
            if wildcard.is_excluded() && !suppress_exclusion {
                write!(f, "!")?;
            }
            write!(f, "{}", wildcard.raw())
        }
        Pattern::Sequence(items) => write_sequence(items, f, suppress_exclusion),
        Pattern::Group { members, excluded } => {
            if *excluded && !suppress_exclusion {
                write!(f, "!")?;
            }
            write!(f, "(")?;
            for (idx, member) in members.iter().enumerate() {
                if idx > 0 {
                    write!(f, "|")?;
                }
                // A group-level exclusion is mirrored onto each member's
                // leading segment during parsing; suppress it on output so
                // the needle round-trips without a redundant `!`.
                write_pattern(member, f, *excluded)?;
            }
            write!(f, ")")
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pattern(self, f, false)
    }
}
