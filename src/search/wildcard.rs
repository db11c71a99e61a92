//! Compiled wildcard matchers.
//!
//! Each search-tree node precompiles its segment into the cheapest matcher
//! that covers it: the glob fast paths (`**`, `*`, `[*]`) need no machinery,
//! exact literals and indices compare directly, and only partial wildcards or
//! parenthesized array sub-expressions pay for a regex.

use regex::Regex;

use crate::error::ScanError;
use crate::tree::path::PathSegment;

/// A needle segment compiled for key matching.
#[derive(Debug, Clone)]
pub enum CompiledWildcard {
    /// `**`, `*`, `[*]`: matches any key of the permitted kind.
    Any,
    /// Exact map key (escapes resolved).
    Literal(String),
    /// Exact array index.
    Index(usize),
    /// Partial wildcard or parenthesized sub-expression.
    Pattern(Regex),
}

impl CompiledWildcard {
    /// Tests a path segment against this matcher.
    ///
    /// Kind gating (array target vs. map key) happens in the engine; indices
    /// are matched against regexes in their decimal form.
    pub(crate) fn matches(&self, segment: &PathSegment) -> bool {
        match (self, segment) {
            (CompiledWildcard::Any, _) => true,
            (CompiledWildcard::Literal(literal), PathSegment::Key(key)) => literal == key,
            (CompiledWildcard::Literal(_), PathSegment::Index(_)) => false,
            (CompiledWildcard::Index(selector), PathSegment::Index(idx)) => selector == idx,
            (CompiledWildcard::Index(_), PathSegment::Key(_)) => false,
            (CompiledWildcard::Pattern(regex), PathSegment::Key(key)) => regex.is_match(key),
            (CompiledWildcard::Pattern(regex), PathSegment::Index(idx)) => {
                regex.is_match(&idx.to_string())
            }
        }
    }
}

/// Compiles a raw segment into its matcher.
pub(crate) fn compile(raw: &str, needle: &str) -> Result<CompiledWildcard, ScanError> {
    if raw == "**" || raw == "*" || raw == "[*]" {
        return Ok(CompiledWildcard::Any);
    }
    if let Some(selector) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        return compile_array_selector(selector, needle);
    }
    compile_key(raw, needle)
}

fn compile_array_selector(selector: &str, needle: &str) -> Result<CompiledWildcard, ScanError> {
    if selector.starts_with('(') && selector.ends_with(')') {
        let regex = Regex::new(selector).map_err(|err| ScanError::Compile {
            needle: needle.to_string(),
            message: format!("invalid array sub-expression: {}", err),
        })?;
        return Ok(CompiledWildcard::Pattern(regex));
    }
    if selector.chars().all(|ch| ch.is_ascii_digit()) {
        let index = selector.parse::<usize>().map_err(|err| ScanError::Compile {
            needle: needle.to_string(),
            message: format!("invalid array index '{}': {}", selector, err),
        })?;
        return Ok(CompiledWildcard::Index(index));
    }
    // Digit glob: `?` one digit position, `*` any run, `+` repeats as-is.
    let mut pattern = String::from("^");
    for ch in selector.chars() {
        match ch {
            '?' => pattern.push('.'),
            '*' => pattern.push_str(".*"),
            other => pattern.push(other),
        }
    }
    pattern.push('$');
    let regex = Regex::new(&pattern).map_err(|err| ScanError::Compile {
        needle: needle.to_string(),
        message: format!("invalid array selector '{}': {}", selector, err),
    })?;
    Ok(CompiledWildcard::Pattern(regex))
}

fn compile_key(raw: &str, needle: &str) -> Result<CompiledWildcard, ScanError> {
    let mut literal = true;
    let mut unescaped = String::with_capacity(raw.len());
    let mut pattern = String::from("^");
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    unescaped.push(next);
                    pattern.push_str(&regex::escape(&next.to_string()));
                }
            }
            '*' => {
                literal = false;
                pattern.push_str(".*");
            }
            '?' => {
                literal = false;
                pattern.push('.');
            }
            other => {
                unescaped.push(other);
                pattern.push_str(&regex::escape(&other.to_string()));
            }
        }
    }
    if literal {
        return Ok(CompiledWildcard::Literal(unescaped));
    }
    pattern.push('$');
    let regex = Regex::new(&pattern).map_err(|err| ScanError::Compile {
        needle: needle.to_string(),
        message: format!("invalid wildcard '{}': {}", raw, err),
    })?;
    Ok(CompiledWildcard::Pattern(regex))
}
