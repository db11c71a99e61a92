//! Error types for needle parsing and compilation.

use std::fmt;

/// Errors that can occur while parsing or compiling needles.
///
/// Every variant carries the offending needle plus enough context (character
/// offset or selector text) to pinpoint the malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// `[` opened while already inside an array selector.
    BadArrayStart { needle: String, position: usize },
    /// `]` with no array selector open, or an empty selector.
    BadArrayTerminator { needle: String, position: usize },
    /// Array selector content other than digits, `?`, `*`, `+`, or `(...)`.
    BadArraySelector { needle: String, selector: String },
    /// `!` while an exclusion is already pending.
    RedundantExclusion { needle: String, position: usize },
    /// `)` with no group open.
    UnexpectedGroupTerminator { needle: String, position: usize },
    /// Input ended with one or more groups still open.
    NonTerminatedGroup { needle: String },
    /// Input ended inside an array selector.
    NonTerminatedArray { needle: String },
    /// Malformed syntax not covered by a more specific kind.
    Syntax {
        needle: String,
        position: usize,
        message: String,
    },
    /// A needle that parsed but cannot be compiled under the current options.
    Compile { needle: String, message: String },
}

impl ScanError {
    /// Returns the stable kind string for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::BadArrayStart { .. } => "BadArrayStart",
            ScanError::BadArrayTerminator { .. } => "BadArrayTerminator",
            ScanError::BadArraySelector { .. } => "BadArraySelector",
            ScanError::RedundantExclusion { .. } => "RedundantExclusion",
            ScanError::UnexpectedGroupTerminator { .. } => "UnexpectedGroupTerminator",
            ScanError::NonTerminatedGroup { .. } => "NonTerminatedGroup",
            ScanError::NonTerminatedArray { .. } => "NonTerminatedArray",
            ScanError::Syntax { .. } => "SyntaxError",
            ScanError::Compile { .. } => "CompileError",
        }
    }

    /// Returns the needle the error was raised for.
    pub fn needle(&self) -> &str {
        match self {
            ScanError::BadArrayStart { needle, .. }
            | ScanError::BadArrayTerminator { needle, .. }
            | ScanError::BadArraySelector { needle, .. }
            | ScanError::RedundantExclusion { needle, .. }
            | ScanError::UnexpectedGroupTerminator { needle, .. }
            | ScanError::NonTerminatedGroup { needle }
            | ScanError::NonTerminatedArray { needle }
            | ScanError::Syntax { needle, .. }
            | ScanError::Compile { needle, .. } => needle,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::BadArrayStart { needle, position } => {
                write!(f, "bad array start in '{}' at character {}", needle, position)
            }
            ScanError::BadArrayTerminator { needle, position } => write!(
                f,
                "bad array terminator in '{}' at character {}",
                needle, position
            ),
            ScanError::BadArraySelector { needle, selector } => {
                write!(f, "bad array selector '{}' in '{}'", selector, needle)
            }
            ScanError::RedundantExclusion { needle, position } => write!(
                f,
                "redundant exclusion in '{}' at character {}",
                needle, position
            ),
            ScanError::UnexpectedGroupTerminator { needle, position } => write!(
                f,
                "unexpected group terminator in '{}' at character {}",
                needle, position
            ),
            ScanError::NonTerminatedGroup { needle } => {
                write!(f, "non-terminated group in '{}'", needle)
            }
            ScanError::NonTerminatedArray { needle } => {
                write!(f, "non-terminated array selector in '{}'", needle)
            }
            ScanError::Syntax {
                needle,
                position,
                message,
            } => write!(f, "{} in '{}' at character {}", message, needle, position),
            ScanError::Compile { needle, message } => {
                write!(f, "{} in '{}'", message, needle)
            }
        }
    }
}

impl std::error::Error for ScanError {}
