//! Needle parser: a character scanner driving an explicit state machine.
//!
//! The scanner in [`parse`] walks the needle character by character and maps
//! each special character to a lexical event on [`ParserState`]. The state
//! itself never inspects characters; it only reacts to the mutators, which
//! keeps every transition of the machine auditable in one place.

use crate::error::ScanError;

use super::{Folded, Pattern, Wildcard};

/// Lexical events the scanner can report to the parser state.
#[derive(Debug, Clone, Copy)]
enum Event {
    PathSeparator,
    ArrayStart,
    ArrayTerminator,
    GroupStart,
    GroupSeparator,
    GroupTerminator,
    Exclusion,
    Terminator,
}

impl Event {
    /// Characters allowed to precede this event when it closes an empty
    /// element. `None` stands for the start of the needle.
    fn allowed_preceding(self) -> &'static [Option<char>] {
        match self {
            Event::PathSeparator => &[Some(']'), Some(')')],
            Event::ArrayStart => &[
                None,
                Some('!'),
                Some('.'),
                Some('|'),
                Some('('),
                Some(')'),
                Some(']'),
            ],
            Event::ArrayTerminator => &[],
            Event::GroupStart => &[None, Some('!'), Some('.'), Some('|'), Some('(')],
            Event::GroupSeparator => &[Some(']'), Some(')')],
            Event::GroupTerminator => &[Some(']'), Some(')')],
            Event::Exclusion => &[None, Some('.'), Some('|'), Some('(')],
            Event::Terminator => &[None, Some(']'), Some(')')],
        }
    }

    /// Events that demand an empty element (e.g. `!` mid-segment is illegal).
    fn requires_empty(self) -> bool {
        matches!(self, Event::Exclusion)
    }

    fn error(self, needle: &str, position: usize) -> ScanError {
        let needle = needle.to_string();
        match self {
            Event::ArrayStart => ScanError::BadArrayStart { needle, position },
            Event::ArrayTerminator => ScanError::BadArrayTerminator { needle, position },
            Event::GroupTerminator => ScanError::UnexpectedGroupTerminator { needle, position },
            Event::PathSeparator => ScanError::Syntax {
                needle,
                position,
                message: "bad path separator".to_string(),
            },
            Event::GroupStart => ScanError::Syntax {
                needle,
                position,
                message: "bad group start".to_string(),
            },
            Event::GroupSeparator => ScanError::Syntax {
                needle,
                position,
                message: "bad group separator".to_string(),
            },
            Event::Exclusion => ScanError::Syntax {
                needle,
                position,
                message: "bad exclusion".to_string(),
            },
            Event::Terminator => ScanError::Syntax {
                needle,
                position,
                message: "bad terminator".to_string(),
            },
        }
    }
}

/// A lexical scope opened while parsing: the sequence a group interrupted, or
/// the group collecting alternatives.
#[derive(Debug)]
enum Scope {
    Sequence(Vec<Pattern>),
    Group { members: Vec<Pattern>, excluded: bool },
}

/// Mutable state of one `parse` call.
#[derive(Debug)]
struct ParserState<'a> {
    input: &'a str,
    in_array: bool,
    exclude_next: bool,
    cursor: usize,
    stack: Vec<Scope>,
    current: Vec<Pattern>,
}

impl<'a> ParserState<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            in_array: false,
            exclude_next: false,
            cursor: 0,
            stack: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Toggles array-selector mode; fails if toggled out of order.
    fn set_in_array(&mut self, flag: bool, at: usize) -> Result<(), ScanError> {
        if self.in_array == flag {
            return Err(if flag {
                ScanError::BadArrayStart {
                    needle: self.input.to_string(),
                    position: at,
                }
            } else {
                ScanError::BadArrayTerminator {
                    needle: self.input.to_string(),
                    position: at,
                }
            });
        }
        self.in_array = flag;
        Ok(())
    }

    /// Closes the element ending at `at`.
    ///
    /// An empty element is only legal after one of the event's allowed
    /// preceding characters. A non-empty element is validated (array
    /// selectors accept digits, `?`, `*`, `+`, or a parenthesized
    /// sub-expression) and appended as a segment carrying the pending
    /// exclusion flag, which is then cleared.
    fn finish_element(&mut self, at: usize, event: Event) -> Result<(), ScanError> {
        if self.cursor == at {
            let preceding = self.input[..at].chars().next_back();
            if !event.allowed_preceding().contains(&preceding) {
                return Err(event.error(self.input, at));
            }
        } else {
            if event.requires_empty() {
                return Err(event.error(self.input, at));
            }
            let element = &self.input[self.cursor..at];
            let raw = if self.in_array {
                if !valid_array_selector(element) {
                    return Err(ScanError::BadArraySelector {
                        needle: self.input.to_string(),
                        selector: element.to_string(),
                    });
                }
                format!("[{}]", element)
            } else {
                element.to_string()
            };
            self.current
                .push(Pattern::Segment(Wildcard::new(raw, self.exclude_next)));
            self.exclude_next = false;
        }
        self.cursor = at + 1;
        Ok(())
    }

    /// Marks the next segment or group as subtractive.
    fn start_exclusion(&mut self, at: usize) -> Result<(), ScanError> {
        if self.exclude_next {
            return Err(ScanError::RedundantExclusion {
                needle: self.input.to_string(),
                position: at,
            });
        }
        self.exclude_next = true;
        Ok(())
    }

    /// Opens an alternative set and its first alternative sequence.
    fn start_group(&mut self) {
        let excluded = self.exclude_next;
        self.exclude_next = false;
        let outer = std::mem::take(&mut self.current);
        self.stack.push(Scope::Sequence(outer));
        self.stack.push(Scope::Group {
            members: Vec::new(),
            excluded,
        });
        // An excluded group marks the leading segment of every alternative.
        if excluded {
            self.exclude_next = true;
        }
    }

    /// Closes the current alternative and opens a fresh one.
    fn new_group_element(&mut self, at: usize) -> Result<(), ScanError> {
        let alternative = Folded::from_items(std::mem::take(&mut self.current)).into_pattern();
        match self.stack.last_mut() {
            Some(Scope::Group { members, excluded }) => {
                merge_into_group(members, alternative);
                if *excluded {
                    self.exclude_next = true;
                }
                Ok(())
            }
            _ => Err(ScanError::Syntax {
                needle: self.input.to_string(),
                position: at,
                message: "group separator outside of group".to_string(),
            }),
        }
    }

    /// Closes the current alternative and the whole alternative set, folding
    /// the result into the enclosing sequence.
    fn finish_group(&mut self, at: usize) -> Result<(), ScanError> {
        let (mut members, excluded) = match self.stack.pop() {
            Some(Scope::Group { members, excluded }) => (members, excluded),
            _ => {
                return Err(ScanError::UnexpectedGroupTerminator {
                    needle: self.input.to_string(),
                    position: at,
                })
            }
        };
        let alternative = Folded::from_items(std::mem::take(&mut self.current)).into_pattern();
        merge_into_group(&mut members, alternative);

        let folded = if members.len() == 1 {
            members.pop().unwrap_or(Pattern::Sequence(Vec::new()))
        } else {
            Pattern::Group { members, excluded }
        };
        match self.stack.pop() {
            Some(Scope::Sequence(outer)) => {
                self.current = outer;
                self.current.push(folded);
                Ok(())
            }
            _ => Err(ScanError::UnexpectedGroupTerminator {
                needle: self.input.to_string(),
                position: at,
            }),
        }
    }

    /// Closes the outermost sequence and returns the completed pattern.
    fn finalize(self) -> Result<Pattern, ScanError> {
        if !self.stack.is_empty() {
            return Err(ScanError::NonTerminatedGroup {
                needle: self.input.to_string(),
            });
        }
        if self.in_array {
            return Err(ScanError::NonTerminatedArray {
                needle: self.input.to_string(),
            });
        }
        Ok(Folded::from_items(self.current).into_pattern())
    }
}

/// Folds a closed alternative into a group: a nested group flattens its
/// members into the parent set instead of nesting, so chained alternations
/// stay one level deep.
fn merge_into_group(members: &mut Vec<Pattern>, alternative: Pattern) {
    match alternative {
        Pattern::Group {
            members: nested, ..
        } => members.extend(nested),
        other => members.push(other),
    }
}

/// Inside `[...]` only digits, `?`, `*`, `+`, or a fully parenthesized
/// sub-expression are accepted.
fn valid_array_selector(element: &str) -> bool {
    element
        .chars()
        .all(|ch| matches!(ch, '0'..='9' | '?' | '*' | '+'))
        || (element.starts_with('(') && element.ends_with(')'))
}

/// Parses one needle into a pattern tree.
pub fn parse(input: &str) -> Result<Pattern, ScanError> {
    let mut state = ParserState::new(input);
    let mut escaped = false;
    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '.' if !state.in_array => state.finish_element(idx, Event::PathSeparator)?,
            '[' => {
                state.finish_element(idx, Event::ArrayStart)?;
                state.set_in_array(true, idx)?;
            }
            ']' => {
                state.finish_element(idx, Event::ArrayTerminator)?;
                state.set_in_array(false, idx)?;
            }
            '(' if !state.in_array => {
                state.finish_element(idx, Event::GroupStart)?;
                state.start_group();
            }
            '|' if !state.in_array => {
                state.finish_element(idx, Event::GroupSeparator)?;
                state.new_group_element(idx)?;
            }
            ')' if !state.in_array => {
                state.finish_element(idx, Event::GroupTerminator)?;
                state.finish_group(idx)?;
            }
            '!' if !state.in_array => {
                state.finish_element(idx, Event::Exclusion)?;
                state.start_exclusion(idx)?;
            }
            _ => {}
        }
    }
    if escaped {
        return Err(ScanError::Syntax {
            needle: input.to_string(),
            position: input.len(),
            message: "dangling escape".to_string(),
        });
    }
    state.finish_element(input.len(), Event::Terminator)?;
    state.finalize()
}
