//! Byte-span edits applied to source text
//!
//! Edits are collected per file, sorted, deduplicated, checked for overlap,
//! and spliced in a single pass. The replacement text is spliced literally;
//! the caller is responsible for formatting.

use std::fmt;

/// One replacement of a byte range with new text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset in the original source
    pub start: usize,
    /// End byte offset (exclusive); equal to `start` for pure insertions
    pub end: usize,
    /// Replacement text
    pub text: String,
}

impl Edit {
    pub fn replace(start: usize, end: usize, text: String) -> Self {
        Edit { start, end, text }
    }

    pub fn insert(at: usize, text: String) -> Self {
        Edit { start: at, end: at, text }
    }
}

/// Errors that can occur while applying edits
#[derive(Debug)]
pub enum EditError {
    /// Two edits overlap, making the splice ambiguous
    Overlapping { first: (usize, usize), second: (usize, usize) },
    /// An edit's range does not fit the source
    OutOfBounds { start: usize, end: usize, len: usize },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::Overlapping { first, second } => write!(
                f,
                "overlapping edits at {}..{} and {}..{}, splice is ambiguous",
                first.0, first.1, second.0, second.1
            ),
            EditError::OutOfBounds { start, end, len } => {
                write!(f, "edit {}..{} out of bounds for source of {} bytes", start, end, len)
            }
        }
    }
}

impl std::error::Error for EditError {}

/// Apply a set of edits to the source in one pass.
///
/// Edits are sorted by position and identical edits are collapsed. Insertions
/// at the same offset are kept and applied in their given order.
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    for edit in edits {
        if edit.start > edit.end || edit.end > source.len() {
            return Err(EditError::OutOfBounds {
                start: edit.start,
                end: edit.end,
                len: source.len(),
            });
        }
    }

    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.start, e.end));
    sorted.dedup();

    for pair in sorted.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        if current.end > next.start {
            return Err(EditError::Overlapping {
                first: (current.start, current.end),
                second: (next.start, next.end),
            });
        }
    }

    let mut result = String::with_capacity(source.len());
    let mut last_end = 0;
    for edit in &sorted {
        result.push_str(&source[last_end..edit.start]);
        result.push_str(&edit.text);
        last_end = edit.end;
    }
    result.push_str(&source[last_end..]);

    Ok(result)
}
