//! Field Splitter: depth- and escape-aware top-level field splitting.

use crate::charset::{ARRAY_END, ARRAY_START, ESCAPE, FIELD_DELIM, OBJECT_END, OBJECT_START};

/// Splitting mode, selecting how top-level segments are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Row-level columns, separated by `¦` at depth 0.
    RowFields,
    /// Object field values (after the wrapping `‹…›` has been stripped),
    /// separated by `¦` at depth 0.
    ObjectFields,
    /// Array-of-primitive elements, separated by `¦` at depth 0.
    ArrayOfPrimitives,
    /// Array-of-object elements: segments run from a `‹` to its matching
    /// `›`; a `¦` immediately following a `›` separates elements.
    ArrayOfObjects,
    /// Array-of-array elements: analogous to [`SplitMode::ArrayOfObjects`]
    /// using `«`/`»`.
    ArrayOfArrays,
}

/// Split `s` into its ordered top-level substrings per `mode`.
///
/// Never unescapes — callers apply [`crate::charset::unescape`] once they
/// know a segment is a scalar leaf, not before.
pub fn split_fields(s: &str, mode: SplitMode) -> Vec<String> {
    match mode {
        SplitMode::RowFields | SplitMode::ObjectFields | SplitMode::ArrayOfPrimitives => {
            split_by_delimiter(s)
        }
        SplitMode::ArrayOfObjects => split_by_brackets(s, OBJECT_START, OBJECT_END),
        SplitMode::ArrayOfArrays => split_by_brackets(s, ARRAY_START, ARRAY_END),
    }
}

/// Single left-to-right pass, splitting on `¦` at depth 0.
///
/// `‹`/`«` increment depth, `›`/`»` decrement it; a code point preceded by
/// an (unescaped) escape is treated as literal data regardless of its
/// identity. Always emits a final segment, even if empty, so that a
/// trailing empty optional field round-trips.
fn split_by_delimiter(s: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut escaped = false;

    for c in s.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            ESCAPE => {
                escaped = true;
                current.push(c);
            }
            OBJECT_START | ARRAY_START => {
                depth += 1;
                current.push(c);
            }
            OBJECT_END | ARRAY_END => {
                depth -= 1;
                current.push(c);
            }
            FIELD_DELIM if depth == 0 => {
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

/// Split into `open…close` bracketed chunks (each possibly containing
/// nested `open`/`close` pairs of the same kind), with a `¦` directly after
/// a closing bracket acting as the element separator.
fn split_by_brackets(s: &str, open: char, close: char) -> Vec<String> {
    let mut segments = Vec::new();
    let mut chars = s.chars().peekable();
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            ESCAPE => escaped = true,
            FIELD_DELIM => {
                // separators between elements; skip
            }
            _ if c == open => {
                let mut segment = String::new();
                segment.push(c);
                let mut depth = 1;
                let mut inner_escaped = false;
                for c2 in chars.by_ref() {
                    segment.push(c2);
                    if inner_escaped {
                        inner_escaped = false;
                        continue;
                    }
                    if c2 == ESCAPE {
                        inner_escaped = true;
                    } else if c2 == open {
                        depth += 1;
                    } else if c2 == close {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                }
                segments.push(segment);
            }
            _ => {
                // stray content outside brackets; ignore (caller passed a
                // well-formed array body)
            }
        }
    }
    segments
}
