//! Streaming row decode: an optional row-at-a-time iterator over a
//! document's data lines. Walks its input line-by-line and borrows its
//! schema rather than copying it per row.

use serde_json::{Map, Value};

use crate::error::LineStructError;
use crate::options::DecodeOptions;
use crate::row::{decode_row, decode_row_tolerant};
use crate::schema::types::Type;

/// Yields one decoded row per `next()` call, borrowing `schema` immutably
/// and never retaining references into a previously-yielded row.
pub struct Rows<'a> {
    schema: &'a Type,
    lines: std::str::Lines<'a>,
    options: DecodeOptions,
}

impl<'a> Rows<'a> {
    /// `data_lines` holds only the row lines (header and schema already
    /// consumed by the caller).
    pub fn new(schema: &'a Type, data_lines: &'a str, options: DecodeOptions) -> Self {
        Self {
            schema,
            lines: data_lines.lines(),
            options,
        }
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = Result<Map<String, Value>, LineStructError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        let line = line.strip_suffix('\r').unwrap_or(line);
        Some(if self.options.is_strict() {
            decode_row(line, self.schema)
        } else {
            decode_row_tolerant(line, self.schema)
        })
    }
}
