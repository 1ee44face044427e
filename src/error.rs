//! Error types for LineStruct decoding, encoding, and validation.

use thiserror::Error;

/// Semantic error classification.
///
/// These are stable, matching-by-name categories rather than a grab bag of
/// ad-hoc strings, so callers can branch on `kind()` without parsing
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Null/blank input.
    EmptyInput,
    /// Missing `EntityName:` or `schema:` line.
    HeaderMissing,
    /// Malformed schema: unterminated bracket, unknown primitive, empty
    /// enum, duplicate field name, missing `:`.
    SchemaSyntax,
    /// A required field had no value.
    RowUnderflow,
    /// More field values than the schema admits.
    RowOverflow,
    /// A primitive value failed its lexical check.
    ValueSyntax,
    /// An object/array value was missing its opening or closing delimiter.
    DelimiterMismatch,
    /// Document schema and an external schema disagree.
    ExternalSchemaMismatch,
    /// Invalid JSON on the JSON side of the bridge.
    JsonSyntax,
}

impl ErrorKind {
    /// Section label used when an error has no associated line (header and
    /// schema-level errors render as `"<section>: <detail>"`).
    fn section(self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "Input",
            ErrorKind::HeaderMissing => "Header",
            ErrorKind::SchemaSyntax => "Schema",
            ErrorKind::RowUnderflow => "Row",
            ErrorKind::RowOverflow => "Row",
            ErrorKind::ValueSyntax => "Value",
            ErrorKind::DelimiterMismatch => "Delimiter",
            ErrorKind::ExternalSchemaMismatch => "Schema",
            ErrorKind::JsonSyntax => "Json",
        }
    }
}

/// A single LineStruct error, carrying enough context to render as
/// `"Line <n>: <subject> <detail>"` when a line is known, or
/// `"<section>: <detail>"` otherwise.
#[derive(Debug, Clone, Error)]
#[error("{}", self.render())]
pub struct LineStructError {
    pub kind: ErrorKind,
    /// 1-based document line number, when the error is row-scoped.
    pub line: Option<usize>,
    /// 0-based character index into the line being parsed, when known
    /// (used by the schema parser, which operates on a single line).
    pub column: Option<usize>,
    /// Offending field name, when known.
    pub field: Option<String>,
    pub message: String,
}

impl LineStructError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            line: None,
            column: None,
            field: None,
            message: message.into(),
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    fn render(&self) -> String {
        match self.line {
            Some(n) => match &self.field {
                Some(f) => format!("Line {n}: field '{f}' {}", self.message),
                None => format!("Line {n}: {}", self.message),
            },
            None => match self.column {
                Some(c) => format!("{}: {} (at char {c})", self.kind.section(), self.message),
                None => format!("{}: {}", self.kind.section(), self.message),
            },
        }
    }
}

impl From<serde_json::Error> for LineStructError {
    fn from(e: serde_json::Error) -> Self {
        LineStructError::new(ErrorKind::JsonSyntax, e.to_string())
    }
}
