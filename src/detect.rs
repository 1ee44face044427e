//! Format Detector: classifies an arbitrary input string.

use crate::validate::is_valid_linestruct;

/// The detected shape of an input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    LineStruct,
    Other,
}

/// Classify `s`. JSON is checked first by bracket shape plus an actual
/// parse attempt; LineStruct is checked by header shape plus a full strict
/// validation; anything else is `Other`.
pub fn classify(s: &str) -> Format {
    let trimmed = s.trim();
    let looks_like_json = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if looks_like_json && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Format::Json;
    }
    if trimmed.starts_with("EntityName:") && is_valid_linestruct(s) {
        return Format::LineStruct;
    }
    Format::Other
}
