//! The language-neutral Tree value model and the Document it backs.
//!
//! `serde_json`'s `preserve_order` feature gives the ordered-mapping
//! guarantee the format relies on, so `Tree` is a plain alias rather than
//! a hand-rolled ordered map.

use serde_json::{Map, Value};

/// A LineStruct value: mirrors JSON's value model (null, bool, integer,
/// float, string, ordered mapping, ordered sequence).
pub type Tree = Value;

/// A full document: an entity name plus a sequence of rows, each row being
/// a string-keyed ordered mapping whose shape conforms to the document's
/// schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub entity_name: String,
    pub rows: Vec<Map<String, Value>>,
}

impl Document {
    pub fn new(entity_name: impl Into<String>, rows: Vec<Map<String, Value>>) -> Self {
        Self {
            entity_name: entity_name.into(),
            rows,
        }
    }
}
