//! LineStruct: a compact, UTF-8, line-oriented serialization format for
//! tabular data with nested structure, designed for contexts (such as
//! transport to/from language models) where JSON is verbose or ambiguous.
//!
//! A document is one *entity*: a header line naming it, a `schema:` line
//! describing its rows, then one row per line. See [`decode`] and
//! [`encode`] for the two directions of the format kernel, [`Tree`] and
//! [`Document`] for the in-memory value model, [`DecodeOptions`] and
//! [`SampleOptions`] for configuring decode/sample behavior, and
//! [`validate_against`] for checking a document against an externally
//! supplied schema.

pub mod charset;
pub mod detect;
pub mod encode;
pub mod error;
pub mod infer;
pub mod options;
pub mod row;
pub mod sample;
pub mod schema;
pub mod splitter;
pub mod stream;
pub mod tree;
pub mod validate;

pub use detect::Format;
pub use error::{ErrorKind, LineStructError};
pub use options::{DecodeOptions, SampleOptions};
pub use schema::{parse_external_schema, parse_schema_line, Field, Primitive, Type};
pub use stream::Rows;
pub use tree::{Document, Tree};

use serde_json::{Map, Value};

/// Decode a full document, propagating the first row-level error found
/// (strict mode). Shorthand for `decode_with(text, &DecodeOptions::new())`.
pub fn decode(text: &str) -> Result<Document, LineStructError> {
    decode_with(text, &DecodeOptions::new())
}

/// Decode a full document, skipping any row that fails to decode rather
/// than aborting (tolerant mode — matches the legacy `to_json` convenience
/// path). Shorthand for `decode_with(text, &DecodeOptions::tolerant())`.
pub fn decode_tolerant(text: &str) -> Result<Document, LineStructError> {
    decode_with(text, &DecodeOptions::tolerant())
}

/// Decode a full document under `options`. See [`DecodeOptions`] for the
/// strict/tolerant row-decoding knob.
pub fn decode_with(text: &str, options: &DecodeOptions) -> Result<Document, LineStructError> {
    if text.trim().is_empty() {
        return Err(LineStructError::new(ErrorKind::EmptyInput, "document text is empty"));
    }

    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| LineStructError::new(ErrorKind::HeaderMissing, "missing EntityName line").with_line(1))?;
    let header = header.strip_suffix('\r').unwrap_or(header);
    let entity_name = header
        .strip_prefix("EntityName:")
        .ok_or_else(|| {
            LineStructError::new(ErrorKind::HeaderMissing, "expected a line starting with 'EntityName:'")
                .with_line(1)
        })?
        .to_string();

    let schema_line = lines
        .next()
        .ok_or_else(|| LineStructError::new(ErrorKind::HeaderMissing, "missing schema line").with_line(2))?;
    let schema_line = schema_line.strip_suffix('\r').unwrap_or(schema_line);
    let schema = schema::parse_schema_line(schema_line).map_err(|e| e.with_line(2))?;

    let strict = options.is_strict();
    let mut rows = Vec::new();
    for (i, line) in lines.enumerate() {
        let line_no = i + 3;
        let line = line.strip_suffix('\r').unwrap_or(line);
        let decoded = if strict {
            row::decode_row(line, &schema)
        } else {
            row::decode_row_tolerant(line, &schema)
        };
        match decoded {
            Ok(r) => rows.push(r),
            Err(e) => {
                if strict {
                    return Err(e.with_line(line_no));
                }
            }
        }
    }
    Ok(Document::new(entity_name, rows))
}

/// Render `doc` to LineStruct text, inferring its schema from the rows.
pub fn encode(doc: &Document) -> String {
    encode::encode(doc)
}

/// Parses `text` strictly and confirms every data line decodes.
pub fn is_valid_linestruct(text: &str) -> bool {
    validate::is_valid_linestruct(text)
}

/// Checks `text`'s declared schema against `external_schema` and confirms
/// the document decodes; `None` on success.
pub fn validate_against(external_schema: &Type, text: &str) -> Option<String> {
    validate::validate_against(external_schema, text)
}

/// Classifies `s` as JSON, LineStruct, or Other.
pub fn classify(s: &str) -> Format {
    detect::classify(s)
}

/// Keeps the first `n` rows of `doc` and truncates every nested array (at
/// any depth) to `n` elements. Shorthand for `sample_with(doc,
/// &SampleOptions::new().with_size(n))`.
pub fn sample(doc: &Document, n: usize) -> Document {
    sample::sample(doc, n)
}

/// [`sample`] with the format's default sample size. Shorthand for
/// `sample_with(doc, &SampleOptions::new())`.
pub fn sample_default(doc: &Document) -> Document {
    sample::sample_default(doc)
}

/// Shrinks `doc` under `options`. See [`SampleOptions`] for the row/array
/// size knob.
pub fn sample_with(doc: &Document, options: &SampleOptions) -> Document {
    sample::sample(doc, options.size())
}

/// Drops leading garbage before the `EntityName:` line and any trailing
/// rows left unbalanced by truncated input.
pub fn trim_before_decode(text: &str) -> String {
    sample::trim_before_decode(text)
}

/// `{ "entityName": ..., "data": [...] }`, keys in field-declaration order.
pub fn to_json(doc: &Document) -> Value {
    let mut out = Map::new();
    out.insert("entityName".to_string(), Value::String(doc.entity_name.clone()));
    out.insert(
        "data".to_string(),
        Value::Array(doc.rows.iter().cloned().map(Value::Object).collect()),
    );
    Value::Object(out)
}

/// The inverse of [`to_json`], performing schema inference over `json`'s
/// rows and rendering LineStruct text.
pub fn from_json(json: &Value) -> Result<String, LineStructError> {
    let obj = json
        .as_object()
        .ok_or_else(|| LineStructError::new(ErrorKind::JsonSyntax, "expected a JSON object"))?;
    let entity_name = obj
        .get("entityName")
        .and_then(Value::as_str)
        .ok_or_else(|| LineStructError::new(ErrorKind::JsonSyntax, "missing string field 'entityName'"))?
        .to_string();
    let data = obj
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| LineStructError::new(ErrorKind::JsonSyntax, "missing array field 'data'"))?;
    let rows = data
        .iter()
        .map(|v| {
            v.as_object()
                .cloned()
                .ok_or_else(|| LineStructError::new(ErrorKind::JsonSyntax, "each 'data' element must be an object"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(encode(&Document::new(entity_name, rows)))
}

/// Tolerantly decodes `text` and converts the result straight to the
/// `to_json` wire shape — the legacy-API default path.
pub fn decode_to_json(text: &str) -> Result<Value, LineStructError> {
    decode_tolerant(text).map(|doc| to_json(&doc))
}
