//! Tree→Document Encoder: infers a schema from a Tree's rows, then renders
//! the full LineStruct text.

use serde_json::{Map, Value};

use crate::charset;
use crate::infer::infer_schema;
use crate::schema::types::{Field, Type};
use crate::tree::Document;

/// Render `doc` to LineStruct text: header line, schema line, then one row
/// per line, all joined by `\n` (no trailing newline).
pub fn encode(doc: &Document) -> String {
    let schema = infer_schema(&doc.rows);
    let mut lines = Vec::with_capacity(doc.rows.len() + 2);
    lines.push(format!("EntityName:{}", doc.entity_name));
    lines.push(render_schema_line(&schema));
    for row in &doc.rows {
        lines.push(render_row(row, schema.fields()));
    }
    lines.join("\n")
}

/// Render `schema` as the text that would follow `"schema:"` — exposed for
/// the Validator, which needs to compare an external schema's canonical
/// text against a document's declared one.
pub fn render_schema_line(schema: &Type) -> String {
    format!("schema:{}", render_field_list(schema.fields()))
}

fn render_field_list(fields: &[Field]) -> String {
    fields.iter().map(render_field).collect::<Vec<_>>().join("¦")
}

fn render_field(field: &Field) -> String {
    let mut out = format!("{}:{}", field.name, render_field_type(&field.type_, field.optional));
    if let Some(desc) = &field.description {
        out.push_str(&format!("@desc=\"{}\"", charset::escape(desc)));
    }
    out
}

/// Emits the short spelling `T?` for an optional primitive/enum and the
/// long spelling `<T>?` when `T` is composite. Both spellings parse
/// identically; this just matches the canonical rendering.
fn render_field_type(ty: &Type, optional: bool) -> String {
    let inner = render_inner_type(ty);
    if !optional {
        return inner;
    }
    if ty.is_composite() {
        format!("<{inner}>?")
    } else {
        format!("{inner}?")
    }
}

fn render_inner_type(ty: &Type) -> String {
    match ty {
        Type::Primitive(p) => p.keyword().to_string(),
        Type::Enum(values) => {
            let escaped: Vec<String> = values.iter().map(|v| charset::escape(v)).collect();
            format!("{{{}}}", escaped.join("|"))
        }
        Type::Array(elem) => format!("«{}»", render_inner_type(elem)),
        Type::Object(fields) => format!("‹{}›", render_field_list(fields)),
    }
}

/// Render one data row against `fields` in schema order, applying
/// trailing-optional trimming.
pub fn render_row(row: &Map<String, Value>, fields: &[Field]) -> String {
    let mut cells: Vec<String> = fields
        .iter()
        .map(|f| render_field_value(row.get(&f.name).unwrap_or(&Value::Null), &f.type_, f.optional))
        .collect();
    trim_trailing(&mut cells, fields);
    cells.join("¦")
}

fn render_field_value(value: &Value, ty: &Type, optional: bool) -> String {
    let _ = optional;
    if value.is_null() {
        return String::new();
    }
    match ty {
        Type::Primitive(_) | Type::Enum(_) => charset::escape(&scalar_to_text(value)),
        Type::Object(fields) => {
            let map = value.as_object().cloned().unwrap_or_default();
            let mut cells: Vec<String> = fields
                .iter()
                .map(|f| render_field_value(map.get(&f.name).unwrap_or(&Value::Null), &f.type_, f.optional))
                .collect();
            trim_trailing(&mut cells, fields);
            format!("‹{}›", cells.join("¦"))
        }
        Type::Array(elem) => {
            let items = value.as_array().cloned().unwrap_or_default();
            let rendered: Vec<String> = items.iter().map(|v| render_field_value(v, elem, false)).collect();
            format!("«{}»", rendered.join("¦"))
        }
    }
}

fn scalar_to_text(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Drop every trailing cell that is both empty *and* belongs to an optional
/// field, including its separator — the last surviving cell is either
/// non-empty or required. Required fields never disappear, even if empty.
fn trim_trailing(cells: &mut Vec<String>, fields: &[Field]) {
    let mut last_keep = None;
    for i in (0..cells.len()).rev() {
        if !cells[i].is_empty() || !fields[i].optional {
            last_keep = Some(i);
            break;
        }
    }
    match last_keep {
        Some(i) => cells.truncate(i + 1),
        None => cells.clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Document;
    use serde_json::json;

    fn doc(entity: &str, rows: Vec<Value>) -> Document {
        Document::new(entity, rows.into_iter().map(|v| v.as_object().unwrap().clone()).collect())
    }

    #[test]
    fn encodes_flat_rows_with_inferred_schema() {
        let d = doc(
            "Person",
            vec![
                json!({"id": 1, "name": "John Doe", "age": 30}),
                json!({"id": 2, "name": "Jane Roe", "age": 25}),
            ],
        );
        let text = encode(&d);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "EntityName:Person");
        assert_eq!(lines[1], "schema:id:int¦name:string¦age:int");
        assert_eq!(lines[2], "1¦John Doe¦30");
        assert_eq!(lines[3], "2¦Jane Roe¦25");
    }

    #[test]
    fn trims_trailing_optional_empties() {
        let d = doc(
            "User",
            vec![json!({"id": 1, "name": "Bob", "email": Value::Null, "phone": Value::Null})],
        );
        let text = encode(&d);
        let row_line = text.lines().nth(2).unwrap();
        assert_eq!(row_line, "1¦Bob");
    }

    #[test]
    fn required_trailing_field_is_never_trimmed() {
        // `tag` is never null/absent across rows, so it's required — even
        // though row 1's value is the empty string, its separator survives.
        let d = doc(
            "Item",
            vec![json!({"id": 1, "tag": ""}), json!({"id": 2, "tag": "x"})],
        );
        let text = encode(&d);
        assert_eq!(text.lines().nth(2).unwrap(), "1¦");
        assert_eq!(text.lines().nth(3).unwrap(), "2¦x");
    }

    #[test]
    fn empty_array_renders_as_empty_brackets() {
        let d = doc("Tagged", vec![json!({"id": 1, "tags": []})]);
        let text = encode(&d);
        let row_line = text.lines().nth(2).unwrap();
        assert_eq!(row_line, "1¦«»");
    }

    #[test]
    fn nested_object_trims_and_wraps() {
        let d = doc(
            "Order",
            vec![json!({
                "id": 1,
                "customer": {"name": "John", "phone": Value::Null}
            })],
        );
        let text = encode(&d);
        let row_line = text.lines().nth(2).unwrap();
        assert_eq!(row_line, "1¦‹John›");
    }

    #[test]
    fn escapes_special_characters_in_scalars() {
        let d = doc("EscapeTest", vec![json!({"id": 1, "note": "a¦b‹c›d«e»f|g"})]);
        let text = encode(&d);
        let row_line = text.lines().nth(2).unwrap();
        assert_eq!(
            row_line,
            "1¦a\u{204A}\u{00A6}b\u{204A}\u{2039}c\u{204A}\u{203A}d\u{204A}\u{00AB}e\u{204A}\u{00BB}f\u{204A}|g"
        );
    }
}
