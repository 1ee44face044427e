//! Sampling & Trimming: shrinking a document for preview purposes, and
//! recovering a clean document suffix from noisy input.

use serde_json::{Map, Value};

use crate::tree::Document;

const DEFAULT_SAMPLE_SIZE: usize = 3;

/// Keep only the first `n` rows of `doc`, and truncate every nested array
/// (at any depth, in every kept row) to at most `n` elements.
pub fn sample(doc: &Document, n: usize) -> Document {
    let rows = doc
        .rows
        .iter()
        .take(n)
        .map(|row| truncate_arrays(row, n))
        .collect();
    Document::new(doc.entity_name.clone(), rows)
}

/// [`sample`] with the default sample size of 3.
pub fn sample_default(doc: &Document) -> Document {
    sample(doc, DEFAULT_SAMPLE_SIZE)
}

fn truncate_arrays(row: &Map<String, Value>, n: usize) -> Map<String, Value> {
    row.iter().map(|(k, v)| (k.clone(), truncate_value(v, n))).collect()
}

fn truncate_value(value: &Value, n: usize) -> Value {
    match value {
        Value::Array(items) => {
            Value::Array(items.iter().take(n).map(|v| truncate_value(v, n)).collect())
        }
        Value::Object(map) => {
            Value::Object(map.iter().map(|(k, v)| (k.clone(), truncate_value(v, n))).collect())
        }
        other => other.clone(),
    }
}

/// Pre-pass over raw text that (i) drops leading garbage lines up to (but
/// not including) the `EntityName:` line, and (ii) drops trailing lines
/// whose bracket counters are unbalanced or that end mid-escape. The
/// header and schema lines, when present, are assumed complete.
pub fn trim_before_decode(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some(start) = lines.iter().position(|l| l.starts_with("EntityName:")) else {
        return String::new();
    };

    let mut kept: Vec<&str> = Vec::new();
    for (i, line) in lines[start..].iter().enumerate() {
        // Header and schema lines are assumed well-formed when present.
        if i < 2 {
            kept.push(line);
            continue;
        }
        if is_balanced(line) {
            kept.push(line);
        } else {
            // The first malformed suffix row terminates the scan.
            break;
        }
    }
    kept.join("\n")
}

fn is_balanced(line: &str) -> bool {
    let mut object_depth: i32 = 0;
    let mut array_depth: i32 = 0;
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\u{204A}' => escaped = true,
            '\u{2039}' => object_depth += 1,
            '\u{203A}' => object_depth -= 1,
            '\u{00AB}' => array_depth += 1,
            '\u{00BB}' => array_depth -= 1,
            _ => {}
        }
        if object_depth < 0 || array_depth < 0 {
            return false;
        }
    }
    !escaped && object_depth == 0 && array_depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(rows: Vec<Value>) -> Document {
        Document::new("Item", rows.into_iter().map(|v| v.as_object().unwrap().clone()).collect())
    }

    #[test]
    fn truncates_row_count() {
        let d = doc(vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3}), json!({"id": 4})]);
        let s = sample(&d, 2);
        assert_eq!(s.rows.len(), 2);
    }

    #[test]
    fn truncates_nested_arrays() {
        let d = doc(vec![json!({"id": 1, "tags": ["a", "b", "c", "d"]})]);
        let s = sample(&d, 2);
        assert_eq!(s.rows[0]["tags"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn default_sample_size_is_three() {
        let d = doc(vec![
            json!({"id": 1}),
            json!({"id": 2}),
            json!({"id": 3}),
            json!({"id": 4}),
        ]);
        assert_eq!(sample_default(&d).rows.len(), 3);
    }

    #[test]
    fn trim_before_decode_drops_leading_garbage() {
        let text = "oops a stray line\nEntityName:Person\nschema:id:int\n1";
        assert_eq!(trim_before_decode(text), "EntityName:Person\nschema:id:int\n1");
    }

    #[test]
    fn trim_before_decode_drops_unbalanced_trailing_row() {
        let text = "EntityName:Person\nschema:id:int¦c:string\n1¦ok\n2¦‹unterminated";
        assert_eq!(trim_before_decode(text), "EntityName:Person\nschema:id:int¦c:string\n1¦ok");
    }

    #[test]
    fn trim_before_decode_with_no_header_is_empty() {
        assert_eq!(trim_before_decode("just some prose"), "");
    }
}
