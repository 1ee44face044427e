//! Row Parser: decodes row text against a schema AST into a Tree.

use serde_json::{Map, Number, Value};

use crate::charset::{self, ARRAY_END, ARRAY_START, OBJECT_END, OBJECT_START};
use crate::error::{ErrorKind, LineStructError};
use crate::schema::types::{Field, Primitive, Type};
use crate::splitter::{split_fields, SplitMode};

/// Decode one data line against the root schema.
///
/// `strict` selects strict vs. tolerant value coercion: in strict mode a
/// required numeric/bool/date(-time) field left empty is a `ValueSyntax`
/// error; in tolerant mode it is coerced to that type's zero value. A
/// missing or extra field is always an error regardless of `strict` —
/// only the *value*-level coercion differs.
pub fn decode_row(row_text: &str, schema: &Type) -> Result<Map<String, Value>, LineStructError> {
    decode_row_mode(row_text, schema, true)
}

/// As [`decode_row`], but with the tolerant value-coercion rule applied.
pub fn decode_row_tolerant(row_text: &str, schema: &Type) -> Result<Map<String, Value>, LineStructError> {
    decode_row_mode(row_text, schema, false)
}

fn decode_row_mode(row_text: &str, schema: &Type, strict: bool) -> Result<Map<String, Value>, LineStructError> {
    let fields = schema.fields();
    let values = split_fields(row_text, SplitMode::RowFields);
    decode_fields(&values, fields, strict)
}

fn decode_fields(values: &[String], fields: &[Field], strict: bool) -> Result<Map<String, Value>, LineStructError> {
    let mut row = Map::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        let decoded = match values.get(i) {
            Some(raw) => decode_value(raw, &field.type_, field.optional, strict)
                .map_err(|e| e.with_field(field.name.clone()))?,
            None if field.optional => Value::Null,
            None => {
                return Err(LineStructError::new(
                    ErrorKind::RowUnderflow,
                    "required field has no value",
                )
                .with_field(field.name.clone()))
            }
        };
        row.insert(field.name.clone(), decoded);
    }
    if values.len() > fields.len() {
        return Err(LineStructError::new(
            ErrorKind::RowOverflow,
            format!(
                "row has {} value(s) but schema declares {} field(s)",
                values.len(),
                fields.len()
            ),
        ));
    }
    Ok(row)
}

/// Decode a single value against a type node.
fn decode_value(raw: &str, ty: &Type, optional: bool, strict: bool) -> Result<Value, LineStructError> {
    match ty {
        Type::Primitive(p) => decode_primitive(raw, *p, optional, strict),
        Type::Enum(values) => decode_enum(raw, values, optional),
        Type::Object(fields) => decode_object(raw, fields, optional, strict),
        Type::Array(elem) => decode_array(raw, elem, optional, strict),
    }
}

fn decode_primitive(raw: &str, p: Primitive, optional: bool, strict: bool) -> Result<Value, LineStructError> {
    if raw.is_empty() {
        if optional {
            return Ok(Value::Null);
        }
        return match p {
            Primitive::String => Ok(Value::String(String::new())),
            _ if !strict => Ok(lenient_zero_value(p)),
            _ => Err(LineStructError::new(
                ErrorKind::ValueSyntax,
                format!("empty value for required {} field", p.keyword()),
            )),
        };
    }

    let unescaped = charset::unescape(raw);
    match p {
        Primitive::String => Ok(Value::String(unescaped)),
        Primitive::Int => unescaped
            .parse::<i64>()
            .map(|n| Value::Number(Number::from(n)))
            .map_err(|_| {
                LineStructError::new(ErrorKind::ValueSyntax, format!("'{unescaped}' is not a valid int"))
            }),
        Primitive::Float => unescaped
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| {
                LineStructError::new(ErrorKind::ValueSyntax, format!("'{unescaped}' is not a valid float"))
            }),
        Primitive::Bool => match unescaped.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(LineStructError::new(
                ErrorKind::ValueSyntax,
                format!("'{unescaped}' is not a valid bool"),
            )),
        },
        Primitive::Date => {
            if is_valid_date(&unescaped) {
                Ok(Value::String(unescaped))
            } else {
                Err(LineStructError::new(
                    ErrorKind::ValueSyntax,
                    format!("'{unescaped}' is not a valid date"),
                ))
            }
        }
        Primitive::DateTime => {
            if is_valid_datetime(&unescaped) {
                Ok(Value::String(unescaped))
            } else {
                Err(LineStructError::new(
                    ErrorKind::ValueSyntax,
                    format!("'{unescaped}' is not a valid datetime"),
                ))
            }
        }
    }
}

/// Zero/default value used by the tolerant decode path when a required
/// numeric/bool/date(-time) field is left empty.
fn lenient_zero_value(p: Primitive) -> Value {
    match p {
        Primitive::String => Value::String(String::new()),
        Primitive::Int => Value::Number(Number::from(0)),
        Primitive::Float => Value::Number(Number::from_f64(0.0).unwrap()),
        Primitive::Bool => Value::Bool(false),
        Primitive::Date | Primitive::DateTime => Value::String(String::new()),
    }
}

fn decode_enum(raw: &str, values: &[String], optional: bool) -> Result<Value, LineStructError> {
    if raw.is_empty() && optional {
        return Ok(Value::Null);
    }
    let unescaped = charset::unescape(raw);
    if values.iter().any(|v| v == &unescaped) {
        Ok(Value::String(unescaped))
    } else {
        Err(LineStructError::new(
            ErrorKind::ValueSyntax,
            format!("'{unescaped}' is not a member of the declared enum"),
        ))
    }
}

fn decode_object(raw: &str, fields: &[Field], optional: bool, strict: bool) -> Result<Value, LineStructError> {
    if raw.is_empty() && optional {
        return Ok(Value::Null);
    }
    let inner = strip_delimiters(raw, OBJECT_START, OBJECT_END)?;
    let values = split_fields(&inner, SplitMode::ObjectFields);
    // An empty-and-optional object's raw text is exactly "‹›"; that yields
    // one empty segment from the splitter, which decode_fields resolves
    // field-by-field (optional child fields become null, required ones
    // error), matching the general trailing-trim rendering rule.
    let values = if inner.is_empty() { Vec::new() } else { values };
    Ok(Value::Object(decode_fields(&values, fields, strict)?))
}

fn decode_array(raw: &str, elem: &Type, optional: bool, strict: bool) -> Result<Value, LineStructError> {
    if raw.is_empty() && optional {
        return Ok(Value::Null);
    }
    let inner = strip_delimiters(raw, ARRAY_START, ARRAY_END)?;
    if inner.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    let mode = match elem {
        Type::Object(_) => SplitMode::ArrayOfObjects,
        Type::Array(_) => SplitMode::ArrayOfArrays,
        Type::Primitive(_) | Type::Enum(_) => SplitMode::ArrayOfPrimitives,
    };
    let segments = split_fields(&inner, mode);
    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        out.push(decode_value(&seg, elem, false, strict)?);
    }
    Ok(Value::Array(out))
}

fn strip_delimiters(raw: &str, open: char, close: char) -> Result<String, LineStructError> {
    let mut chars = raw.chars();
    match (chars.next(), raw.chars().next_back()) {
        (Some(a), Some(b)) if a == open && b == close && raw.chars().count() >= 2 => {
            Ok(chars.as_str()[..chars.as_str().len() - close.len_utf8()].to_string())
        }
        _ => Err(LineStructError::new(
            ErrorKind::DelimiterMismatch,
            format!("value is missing its opening '{open}' or closing '{close}' delimiter"),
        )),
    }
}

fn is_valid_date(s: &str) -> bool {
    let b: Vec<char> = s.chars().collect();
    b.len() == 10
        && b[0].is_ascii_digit()
        && b[1].is_ascii_digit()
        && b[2].is_ascii_digit()
        && b[3].is_ascii_digit()
        && b[4] == '-'
        && b[5].is_ascii_digit()
        && b[6].is_ascii_digit()
        && b[7] == '-'
        && b[8].is_ascii_digit()
        && b[9].is_ascii_digit()
}

fn is_valid_datetime(s: &str) -> bool {
    let b: Vec<char> = s.chars().collect();
    if b.len() < 19 || !is_valid_date(&b[0..10].iter().collect::<String>()) {
        return false;
    }
    if b[10] != 'T' {
        return false;
    }
    let time_ok = b[11].is_ascii_digit()
        && b[12].is_ascii_digit()
        && b[13] == ':'
        && b[14].is_ascii_digit()
        && b[15].is_ascii_digit()
        && b[16] == ':'
        && b[17].is_ascii_digit()
        && b[18].is_ascii_digit();
    if !time_ok {
        return false;
    }
    let mut rest = &b[19..];
    if rest.first() == Some(&'.') {
        if rest.len() < 4 || !rest[1].is_ascii_digit() || !rest[2].is_ascii_digit() || !rest[3].is_ascii_digit() {
            return false;
        }
        rest = &rest[4..];
    }
    match rest {
        [] => false,
        ['Z'] => true,
        [sign, h1, h2, ':', m1, m2]
            if (*sign == '+' || *sign == '-')
                && h1.is_ascii_digit()
                && h2.is_ascii_digit()
                && m1.is_ascii_digit()
                && m2.is_ascii_digit() =>
        {
            true
        }
        _ => false,
    }
}
