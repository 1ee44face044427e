//! Schema Inference: derives a `Type::Object` schema from a homogeneous
//! array of tree rows.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::schema::types::{Field, Primitive, Type};

/// Infer a root schema from `rows`.
///
/// Field order follows the first row's insertion order, with any field
/// names first seen in a later row appended in their order of first
/// appearance.
pub fn infer_schema(rows: &[Map<String, Value>]) -> Type {
    let names = ordered_field_names(rows);
    let fields = names.into_iter().map(|name| infer_top_level_field(&name, rows)).collect();
    Type::Object(fields)
}

fn ordered_field_names(rows: &[Map<String, Value>]) -> Vec<String> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.clone()) {
                order.push(key.clone());
            }
        }
    }
    order
}

fn infer_top_level_field(name: &str, rows: &[Map<String, Value>]) -> Field {
    let mut optional = false;
    let mut first_non_null: Option<&Value> = None;
    for row in rows {
        match row.get(name) {
            None => optional = true,
            Some(Value::Null) => optional = true,
            Some(v) => {
                if first_non_null.is_none() {
                    first_non_null = Some(v);
                }
            }
        }
    }

    let ty = match first_non_null {
        // A field seen only as null/absent everywhere defaults to `string`.
        None => Type::Primitive(Primitive::String),
        Some(Value::Array(_)) => infer_array_type_cross_row(name, rows),
        Some(Value::Object(map)) => infer_object_single(map),
        Some(other) => infer_scalar_type(other),
    };
    Field::new(name, ty, optional)
}

/// Array element type: the first element of the first *non-empty* array
/// found for this field across all rows, not just the row that supplied the
/// field's first non-null value.
fn infer_array_type_cross_row(name: &str, rows: &[Map<String, Value>]) -> Type {
    for row in rows {
        if let Some(Value::Array(arr)) = row.get(name) {
            if let Some(first) = arr.first() {
                return Type::Array(Box::new(infer_value_type(first)));
            }
        }
    }
    Type::Array(Box::new(Type::Primitive(Primitive::String)))
}

/// Infers a `Type::Object` from a single tree object, recursively. Below the
/// top level, optionality is derived purely from whether *this* sample's
/// value at a key is null — there is no cross-row search.
fn infer_object_single(map: &Map<String, Value>) -> Type {
    let fields = map
        .iter()
        .map(|(key, value)| {
            let optional = value.is_null();
            let ty = if optional {
                Type::Primitive(Primitive::String)
            } else {
                infer_value_type(value)
            };
            Field::new(key.clone(), ty, optional)
        })
        .collect();
    Type::Object(fields)
}

/// Single-sample type inference used for array elements and nested object
/// values, where only one concrete value (not a column of rows) is
/// available to inspect.
fn infer_value_type(value: &Value) -> Type {
    match value {
        Value::Object(map) => infer_object_single(map),
        Value::Array(arr) => {
            let elem = arr.first().map(infer_value_type).unwrap_or(Type::Primitive(Primitive::String));
            Type::Array(Box::new(elem))
        }
        Value::Null => Type::Primitive(Primitive::String),
        other => infer_scalar_type(other),
    }
}

fn infer_scalar_type(value: &Value) -> Type {
    match value {
        Value::Bool(_) => Type::Primitive(Primitive::Bool),
        Value::Number(n) if n.is_i64() || n.is_u64() => Type::Primitive(Primitive::Int),
        Value::Number(_) => Type::Primitive(Primitive::Float),
        // Dates/datetimes are indistinguishable from strings in the Tree
        // and are emitted as `string`.
        Value::String(_) => Type::Primitive(Primitive::String),
        Value::Null => Type::Primitive(Primitive::String),
        Value::Object(_) | Value::Array(_) => unreachable!("composite values handled by caller"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Map<String, Value>> {
        values
            .into_iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn infers_field_order_and_types_from_homogeneous_rows() {
        let rs = rows(vec![
            json!({"id": 1, "name": "John Doe", "active": true, "height": 5.9}),
            json!({"id": 2, "name": "Jane Roe", "active": false, "height": 6.1}),
        ]);
        let schema = infer_schema(&rs);
        let fields = schema.fields();
        assert_eq!(fields[0].name, "id");
        assert_eq!(fields[0].type_, Type::Primitive(Primitive::Int));
        assert!(!fields[0].optional);
        assert_eq!(fields[2].name, "active");
        assert_eq!(fields[2].type_, Type::Primitive(Primitive::Bool));
        assert_eq!(fields[3].type_, Type::Primitive(Primitive::Float));
    }

    #[test]
    fn field_absent_or_null_in_any_row_is_optional() {
        let rs = rows(vec![
            json!({"id": 1, "email": "a@test.com"}),
            json!({"id": 2}),
            json!({"id": 3, "email": Value::Null}),
        ]);
        let schema = infer_schema(&rs);
        let email = schema.fields().iter().find(|f| f.name == "email").unwrap();
        assert!(email.optional);
        assert_eq!(email.type_, Type::Primitive(Primitive::String));
    }

    #[test]
    fn late_seen_field_is_appended_in_order() {
        let rs = rows(vec![json!({"id": 1}), json!({"id": 2, "tag": "x"}), json!({"id": 3, "note": "y"})]);
        let schema = infer_schema(&rs);
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "tag", "note"]);
    }

    #[test]
    fn all_null_field_defaults_to_string() {
        let rs = rows(vec![json!({"id": 1, "x": Value::Null}), json!({"id": 2, "x": Value::Null})]);
        let schema = infer_schema(&rs);
        let x = schema.fields().iter().find(|f| f.name == "x").unwrap();
        assert_eq!(x.type_, Type::Primitive(Primitive::String));
        assert!(x.optional);
    }

    #[test]
    fn array_element_type_from_first_non_empty_array_across_rows() {
        let rs = rows(vec![
            json!({"id": 1, "tags": []}),
            json!({"id": 2, "tags": ["a", "b"]}),
        ]);
        let schema = infer_schema(&rs);
        let tags = schema.fields().iter().find(|f| f.name == "tags").unwrap();
        assert_eq!(tags.type_, Type::Array(Box::new(Type::Primitive(Primitive::String))));
    }

    #[test]
    fn nested_object_optionality_is_single_sample_only() {
        let rs = rows(vec![
            json!({"id": 1, "customer": {"name": "John", "phone": Value::Null}}),
            json!({"id": 2, "customer": {"name": "Jane", "phone": "555"}}),
        ]);
        let schema = infer_schema(&rs);
        let customer = schema.fields().iter().find(|f| f.name == "customer").unwrap();
        let nested = customer.type_.fields();
        let phone = nested.iter().find(|f| f.name == "phone").unwrap();
        // Derived solely from row 1's sample, where phone is null -> optional,
        // even though row 2 supplies a non-null phone.
        assert!(phone.optional);
    }

    #[test]
    fn nested_array_of_objects_infers_recursively() {
        let rs = rows(vec![json!({
            "id": 1,
            "items": [{"product": "Laptop", "quantity": 1, "price": 999.99}]
        })]);
        let schema = infer_schema(&rs);
        let items = schema.fields().iter().find(|f| f.name == "items").unwrap();
        match &items.type_ {
            Type::Array(elem) => {
                let fields = elem.fields();
                assert_eq!(fields[0].name, "product");
                assert_eq!(fields[2].type_, Type::Primitive(Primitive::Float));
            }
            other => panic!("expected array, got {other:?}"),
        }
    }
}
