//! Validator: full-document validation, and compatibility checking against
//! an externally supplied schema.

use crate::error::{ErrorKind, LineStructError};
use crate::schema::parse_schema_line;
use crate::schema::types::Type;

/// Parses `text` strictly and confirms every data line decodes without
/// error.
pub fn is_valid_linestruct(text: &str) -> bool {
    crate::decode(text).is_ok()
}

/// Checks `text`'s declared schema for compatibility with `external_schema`,
/// then confirms every row strictly decodes against the document's own
/// schema. Returns `None` on success, else a diagnostic carrying a 1-based
/// line number and, where known, the offending field name.
pub fn validate_against(external_schema: &Type, text: &str) -> Option<String> {
    if external_schema.as_object_fields().is_none() {
        return Some(
            LineStructError::new(
                ErrorKind::ExternalSchemaMismatch,
                "external schema must be a field list, not a bare primitive/enum/array type",
            )
            .with_line(2)
            .to_string(),
        );
    }
    let declared = match declared_schema(text) {
        Ok(s) => s,
        Err(e) => return Some(e.to_string()),
    };
    if let Err(reason) = check_compatible(external_schema, &declared) {
        return Some(
            LineStructError::new(ErrorKind::ExternalSchemaMismatch, reason)
                .with_line(2)
                .to_string(),
        );
    }
    match crate::decode(text) {
        Ok(_) => None,
        Err(e) => Some(e.to_string()),
    }
}

fn declared_schema(text: &str) -> Result<Type, LineStructError> {
    let mut lines = text.lines();
    lines
        .next()
        .ok_or_else(|| LineStructError::new(ErrorKind::HeaderMissing, "missing EntityName line").with_line(1))?;
    let schema_line = lines
        .next()
        .ok_or_else(|| LineStructError::new(ErrorKind::HeaderMissing, "missing schema line").with_line(2))?;
    let schema_line = schema_line.strip_suffix('\r').unwrap_or(schema_line);
    parse_schema_line(schema_line).map_err(|e| e.with_line(2))
}

/// Compatibility rules, checked from the external schema's point of view:
/// every required external field must exist in the document schema, and
/// every external field that does exist must have a compatible type.
/// Document fields absent from the external schema are unconstrained.
fn check_compatible(external: &Type, document: &Type) -> Result<(), String> {
    let doc_fields = document.fields();
    for ext_field in external.fields() {
        match doc_fields.iter().find(|f| f.name == ext_field.name) {
            None if !ext_field.optional => {
                return Err(format!(
                    "required field '{}' is missing from the document schema",
                    ext_field.name
                ))
            }
            None => {}
            Some(doc_field) => {
                if !types_compatible(&ext_field.type_, &doc_field.type_) {
                    return Err(format!(
                        "field '{}' has a type incompatible with the external schema",
                        ext_field.name
                    ));
                }
            }
        }
    }
    Ok(())
}

fn types_compatible(external: &Type, document: &Type) -> bool {
    match (external, document) {
        (Type::Primitive(a), Type::Primitive(b)) => a == b,
        (Type::Array(ea), Type::Array(da)) => types_compatible(ea, da),
        (Type::Object(_), Type::Object(_)) => check_compatible(external, document).is_ok(),
        (Type::Enum(ext_values), Type::Enum(doc_values)) => {
            doc_values.iter().all(|v| ext_values.contains(v))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_external_schema;

    #[test]
    fn valid_document_passes() {
        let text = "EntityName:Person\nschema:id:int¦name:string\n1¦John\n2¦Jane";
        assert!(is_valid_linestruct(text));
    }

    #[test]
    fn malformed_row_fails() {
        let text = "EntityName:Person\nschema:id:int¦name:string\n1¦John¦extra";
        assert!(!is_valid_linestruct(text));
    }

    #[test]
    fn validate_against_compatible_external_schema_succeeds() {
        let external = parse_external_schema("id:integer¦name:str").unwrap();
        let text = "EntityName:Person\nschema:id:int¦name:string¦age:int\n1¦John¦30";
        assert_eq!(validate_against(&external, text), None);
    }

    #[test]
    fn validate_against_missing_required_field_fails() {
        let external = parse_external_schema("id:integer¦email:str").unwrap();
        let text = "EntityName:Person\nschema:id:int¦name:string\n1¦John";
        let msg = validate_against(&external, text).unwrap();
        assert!(msg.contains("email"));
    }

    #[test]
    fn validate_against_incompatible_type_fails() {
        let external = parse_external_schema("id:str").unwrap();
        let text = "EntityName:Person\nschema:id:int\n1";
        let msg = validate_against(&external, text).unwrap();
        assert!(msg.contains("id"));
    }

    #[test]
    fn validate_against_rejects_non_object_external_schema() {
        let external = Type::Primitive(crate::schema::types::Primitive::Int);
        let text = "EntityName:Person\nschema:id:int\n1";
        let msg = validate_against(&external, text).unwrap();
        assert!(msg.contains("field list"));
    }

    #[test]
    fn validate_against_enum_requires_superset() {
        let text = "EntityName:Item\nschema:status:{a|b|c}\na";

        let external_superset = parse_external_schema("status:{a|b|c|d}").unwrap();
        assert_eq!(validate_against(&external_superset, text), None);

        let external_narrow = parse_external_schema("status:{a|b}").unwrap();
        let msg = validate_against(&external_narrow, text).unwrap();
        assert!(msg.contains("status"));
    }
}
