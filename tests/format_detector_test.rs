use linestruct::{classify, Format};

#[test]
fn json_object_and_array_are_detected() {
    assert_eq!(classify(r#"{"a": [1, 2, 3]}"#), Format::Json);
    assert_eq!(classify("[1, 2, 3]"), Format::Json);
}

#[test]
fn valid_linestruct_document_is_detected() {
    let text = "EntityName:Person\nschema:id:int¦name:string\n1¦John";
    assert_eq!(classify(text), Format::LineStruct);
}

#[test]
fn invalid_linestruct_document_falls_back_to_other() {
    let text = "EntityName:Person\nschema:id:int¦name:string\n1¦John¦extra";
    assert_eq!(classify(text), Format::Other);
}

#[test]
fn bracket_shaped_but_invalid_json_falls_back_to_other() {
    assert_eq!(classify("{not valid json"), Format::Other);
}

#[test]
fn prose_is_other() {
    assert_eq!(classify("hello, world"), Format::Other);
}
