use linestruct::{decode, encode, Document};
use serde_json::{json, Value};

#[test]
fn flat_document_round_trips_byte_exact() {
    let text = "EntityName:Person\nschema:id:int¦name:string¦age:int\n1¦John Doe¦30\n2¦Jane Roe¦25";
    let doc = decode(text).unwrap();
    assert_eq!(encode(&doc), text);
}

#[test]
fn nested_document_round_trips_at_the_tree_level() {
    let text = "EntityName:Order\nschema:id:int¦customer:‹name:string¦email:string›¦items:«‹product:string¦quantity:int¦price:float›»¦status:{pending|shipped|delivered}\n1¦‹John Doe¦john@example.com›¦«‹Laptop¦1¦999.99›¦‹Mouse¦2¦25.50›»¦pending";
    let doc = decode(text).unwrap();
    let reencoded = encode(&doc);
    assert_eq!(decode(&reencoded).unwrap(), doc);
}

#[test]
fn document_built_from_scratch_encodes_and_decodes_back() {
    let doc = Document::new(
        "Widget",
        vec![
            json!({"id": 1, "name": "Bolt", "price": 0.5}).as_object().unwrap().clone(),
            json!({"id": 2, "name": "Nut", "price": 0.1}).as_object().unwrap().clone(),
        ],
    );
    let text = encode(&doc);
    let round_tripped = decode(&text).unwrap();
    assert_eq!(round_tripped, doc);
}

#[test]
fn optional_trailing_fields_are_trimmed_on_encode() {
    let doc = Document::new(
        "Contact",
        vec![
            json!({"id": 1, "name": "Ann", "phone": Value::Null}).as_object().unwrap().clone(),
            json!({"id": 2, "name": "Bea", "phone": "555-0100"}).as_object().unwrap().clone(),
        ],
    );
    let text = encode(&doc);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[2], "1¦Ann");
    assert_eq!(lines[3], "2¦Bea¦555-0100");
}

#[test]
fn empty_arrays_and_objects_encode_compactly() {
    let doc = Document::new(
        "Basket",
        vec![json!({"id": 1, "items": []}).as_object().unwrap().clone()],
    );
    let text = encode(&doc);
    assert_eq!(text.lines().nth(2).unwrap(), "1¦«»");
}
