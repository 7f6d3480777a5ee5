use std::io::Write;

use serde_json::Value;

use ukmec::table::{ConditionSource, TableSource};
use ukmec::{ConditionGroup, IntegrityError, Method, ReferenceTable};

const DATA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/ukmec_2016.json");

fn builtin_json() -> Value {
    let text = std::fs::read_to_string(DATA_PATH).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn condition_mut<'a>(doc: &'a mut Value, id: &str) -> &'a mut Value {
    doc["conditions"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|c| c["id"] == id)
        .unwrap()
}

#[test]
fn missing_method_slot_names_condition_and_method() {
    let mut doc = builtin_json();
    condition_mut(&mut doc, "AF")["ratings"]
        .as_object_mut()
        .unwrap()
        .remove("pop");

    let err = ReferenceTable::from_json(&doc.to_string()).unwrap_err();
    assert_eq!(
        err,
        IntegrityError::MissingMethod {
            condition: "AF".to_string(),
            method: Method::Pop,
        }
    );
    let msg = err.to_string();
    assert!(msg.contains("AF"));
    assert!(msg.contains("pop"));
}

#[test]
fn first_violation_is_reported() {
    let mut doc = builtin_json();
    condition_mut(&mut doc, "AGE_GE_20")["ratings"]["chc"] = serde_json::json!([5, 1]);
    condition_mut(&mut doc, "SLE_APL")["ratings"]
        .as_object_mut()
        .unwrap()
        .remove("dmpa");

    let err = ReferenceTable::from_json(&doc.to_string()).unwrap_err();
    assert!(matches!(
        err,
        IntegrityError::CategoryOutOfRange { ref condition, method: Method::Chc, value: 5 }
            if condition == "AGE_GE_20"
    ));
}

#[test]
fn unknown_group_or_field_is_a_parse_error() {
    let mut doc = builtin_json();
    condition_mut(&mut doc, "AF")["group"] = Value::from("dermatology");
    assert!(matches!(
        ReferenceTable::from_json(&doc.to_string()),
        Err(IntegrityError::Parse { .. })
    ));

    let mut doc = builtin_json();
    condition_mut(&mut doc, "AF")["colour"] = Value::from("red");
    assert!(matches!(
        ReferenceTable::from_json(&doc.to_string()),
        Err(IntegrityError::Parse { .. })
    ));
}

#[test]
fn non_integer_category_is_a_parse_error() {
    let mut doc = builtin_json();
    condition_mut(&mut doc, "AF")["ratings"]["chc"] = serde_json::json!([2.5, 2]);
    assert!(matches!(
        ReferenceTable::from_json(&doc.to_string()),
        Err(IntegrityError::Parse { .. })
    ));
}

#[test]
fn empty_table_rejected() {
    let err = ReferenceTable::from_source(TableSource::new("empty")).unwrap_err();
    assert_eq!(err, IntegrityError::EmptyTable);
}

#[test]
fn loads_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(builtin_json().to_string().as_bytes()).unwrap();
    file.flush().unwrap();

    let from_file = ReferenceTable::from_path(file.path()).unwrap();
    let builtin = ReferenceTable::builtin().unwrap();
    assert_eq!(from_file.len(), builtin.len());
    assert_eq!(from_file.fingerprint(), builtin.fingerprint());
}

#[test]
fn broken_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.json");
    std::fs::write(&path, "{\"revision\": {\"name\": \"x\"}, \"conditions\": [").unwrap();
    assert!(matches!(
        ReferenceTable::from_path(&path),
        Err(IntegrityError::Parse { .. })
    ));

    let missing = dir.path().join("missing.json");
    let err = ReferenceTable::from_path(&missing).unwrap_err();
    assert!(matches!(err, IntegrityError::Io { ref path, .. } if path.contains("missing.json")));
}

#[test]
fn fingerprint_is_stable_hex() {
    let a = ReferenceTable::builtin().unwrap().fingerprint();
    let b = ReferenceTable::builtin().unwrap().fingerprint();
    assert_eq!(a, b);

    let encoded = a.to_hex();
    assert_eq!(encoded.len(), 64);
    assert_eq!(hex::decode(&encoded).unwrap(), a.as_bytes().to_vec());
    assert_eq!(a.to_string(), encoded);
}

#[test]
fn fingerprint_tracks_category_changes() {
    let base = ReferenceTable::builtin().unwrap().fingerprint();

    let mut doc = builtin_json();
    condition_mut(&mut doc, "AF")["label"] = Value::from("Atrial fibrillation (relabelled)");
    let relabelled = ReferenceTable::from_json(&doc.to_string()).unwrap();
    assert_eq!(relabelled.fingerprint(), base);

    condition_mut(&mut doc, "AF")["ratings"]["chc"] = serde_json::json!([3, 3]);
    let changed = ReferenceTable::from_json(&doc.to_string()).unwrap();
    assert_ne!(changed.fingerprint(), base);
}

#[test]
fn synthetic_table_from_source() {
    let source = TableSource::new("synthetic")
        .with_condition(
            ConditionSource::new("ONLY_ROW", "Only row", ConditionGroup::Anaemias).uniform(3),
        );
    let table = ReferenceTable::from_source(source).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.revision().name, "synthetic");
    assert!(table.revision().published.is_none());
}
