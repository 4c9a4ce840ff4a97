//! Transformation behavior over representative inputs

use chrono::{DateTime, Utc};
use fauna::core::transform::{transform_record, validate_transformation};
use fauna::domain::{AnimalId, RawRecord, TransformError};
use serde_json::{json, Value};
use test_case::test_case;

fn raw(value: Value) -> RawRecord {
    serde_json::from_value(value).unwrap()
}

#[test_case("Fox,Owl", &["Fox", "Owl"] ; "plain list")]
#[test_case(" Fox , Owl ", &["Fox", "Owl"] ; "surrounding whitespace")]
#[test_case("Fox,,Owl,", &["Fox", "Owl"] ; "empty segments")]
#[test_case(" , ,", &[] ; "only separators")]
#[test_case("", &[] ; "empty string")]
#[test_case("Snowy Owl", &["Snowy Owl"] ; "single name with space")]
#[test_case("Owl,Fox,Owl", &["Owl", "Fox", "Owl"] ; "order and duplicates kept")]
fn test_friends_cleaning(friends: &str, expected: &[&str]) {
    let record = transform_record(&raw(json!({"id": 1, "name": "Otter", "friends": friends}))).unwrap();
    assert_eq!(record.friends, expected);
}

#[test]
fn test_listed_friends_are_cleaned_too() {
    let record =
        transform_record(&raw(json!({"id": 1, "name": "Otter", "friends": [" Fox", "", "Owl "]})))
            .unwrap();
    assert_eq!(record.friends, vec!["Fox", "Owl"]);
}

#[test_case(0 ; "epoch")]
#[test_case(1_577_836_800_000 ; "new year 2020")]
#[test_case(1_582_934_400_123 ; "leap day with millis")]
#[test_case(-86_400_000 ; "before epoch")]
#[test_case(253_402_300_799_999 ; "last millisecond of 9999")]
fn test_epoch_millis_round_trip(millis: i64) {
    let record = transform_record(&raw(json!({"id": 1, "name": "Otter", "born_at": millis}))).unwrap();
    let born_at = record.born_at.unwrap();

    assert!(born_at.ends_with('Z'));
    let parsed: DateTime<Utc> = born_at.parse().unwrap();
    assert_eq!(parsed.timestamp_millis(), millis);
}

#[test_case(json!("2020-02-29T12:30:00+02:00"), Some("2020-02-29T10:30:00.000Z") ; "offset normalized to utc")]
#[test_case(json!("2020-02-29"), Some("2020-02-29T00:00:00.000Z") ; "date only")]
#[test_case(json!("1577836800000"), Some("2020-01-01T00:00:00.000Z") ; "numeric string")]
#[test_case(json!(null), None ; "null")]
#[test_case(json!("   "), None ; "blank")]
#[test_case(json!("next tuesday"), None ; "unparseable")]
#[test_case(json!(true), None ; "wrong type")]
fn test_born_at_normalization(born_at: Value, expected: Option<&str>) {
    let record =
        transform_record(&raw(json!({"id": 1, "name": "Otter", "born_at": born_at}))).unwrap();
    assert_eq!(record.born_at.as_deref(), expected);
}

#[test]
fn test_missing_born_at_serializes_as_null() {
    let record = transform_record(&RawRecord::new(AnimalId::new(9), "Heron")).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["born_at"], Value::Null);
    assert_eq!(value["friends"], json!([]));
}

#[test]
fn test_extra_fields_pass_through() {
    let source = raw(json!({"id": 4, "name": "Hare", "diet": "clover", "legs": 4}));
    let record = transform_record(&source).unwrap();

    assert_eq!(record.extra.get("diet"), Some(&json!("clover")));
    assert_eq!(record.extra.get("legs"), Some(&json!(4)));
    assert!(validate_transformation(&source, &record).is_ok());
}

#[test_case(json!({"name": "Ghost"}), TransformError::MissingId ; "missing id")]
#[test_case(json!({"id": 5}), TransformError::MissingName("5".to_string()) ; "missing name")]
fn test_required_fields(value: Value, expected: TransformError) {
    assert_eq!(transform_record(&raw(value)).unwrap_err(), expected);
}

#[test]
fn test_transform_is_deterministic() {
    let source = raw(json!({
        "id": 12,
        "name": "Badger",
        "friends": "Mole, Toad",
        "born_at": "2019-07-04T08:00:00Z",
    }));

    let first = transform_record(&source).unwrap();
    let second = transform_record(&source).unwrap();
    assert_eq!(first, second);
    assert!(validate_transformation(&source, &first).is_ok());
}
