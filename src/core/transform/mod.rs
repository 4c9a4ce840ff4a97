//! Record transformation
//!
//! Maps one [`RawRecord`] to one [`CanonicalRecord`]. The mapping is pure:
//! no I/O and no retry. The only side effect is a warning when a present
//! `born_at` value cannot be interpreted.
//!
//! - [`friends`] - comma-delimited friends cleaning
//! - [`born_at`] - timestamp normalization

pub mod born_at;
pub mod friends;

use crate::domain::{CanonicalRecord, RawRecord, TransformError};
use chrono::DateTime;

pub use born_at::{format_born_at, parse_born_at};
pub use friends::{split_friends, transform_friends};

/// Transform a raw record into its canonical form
///
/// # Errors
///
/// Returns [`TransformError`] if the record has no id or no name. Problems
/// with optional fields never fail the record.
///
/// # Examples
///
/// ```
/// use fauna::core::transform::transform_record;
/// use fauna::domain::{AnimalId, RawRecord};
/// use serde_json::json;
///
/// let raw = RawRecord::new(AnimalId::new(1), "Otter")
///     .with_friends("Seal, Heron,,")
///     .with_born_at(json!(1577836800000i64));
///
/// let record = transform_record(&raw).unwrap();
/// assert_eq!(record.friends, vec!["Seal", "Heron"]);
/// assert_eq!(record.born_at.as_deref(), Some("2020-01-01T00:00:00.000Z"));
/// ```
pub fn transform_record(raw: &RawRecord) -> Result<CanonicalRecord, TransformError> {
    let id = raw.id.ok_or(TransformError::MissingId)?;
    let name = raw
        .name
        .clone()
        .ok_or_else(|| TransformError::MissingName(id.to_string()))?;

    let born_at = match parse_born_at(raw.born_at.as_ref()) {
        Ok(timestamp) => timestamp.map(|ts| format_born_at(&ts)),
        Err(reason) => {
            tracing::warn!(
                animal_id = %id,
                born_at = ?raw.born_at,
                reason = %reason,
                "Unparseable born_at, loading as null"
            );
            None
        }
    };

    Ok(CanonicalRecord {
        id,
        name,
        friends: transform_friends(raw.friends.as_ref()),
        born_at,
        extra: raw.extra.clone(),
    })
}

/// Check that a canonical record faithfully represents its source
///
/// # Errors
///
/// Returns a description of the first mismatch found
pub fn validate_transformation(raw: &RawRecord, canonical: &CanonicalRecord) -> Result<(), String> {
    if raw.id != Some(canonical.id) {
        return Err(format!(
            "id mismatch: source {:?}, canonical {}",
            raw.id, canonical.id
        ));
    }

    if raw.name.as_deref() != Some(canonical.name.as_str()) {
        return Err(format!("name mismatch for animal {}", canonical.id));
    }

    if let Some(friend) = canonical
        .friends
        .iter()
        .find(|friend| friend.is_empty() || friend.trim() != friend.as_str())
    {
        return Err(format!(
            "friend '{friend}' of animal {} is not trimmed",
            canonical.id
        ));
    }

    if let Some(born_at) = &canonical.born_at {
        DateTime::parse_from_rfc3339(born_at).map_err(|e| {
            format!("born_at '{born_at}' of animal {} is not RFC 3339: {e}", canonical.id)
        })?;
    }

    if raw.extra != canonical.extra {
        return Err(format!("passthrough fields differ for animal {}", canonical.id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnimalId;
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_transform_full_record() {
        let raw = raw(json!({
            "id": 7,
            "name": "Badger",
            "friends": "Fox,  Owl",
            "born_at": 0,
            "colour": "grey"
        }));

        let record = transform_record(&raw).unwrap();
        assert_eq!(record.id, AnimalId::new(7));
        assert_eq!(record.name, "Badger");
        assert_eq!(record.friends, vec!["Fox", "Owl"]);
        assert_eq!(record.born_at.as_deref(), Some("1970-01-01T00:00:00.000Z"));
        assert_eq!(record.extra["colour"], json!("grey"));
        assert!(validate_transformation(&raw, &record).is_ok());
    }

    #[test]
    fn test_missing_optional_fields() {
        let record = transform_record(&raw(json!({"id": 1, "name": "Mole"}))).unwrap();
        assert!(record.friends.is_empty());
        assert!(record.born_at.is_none());
    }

    #[test]
    fn test_invalid_born_at_becomes_null() {
        let record =
            transform_record(&raw(json!({"id": 1, "name": "Mole", "born_at": "soon"}))).unwrap();
        assert!(record.born_at.is_none());
    }

    #[test]
    fn test_missing_id_fails() {
        let err = transform_record(&raw(json!({"name": "Ghost"}))).unwrap_err();
        assert_eq!(err, TransformError::MissingId);
    }

    #[test]
    fn test_missing_name_fails() {
        let err = transform_record(&raw(json!({"id": 12}))).unwrap_err();
        assert_eq!(err, TransformError::MissingName("12".to_string()));
    }

    #[test]
    fn test_validate_detects_mismatch() {
        let source = raw(json!({"id": 3, "name": "Vole"}));
        let mut record = transform_record(&source).unwrap();
        record.name = "Shrew".to_string();
        assert!(validate_transformation(&source, &record).is_err());

        let mut record = transform_record(&source).unwrap();
        record.born_at = Some("not a date".to_string());
        assert!(validate_transformation(&source, &record).is_err());

        let mut record = transform_record(&source).unwrap();
        record.friends = vec![" padded".to_string()];
        assert!(validate_transformation(&source, &record).is_err());
    }
}
