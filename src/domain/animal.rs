//! Animal domain models
//!
//! This module defines the two shapes an animal takes on its way through the
//! pipeline: the [`RawRecord`] as received from the detail endpoint, and the
//! [`CanonicalRecord`] that is loaded to the destination.

use super::ids::AnimalId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Friends as sent by the source
///
/// The animal service sends a comma-delimited string; a JSON array of names
/// is accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FriendsField {
    /// Comma-delimited names, e.g. `"Alice, Bob ,,Carol"`
    Delimited(String),
    /// Already split names
    List(Vec<String>),
}

/// One animal as received from the detail endpoint
///
/// Every field is optional so that structurally odd records still decode and
/// can be rejected with a precise reason by the transformer.
///
/// # Examples
///
/// ```
/// use fauna::domain::animal::RawRecord;
///
/// let raw: RawRecord = serde_json::from_str(
///     r#"{"id": 1, "name": "Otter", "friends": "Seal,Heron", "born_at": 1577836800000, "diet": "fish"}"#,
/// ).unwrap();
/// assert_eq!(raw.name.as_deref(), Some("Otter"));
/// assert!(raw.extra.contains_key("diet"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Source identifier
    #[serde(default)]
    pub id: Option<AnimalId>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Friends, delimited or listed
    #[serde(default)]
    pub friends: Option<FriendsField>,

    /// Birth timestamp in the upstream representation
    #[serde(default)]
    pub born_at: Option<Value>,

    /// Passthrough fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRecord {
    /// Creates a raw record with only the required fields set
    pub fn new(id: AnimalId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
            friends: None,
            born_at: None,
            extra: Map::new(),
        }
    }

    /// Sets the delimited friends string
    pub fn with_friends(mut self, friends: impl Into<String>) -> Self {
        self.friends = Some(FriendsField::Delimited(friends.into()));
        self
    }

    /// Sets the raw born_at value
    pub fn with_born_at(mut self, born_at: Value) -> Self {
        self.born_at = Some(born_at);
        self
    }
}

/// Destination-ready animal
///
/// `born_at` serializes as an explicit `null` when the source value was
/// missing or could not be parsed; it is never omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Source identifier
    pub id: AnimalId,

    /// Display name
    pub name: String,

    /// Trimmed, non-empty friend names in source order
    pub friends: Vec<String>,

    /// ISO-8601 UTC timestamp
    pub born_at: Option<String>,

    /// Passthrough fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalRecord {
    /// Creates a new builder for constructing a CanonicalRecord
    pub fn builder() -> CanonicalRecordBuilder {
        CanonicalRecordBuilder::default()
    }
}

/// Builder for constructing CanonicalRecord instances
#[derive(Debug, Default)]
pub struct CanonicalRecordBuilder {
    id: Option<AnimalId>,
    name: Option<String>,
    friends: Vec<String>,
    born_at: Option<String>,
    extra: Map<String, Value>,
}

impl CanonicalRecordBuilder {
    /// Sets the identifier
    pub fn id(mut self, id: impl Into<AnimalId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the friends list
    pub fn friends(mut self, friends: Vec<String>) -> Self {
        self.friends = friends;
        self
    }

    /// Sets the formatted birth timestamp
    pub fn born_at(mut self, born_at: impl Into<String>) -> Self {
        self.born_at = Some(born_at.into());
        self
    }

    /// Adds a passthrough field
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Builds the CanonicalRecord
    ///
    /// # Errors
    ///
    /// Returns an error if the id or name is missing
    pub fn build(self) -> Result<CanonicalRecord, String> {
        Ok(CanonicalRecord {
            id: self.id.ok_or("id is required")?,
            name: self.name.ok_or("name is required")?,
            friends: self.friends,
            born_at: self.born_at,
            extra: self.extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_record_accepts_delimited_friends() {
        let raw: RawRecord =
            serde_json::from_value(json!({"id": 3, "name": "Lynx", "friends": "A,B"})).unwrap();
        assert_eq!(raw.friends, Some(FriendsField::Delimited("A,B".to_string())));
    }

    #[test]
    fn test_raw_record_accepts_listed_friends() {
        let raw: RawRecord =
            serde_json::from_value(json!({"id": 3, "name": "Lynx", "friends": ["A", "B"]}))
                .unwrap();
        assert_eq!(
            raw.friends,
            Some(FriendsField::List(vec!["A".to_string(), "B".to_string()]))
        );
    }

    #[test]
    fn test_raw_record_tolerates_missing_fields() {
        let raw: RawRecord = serde_json::from_value(json!({"name": "Nameless id"})).unwrap();
        assert!(raw.id.is_none());
        assert!(raw.friends.is_none());
        assert!(raw.born_at.is_none());
    }

    #[test]
    fn test_raw_record_rejects_wrong_friends_type() {
        let result =
            serde_json::from_value::<RawRecord>(json!({"id": 1, "name": "X", "friends": 12}));
        assert!(result.is_err());
    }

    #[test]
    fn test_canonical_record_serializes_null_born_at() {
        let record = CanonicalRecord::builder()
            .id(5)
            .name("Ibis")
            .extra("habitat", json!("wetland"))
            .build()
            .unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(5));
        assert_eq!(value["friends"], json!([]));
        assert_eq!(value["born_at"], Value::Null);
        assert_eq!(value["habitat"], json!("wetland"));
    }

    #[test]
    fn test_canonical_builder_requires_name() {
        let result = CanonicalRecord::builder().id(1).build();
        assert_eq!(result.unwrap_err(), "name is required");
    }
}
