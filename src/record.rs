use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{AlgoliaError, Result};

const OBJECT_ID: &str = "objectID";

/// A record with an explicit object identifier.
///
/// Serializes as its fields plus `objectID`.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    object_id: String,
    fields: Map<String, Value>,
}

impl Record {
    /// Creates a record; an empty identifier is rejected.
    pub fn new(object_id: impl Into<String>, fields: Map<String, Value>) -> Result<Self> {
        let object_id = object_id.into();
        if object_id.trim().is_empty() {
            return Err(AlgoliaError::Validation(
                "object id cannot be empty".to_owned(),
            ));
        }
        let mut fields = fields;
        fields.remove(OBJECT_ID);
        Ok(Self { object_id, fields })
    }

    /// Builds a record from a JSON object carrying `objectID`.
    pub fn from_json(value: Value) -> Result<Self> {
        Self::from_json_with_id_attribute(value, OBJECT_ID)
    }

    /// Builds a record from a JSON object, reading the identifier from
    /// `id_attribute`.
    ///
    /// Numeric identifiers are converted to strings.
    pub fn from_json_with_id_attribute(value: Value, id_attribute: &str) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(AlgoliaError::Validation(
                "record must be a JSON object".to_owned(),
            ));
        };
        let object_id = match fields.get(id_attribute) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(AlgoliaError::Validation(format!(
                    "record is missing a string or numeric '{id_attribute}'"
                )))
            }
        };
        Self::new(object_id, fields)
    }

    /// Serializes any value into a record identified by `objectID`.
    pub fn from_serialize<S: Serialize + ?Sized>(value: &S) -> Result<Self> {
        let value =
            serde_json::to_value(value).map_err(|err| AlgoliaError::Encode(err.to_string()))?;
        Self::from_json(value)
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Record body including `objectID`.
    pub fn to_json(&self) -> Value {
        let mut body = self.fields.clone();
        body.insert(OBJECT_ID.to_owned(), Value::String(self.object_id.clone()));
        Value::Object(body)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::Record;
    use crate::AlgoliaError;

    #[test]
    fn from_json_reads_object_id() {
        let record = Record::from_json(json!({"objectID": "42", "title": "Kit"})).expect("valid");
        assert_eq!(record.object_id(), "42");
        assert!(!record.fields().contains_key("objectID"));
        assert_eq!(record.to_json()["objectID"], "42");
    }

    #[test]
    fn custom_id_attribute_keeps_source_field() {
        let source = json!({"sku": 1001, "title": "Kit"});
        let record = Record::from_json_with_id_attribute(source, "sku").expect("valid");
        assert_eq!(record.object_id(), "1001");
        assert_eq!(record.to_json()["sku"], 1001);
    }

    #[test]
    fn missing_or_empty_id_is_rejected() {
        assert!(matches!(
            Record::from_json(json!({"title": "Kit"})),
            Err(AlgoliaError::Validation(_))
        ));
        assert!(matches!(
            Record::new("", Map::new()),
            Err(AlgoliaError::Validation(_))
        ));
        assert!(matches!(
            Record::from_json(json!(["not", "an", "object"])),
            Err(AlgoliaError::Validation(_))
        ));
    }
}
