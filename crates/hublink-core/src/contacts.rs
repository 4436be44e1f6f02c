//! Contact records as stored by the backend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single CRM contact. Produced by the backend, immutable on this side,
/// re-fetched wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Any additional properties the backend attaches.
    #[serde(flatten)]
    pub properties: HashMap<String, Value>,
}

impl ContactRecord {
    /// Display name assembled from whichever name parts are present.
    pub fn full_name(&self) -> String {
        match (self.firstname.as_deref(), self.lastname.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(first: Option<&str>, last: Option<&str>) -> ContactRecord {
        ContactRecord {
            id: "1".to_string(),
            firstname: first.map(String::from),
            lastname: last.map(String::from),
            email: None,
            properties: HashMap::new(),
        }
    }

    #[test]
    fn test_full_name_joins_both_parts() {
        assert_eq!(contact(Some("A"), Some("B")).full_name(), "A B");
    }

    #[test]
    fn test_full_name_single_part() {
        assert_eq!(contact(Some("A"), None).full_name(), "A");
        assert_eq!(contact(None, Some("B")).full_name(), "B");
    }

    #[test]
    fn test_full_name_empty_when_unnamed() {
        assert_eq!(contact(None, None).full_name(), "");
    }

    #[test]
    fn test_extra_properties_land_in_the_bag() {
        let json = r#"{"id":"42","firstname":"Ada","email":"ada@example.com","company":"Analytical Engines"}"#;
        let record: ContactRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.full_name(), "Ada");
        assert_eq!(
            record.properties.get("company").and_then(Value::as_str),
            Some("Analytical Engines")
        );
    }
}
