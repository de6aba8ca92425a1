//! Schema descriptor data model, in the exact shape the database engine reads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field name to property value.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Per-class schema descriptor.
///
/// `properties` is only `None` for a descriptor seeded by hand before any
/// contribution ran; every contribution initializes it first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asymmetric: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl ObjectSchema {
    pub fn property(&self, field: &str) -> Option<&PropertyValue> {
        self.properties.as_ref().and_then(|props| props.get(field))
    }
}

/// One entry of a descriptor's `properties` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Bare type tag: `"int"`, `"string?"`, `"int[]"`, `"OtherModel"`.
    Shorthand(String),
    Full(PropertyDescriptor),
}

impl PropertyValue {
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Shorthand(tag) => tag,
            Self::Full(desc) => &desc.r#type,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(tag: &str) -> Self {
        Self::Shorthand(tag.to_string())
    }
}

impl From<PropertyDescriptor> for PropertyValue {
    fn from(desc: PropertyDescriptor) -> Self {
        Self::Full(desc)
    }
}

/// Full property record.
///
/// `primary_key` and `extra` only ever carry what a generic configuration
/// supplied; they are copied through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(
        default,
        deserialize_with = "crate::field::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PropertyDescriptor {
    pub fn new(r#type: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_keys_are_omitted() {
        let schema = ObjectSchema {
            name: Some("Dog".into()),
            properties: Some(Properties::new()),
            ..ObjectSchema::default()
        };
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({ "name": "Dog", "properties": {} })
        );
    }

    #[test]
    fn test_camel_case_keys() {
        let mut props = Properties::new();
        let mut desc = PropertyDescriptor::new("Person");
        desc.object_type = Some("Person".into());
        desc.map_to = Some("owner_ref".into());
        props.insert("owner".into(), desc.into());
        props.insert("id".into(), "int".into());

        let schema = ObjectSchema {
            primary_key: Some("id".into()),
            embedded: Some(true),
            properties: Some(props),
            ..ObjectSchema::default()
        };
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "primaryKey": "id",
                "embedded": true,
                "properties": {
                    "id": "int",
                    "owner": { "type": "Person", "objectType": "Person", "mapTo": "owner_ref" }
                }
            })
        );
    }

    #[test]
    fn test_explicit_null_default_is_written() {
        let mut desc = PropertyDescriptor::new("string?");
        desc.default = Some(Value::Null);
        assert_eq!(
            serde_json::to_value(PropertyValue::Full(desc)).unwrap(),
            json!({ "type": "string?", "default": null })
        );
    }

    #[test]
    fn test_type_tag() {
        assert_eq!(PropertyValue::from("int[]").type_tag(), "int[]");
        assert_eq!(
            PropertyValue::from(PropertyDescriptor::new("Other")).type_tag(),
            "Other"
        );
    }
}
