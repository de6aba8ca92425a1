//! Field annotation arguments and their normalization into property values.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::options::{ContributorOptions, KnobCopy};
use crate::schema::{PropertyDescriptor, PropertyValue};

/// Argument of a field-level contribution, one variant per accepted shape.
///
/// `Linked` and `Config` are the typed forms for Rust callers. Object literals
/// decoded by [`FieldArgument::from_value`] keep their knobs untyped in
/// `RawLinked` and `Raw` so mistyped or `null` knobs are copied as written.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldArgument {
    /// Bare type tag, including `T?`, `T[]` and linked-entity names.
    Tag(String),
    Linked(LinkedConfig),
    Config(PropertyConfig),
    RawLinked {
        linked_model: String,
        knobs: Map<String, Value>,
    },
    Raw {
        r#type: String,
        knobs: Map<String, Value>,
    },
}

/// Knobs a linked-entity configuration carries over.
const LINKED_KNOBS: [&str; 6] = [
    "objectType",
    "property",
    "optional",
    "default",
    "indexed",
    "mapTo",
];

#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("expected a type string or an object, found {0}")]
    NotAnArgument(Value),
    #[error("missing string `{0}`")]
    MissingTag(&'static str),
}

/// Reference to another schema by name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedConfig {
    pub linked_model: String,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub optional: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub default: Option<Value>,
    #[serde(default)]
    pub indexed: Option<bool>,
    #[serde(default)]
    pub map_to: Option<String>,
}

impl LinkedConfig {
    pub fn new(linked_model: impl Into<String>) -> Self {
        Self {
            linked_model: linked_model.into(),
            ..Self::default()
        }
    }
}

/// Generic property configuration. Keys it does not know are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyConfig {
    pub r#type: String,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub optional: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub default: Option<Value>,
    #[serde(default)]
    pub indexed: Option<bool>,
    #[serde(default)]
    pub map_to: Option<String>,
    #[serde(default)]
    pub primary_key: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PropertyConfig {
    pub fn new(r#type: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            ..Self::default()
        }
    }

    pub fn primary(r#type: impl Into<String>) -> Self {
        Self {
            primary_key: Some(true),
            ..Self::new(r#type)
        }
    }

    fn is_primary_key(&self) -> bool {
        self.primary_key == Some(true)
    }
}

impl From<PropertyConfig> for PropertyDescriptor {
    fn from(config: PropertyConfig) -> Self {
        Self {
            r#type: config.r#type,
            object_type: config.object_type,
            property: config.property,
            optional: config.optional,
            default: config.default,
            indexed: config.indexed,
            map_to: config.map_to,
            primary_key: config.primary_key,
            extra: config.extra,
        }
    }
}

impl From<&str> for FieldArgument {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

impl From<String> for FieldArgument {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

impl From<LinkedConfig> for FieldArgument {
    fn from(config: LinkedConfig) -> Self {
        Self::Linked(config)
    }
}

impl From<PropertyConfig> for FieldArgument {
    fn from(config: PropertyConfig) -> Self {
        Self::Config(config)
    }
}

/// Result of normalizing one field argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: PropertyValue,
    /// The field becomes the descriptor's primary key.
    pub primary_key: bool,
}

impl FieldArgument {
    /// Decodes a string or object literal. An object is a linked-entity
    /// configuration when it carries `linkedModel`, otherwise a generic one.
    pub fn from_value(value: Value) -> Result<Self, ArgumentError> {
        let mut knobs = match value {
            Value::String(tag) => return Ok(Self::Tag(tag)),
            Value::Object(map) => map,
            other => return Err(ArgumentError::NotAnArgument(other)),
        };

        if knobs.contains_key("linkedModel") {
            match knobs.remove("linkedModel") {
                Some(Value::String(linked_model)) => Ok(Self::RawLinked {
                    linked_model,
                    knobs,
                }),
                _ => Err(ArgumentError::MissingTag("linkedModel")),
            }
        } else {
            match knobs.remove("type") {
                Some(Value::String(r#type)) => Ok(Self::Raw { r#type, knobs }),
                _ => Err(ArgumentError::MissingTag("type")),
            }
        }
    }

    pub fn normalize(self, options: &ContributorOptions) -> Normalized {
        match self {
            Self::Tag(tag) => Normalized {
                value: PropertyValue::Shorthand(tag),
                primary_key: false,
            },
            Self::Linked(linked) => Normalized {
                value: PropertyValue::Full(normalize_linked(linked, options.knob_copy)),
                primary_key: false,
            },
            Self::Config(config) if config.is_primary_key() => Normalized {
                value: PropertyValue::Shorthand(config.r#type),
                primary_key: true,
            },
            Self::Config(config) => Normalized {
                value: PropertyValue::Full(config.into()),
                primary_key: false,
            },
            Self::RawLinked {
                linked_model,
                mut knobs,
            } => {
                knobs.retain(|key, value| {
                    LINKED_KNOBS.contains(&key.as_str())
                        && (options.knob_copy == KnobCopy::Present || is_truthy(value))
                });
                Normalized {
                    value: PropertyValue::Full(descriptor_from_knobs(linked_model, knobs)),
                    primary_key: false,
                }
            }
            Self::Raw { r#type, knobs } if knobs.get("primaryKey").is_some_and(is_truthy) => {
                Normalized {
                    value: PropertyValue::Shorthand(r#type),
                    primary_key: true,
                }
            }
            Self::Raw { r#type, knobs } => Normalized {
                value: PropertyValue::Full(descriptor_from_knobs(r#type, knobs)),
                primary_key: false,
            },
        }
    }
}

/// Moves well-typed knobs into their fields; anything else, `null` included,
/// stays in `extra` under its own key.
fn descriptor_from_knobs(r#type: String, mut knobs: Map<String, Value>) -> PropertyDescriptor {
    PropertyDescriptor {
        r#type,
        object_type: take_str(&mut knobs, "objectType"),
        property: take_str(&mut knobs, "property"),
        optional: take_bool(&mut knobs, "optional"),
        default: knobs.remove("default"),
        indexed: take_bool(&mut knobs, "indexed"),
        map_to: take_str(&mut knobs, "mapTo"),
        primary_key: take_bool(&mut knobs, "primaryKey"),
        extra: knobs,
    }
}

fn take_str(knobs: &mut Map<String, Value>, key: &str) -> Option<String> {
    match knobs.get(key) {
        Some(Value::String(_)) => knobs.remove(key).and_then(|v| v.as_str().map(str::to_string)),
        _ => None,
    }
}

fn take_bool(knobs: &mut Map<String, Value>, key: &str) -> Option<bool> {
    let flag = knobs.get(key)?.as_bool()?;
    knobs.remove(key);
    Some(flag)
}

fn normalize_linked(linked: LinkedConfig, copy: KnobCopy) -> PropertyDescriptor {
    PropertyDescriptor {
        r#type: linked.linked_model,
        object_type: keep_str(linked.object_type, copy),
        property: keep_str(linked.property, copy),
        optional: keep_bool(linked.optional, copy),
        default: linked.default.filter(|v| copy == KnobCopy::Present || is_truthy(v)),
        indexed: keep_bool(linked.indexed, copy),
        map_to: keep_str(linked.map_to, copy),
        ..PropertyDescriptor::default()
    }
}

fn keep_str(value: Option<String>, copy: KnobCopy) -> Option<String> {
    value.filter(|s| copy == KnobCopy::Present || !s.is_empty())
}

fn keep_bool(value: Option<bool>, copy: KnobCopy) -> Option<bool> {
    value.filter(|b| copy == KnobCopy::Present || *b)
}

/// Truthiness as the schema consumer's host language defines it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Keeps an explicit `null` as `Some(Value::Null)` instead of collapsing it
/// into an absent key.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
