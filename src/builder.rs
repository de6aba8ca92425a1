//! Incremental per-class schema construction.
//!
//! A [`SchemaBuilder`] owns the descriptor of exactly one class. Field and
//! class contributions may arrive in any order; each one initializes the
//! descriptor first and then writes only its own keys.

use tracing::{debug, trace};

use crate::field::FieldArgument;
use crate::options::ContributorOptions;
use crate::schema::{ObjectSchema, Properties};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaBuilder {
    schema: Option<ObjectSchema>,
    options: ContributorOptions,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ContributorOptions) -> Self {
        Self {
            schema: None,
            options,
        }
    }

    /// Starts from a descriptor the class author wrote by hand.
    pub fn seeded(schema: ObjectSchema) -> Self {
        Self {
            schema: Some(schema),
            options: ContributorOptions::default(),
        }
    }

    /// Starts a descriptor with its model name already applied.
    pub fn named(name: impl Into<String>) -> Self {
        let mut builder = Self::new();
        builder.apply_model(name, false);
        builder
    }

    pub fn options(&self) -> &ContributorOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ContributorOptions) {
        self.options = options;
    }

    /// Merges hand-written descriptor keys. Keys set in `seed` overwrite the
    /// current ones; seeded properties only fill fields nothing contributed yet.
    pub fn seed(&mut self, seed: ObjectSchema) {
        let schema = self.schema.get_or_insert_with(ObjectSchema::default);
        if seed.name.is_some() {
            schema.name = seed.name;
        }
        if seed.primary_key.is_some() {
            schema.primary_key = seed.primary_key;
        }
        if seed.embedded.is_some() {
            schema.embedded = seed.embedded;
        }
        if seed.asymmetric.is_some() {
            schema.asymmetric = seed.asymmetric;
        }
        if let Some(seeded) = seed.properties {
            let properties = schema.properties.get_or_insert_with(Properties::new);
            for (field, value) in seeded {
                properties.entry(field).or_insert(value);
            }
        }
    }

    /// Current descriptor, `None` until something was contributed or seeded.
    pub fn schema(&self) -> Option<&ObjectSchema> {
        self.schema.as_ref()
    }

    /// Guarantees a descriptor with a `properties` map, keeping every key
    /// already present.
    pub fn initialize(&mut self) -> &mut ObjectSchema {
        let schema = self.schema.get_or_insert_with(|| {
            trace!("creating schema descriptor");
            ObjectSchema::default()
        });
        if schema.properties.is_none() {
            trace!("adding empty properties map");
            schema.properties = Some(Properties::new());
        }
        schema
    }

    /// Field-level contribution.
    pub fn add_property(&mut self, field: impl Into<String>, arg: impl Into<FieldArgument>) {
        let field = field.into();
        let normalized = arg.into().normalize(&self.options);
        debug!(
            field = %field,
            tag = normalized.value.type_tag(),
            primary_key = normalized.primary_key,
            "adding property"
        );

        let schema = self.initialize();
        if normalized.primary_key {
            if let Some(previous) = schema.primary_key.as_deref().filter(|p| *p != field) {
                // Last write wins; the earlier field stays in `properties`.
                debug!(previous, field = %field, "overwriting primary key");
            }
            schema.primary_key = Some(field.clone());
        }
        schema
            .properties
            .get_or_insert_with(Properties::new)
            .insert(field, normalized.value);
    }

    /// Class-level contribution. `embedded == false` leaves any earlier
    /// `embedded` value untouched.
    pub fn apply_model(&mut self, name: impl Into<String>, embedded: bool) {
        let name = name.into();
        debug!(name = %name, embedded, "applying model");

        let schema = self.initialize();
        schema.name = Some(name);
        if embedded {
            schema.embedded = Some(true);
        }
    }

    /// Chaining form of [`add_property`](Self::add_property).
    pub fn field(mut self, field: impl Into<String>, arg: impl Into<FieldArgument>) -> Self {
        self.add_property(field, arg);
        self
    }

    /// Declares `field` as primary key without touching its property value.
    pub fn primary_key(mut self, field: impl Into<String>) -> Self {
        self.initialize().primary_key = Some(field.into());
        self
    }

    pub fn embedded(mut self) -> Self {
        self.initialize().embedded = Some(true);
        self
    }

    pub fn build(mut self) -> ObjectSchema {
        self.initialize();
        self.schema.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{LinkedConfig, PropertyConfig};
    use crate::schema::PropertyValue;
    use serde_json::{Value, json};

    fn to_json(builder: &SchemaBuilder) -> Value {
        serde_json::to_value(builder.schema().unwrap()).unwrap()
    }

    #[test]
    fn test_initialize_creates_descriptor() {
        let mut builder = SchemaBuilder::new();
        assert!(builder.schema().is_none());
        builder.initialize();
        assert_eq!(to_json(&builder), json!({ "properties": {} }));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut once = SchemaBuilder::new();
        once.initialize();
        let mut twice = SchemaBuilder::new();
        twice.initialize();
        twice.initialize();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_initialize_keeps_seeded_keys() {
        let mut builder = SchemaBuilder::seeded(ObjectSchema {
            primary_key: Some("x".into()),
            ..ObjectSchema::default()
        });
        builder.initialize();
        assert_eq!(to_json(&builder), json!({ "primaryKey": "x", "properties": {} }));
    }

    #[test]
    fn test_seed_after_contribution_keeps_properties() {
        let mut builder = SchemaBuilder::new();
        builder.add_property("id", "int");
        builder.apply_model("Item", false);
        builder.seed(ObjectSchema {
            primary_key: Some("id".into()),
            ..ObjectSchema::default()
        });
        assert_eq!(
            to_json(&builder),
            json!({ "name": "Item", "primaryKey": "id", "properties": { "id": "int" } })
        );
    }

    #[test]
    fn test_seed_properties_only_extend() {
        let mut properties = Properties::new();
        properties.insert("id".into(), "string".into());
        properties.insert("note".into(), "string?".into());

        let mut builder = SchemaBuilder::new();
        builder.add_property("id", "int");
        builder.seed(ObjectSchema {
            properties: Some(properties),
            ..ObjectSchema::default()
        });
        assert_eq!(
            to_json(&builder),
            json!({ "properties": { "id": "int", "note": "string?" } })
        );
    }

    #[test]
    fn test_initialize_keeps_existing_properties() {
        let mut builder = SchemaBuilder::new();
        builder.add_property("a", "int");
        builder.initialize();
        assert_eq!(to_json(&builder), json!({ "properties": { "a": "int" } }));
    }

    #[test]
    fn test_tag_property() {
        let mut builder = SchemaBuilder::new();
        builder.add_property("test", "int");
        assert_eq!(to_json(&builder), json!({ "properties": { "test": "int" } }));
    }

    #[test]
    fn test_config_property_is_copied() {
        let mut builder = SchemaBuilder::new();
        builder.add_property(
            "test",
            PropertyConfig {
                optional: Some(true),
                ..PropertyConfig::new("int")
            },
        );
        assert_eq!(
            to_json(&builder),
            json!({ "properties": { "test": { "type": "int", "optional": true } } })
        );
        assert!(builder.schema().unwrap().primary_key.is_none());
    }

    #[test]
    fn test_primary_key_property() {
        let mut builder = SchemaBuilder::new();
        builder.add_property(
            "test",
            PropertyConfig {
                optional: Some(true),
                ..PropertyConfig::primary("int")
            },
        );
        let schema = builder.schema().unwrap();
        assert_eq!(schema.primary_key.as_deref(), Some("test"));
        assert_eq!(schema.property("test"), Some(&PropertyValue::from("int")));
    }

    #[test]
    fn test_second_primary_key_wins() {
        let mut builder = SchemaBuilder::new();
        builder.add_property("a", PropertyConfig::primary("int"));
        builder.add_property("b", PropertyConfig::primary("string"));
        assert_eq!(
            to_json(&builder),
            json!({ "primaryKey": "b", "properties": { "a": "int", "b": "string" } })
        );
    }

    #[test]
    fn test_property_overwrites_same_field() {
        let mut builder = SchemaBuilder::new();
        builder.add_property("a", "int");
        builder.add_property("a", "string?");
        assert_eq!(to_json(&builder), json!({ "properties": { "a": "string?" } }));
    }

    #[test]
    fn test_model_name() {
        let mut builder = SchemaBuilder::new();
        builder.apply_model("Name of Model", false);
        assert_eq!(to_json(&builder), json!({ "name": "Name of Model", "properties": {} }));
    }

    #[test]
    fn test_model_adds_to_existing_schema() {
        let mut builder = SchemaBuilder::seeded(ObjectSchema {
            primary_key: Some("test".into()),
            ..ObjectSchema::default()
        });
        builder.apply_model("Name of Model", false);
        assert_eq!(
            to_json(&builder),
            json!({ "name": "Name of Model", "primaryKey": "test", "properties": {} })
        );
    }

    #[test]
    fn test_model_embedded() {
        let mut builder = SchemaBuilder::new();
        builder.apply_model("Address", true);
        builder.apply_model("Address", false);
        assert_eq!(
            to_json(&builder),
            json!({ "name": "Address", "embedded": true, "properties": {} })
        );
    }

    #[test]
    fn test_model_last_name_wins() {
        let mut builder = SchemaBuilder::new();
        builder.apply_model("First", false);
        builder.apply_model("Second", false);
        assert_eq!(builder.schema().unwrap().name.as_deref(), Some("Second"));
    }

    #[test]
    fn test_model_is_idempotent() {
        let mut once = SchemaBuilder::new();
        once.apply_model("Dog", true);
        let mut twice = once.clone();
        twice.apply_model("Dog", true);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_model_order_independent() {
        let fields = |builder: &mut SchemaBuilder| {
            builder.add_property("id", PropertyConfig::primary("int"));
            builder.add_property("owner", LinkedConfig::new("Person"));
        };

        let mut model_first = SchemaBuilder::new();
        model_first.apply_model("Dog", true);
        fields(&mut model_first);

        let mut model_last = SchemaBuilder::new();
        fields(&mut model_last);
        model_last.apply_model("Dog", true);

        assert_eq!(model_first, model_last);
    }

    #[test]
    fn test_linked_property_uses_builder_options() {
        let linked = LinkedConfig {
            default: Some(json!("")),
            ..LinkedConfig::new("Other")
        };

        let mut present = SchemaBuilder::new();
        present.add_property("o", linked.clone());
        assert_eq!(
            to_json(&present),
            json!({ "properties": { "o": { "type": "Other", "default": "" } } })
        );

        let mut truthy = SchemaBuilder::with_options(ContributorOptions::truthy());
        truthy.add_property("o", linked);
        assert_eq!(to_json(&truthy), json!({ "properties": { "o": { "type": "Other" } } }));
    }

    #[test]
    fn test_chaining_api() {
        let schema = SchemaBuilder::named("TestItem")
            .field("id", "int")
            .field("otherItem", LinkedConfig::new("OtherItem"))
            .primary_key("id")
            .build();
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "name": "TestItem",
                "primaryKey": "id",
                "properties": { "id": "int", "otherItem": { "type": "OtherItem" } }
            })
        );
    }

    #[test]
    fn test_build_empty() {
        let schema = SchemaBuilder::new().embedded().build();
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({ "embedded": true, "properties": {} })
        );
    }
}
