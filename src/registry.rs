//! Per-class builders keyed by class identifier.

use std::collections::BTreeMap;

use crate::builder::SchemaBuilder;
use crate::field::FieldArgument;
use crate::options::ContributorOptions;
use crate::schema::ObjectSchema;

/// A Rust type that describes its own schema.
pub trait RealmModel {
    /// Identifier the registry files this type under.
    fn class() -> &'static str {
        std::any::type_name::<Self>()
    }

    fn describe(schema: &mut SchemaBuilder);

    fn schema() -> ObjectSchema {
        let mut builder = SchemaBuilder::new();
        Self::describe(&mut builder);
        builder.build()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    classes: BTreeMap<String, SchemaBuilder>,
    options: ContributorOptions,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ContributorOptions) -> Self {
        Self {
            classes: BTreeMap::new(),
            options,
        }
    }

    /// Builder owned by `class`, created on first use.
    pub fn builder(&mut self, class: &str) -> &mut SchemaBuilder {
        let options = self.options;
        self.classes
            .entry(class.to_string())
            .or_insert_with(|| SchemaBuilder::with_options(options))
    }

    /// Merges hand-written descriptor keys into `class`; the descriptor
    /// always ends up with a `properties` map.
    pub fn declare(&mut self, class: &str, schema: ObjectSchema) {
        let builder = self.builder(class);
        builder.seed(schema);
        builder.initialize();
    }

    pub fn add_property(&mut self, class: &str, field: &str, arg: impl Into<FieldArgument>) {
        self.builder(class).add_property(field, arg);
    }

    pub fn apply_model(&mut self, class: &str, name: &str, embedded: bool) {
        self.builder(class).apply_model(name, embedded);
    }

    pub fn register<T: RealmModel>(&mut self) {
        T::describe(self.builder(T::class()));
    }

    pub fn schema(&self, class: &str) -> Option<&ObjectSchema> {
        self.classes.get(class).and_then(SchemaBuilder::schema)
    }

    /// Every descriptor, ordered by class identifier.
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &ObjectSchema)> {
        self.classes
            .iter()
            .filter_map(|(class, builder)| builder.schema().map(|s| (class.as_str(), s)))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
