//! Replays parsed declarations through the field and class contributors.

use tracing::debug;

use crate::ast::{Class, Declarations, Seed};
use crate::options::ContributorOptions;
use crate::registry::SchemaRegistry;
use crate::schema::ObjectSchema;

/// Per class: seeds first, then fields in declaration order, then the model.
///
/// Seeds stand for keys the author wrote on the class before any annotation
/// ran, so they apply first wherever they appear in the block; a later
/// `primaryKey: true` field overrides `@schema.primaryKey`.
pub fn compile(decls: &Declarations, options: ContributorOptions) -> SchemaRegistry {
    let mut registry = SchemaRegistry::with_options(options);
    for class in &decls.classes {
        compile_class(&mut registry, class);
    }
    registry
}

fn compile_class(registry: &mut SchemaRegistry, class: &Class) {
    debug!(class = %class.ident, members = class.members.len(), "compiling class");

    let mut seeds = class.seeds().peekable();
    if seeds.peek().is_some() {
        let mut declared = ObjectSchema::default();
        for seed in seeds {
            match seed {
                Seed::Name(name) => declared.name = Some(name.clone()),
                Seed::PrimaryKey(field) => declared.primary_key = Some(field.clone()),
                Seed::Embedded(flag) => declared.embedded = Some(*flag),
                Seed::Asymmetric(flag) => declared.asymmetric = Some(*flag),
            }
        }
        registry.declare(&class.ident, declared);
    }

    let builder = registry.builder(&class.ident);
    for field in class.fields() {
        builder.add_property(&field.name, field.argument.clone());
    }

    if let Some(model) = &class.model {
        builder.apply_model(&model.name, model.embedded);
    }
}
