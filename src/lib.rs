pub mod ast;
pub mod builder;
pub mod compile;
pub mod error;
pub mod field;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod registry;
pub mod schema;

use wasm_bindgen::prelude::*;

pub use builder::SchemaBuilder;
pub use error::Error;
pub use field::{FieldArgument, LinkedConfig, PropertyConfig};
pub use options::{ContributorOptions, KnobCopy};
pub use registry::{RealmModel, SchemaRegistry};
pub use schema::{ObjectSchema, PropertyDescriptor, PropertyValue};

use parser::Parser;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Parse model declarations and build one descriptor per class.
pub fn compile_models(source: &str, options: ContributorOptions) -> Result<SchemaRegistry, Error> {
    let mut parser = Parser::new(source)?;
    let decls = parser.parse()?;
    Ok(compile::compile(&decls, options))
}

/// Render descriptors as JSON: the full list, or one descriptor when `class`
/// is given.
pub fn render_json(
    registry: &SchemaRegistry,
    class: Option<&str>,
    pretty: bool,
) -> Result<String, Error> {
    let value = match class {
        Some(class) => {
            let schema = registry
                .schema(class)
                .ok_or_else(|| Error::UnknownClass(class.to_string()))?;
            serde_json::to_value(schema)?
        }
        None => {
            let schemas: Vec<&ObjectSchema> = registry.schemas().map(|(_, s)| s).collect();
            serde_json::to_value(schemas)?
        }
    };

    let json = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(json)
}

/// Compile model declarations to a JSON descriptor list
#[wasm_bindgen(js_name = "compileModels")]
pub fn compile_models_json(source: &str, truthy_knobs: Option<bool>) -> Result<String, String> {
    let options = if truthy_knobs.unwrap_or(false) {
        ContributorOptions::truthy()
    } else {
        ContributorOptions::default()
    };
    let registry = compile_models(source, options).map_err(|e| e.to_string())?;
    render_json(&registry, None, false).map_err(|e| e.to_string())
}
