use crate::parser::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Unknown class: {0}")]
    UnknownClass(String),
    #[error("Failed to render schema: {0}")]
    Render(#[from] serde_json::Error),
}
