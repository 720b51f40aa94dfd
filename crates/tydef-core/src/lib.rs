pub mod compile;
pub mod config;
pub mod error;
pub mod ir;
pub mod openapi;
pub mod schema;

pub use compile::{CompileOptions, compile_schema, compile_schema_with_options};
pub use error::{CompileError, ParseError};
pub use openapi::{OpenApiOptions, compile_openapi};
pub use schema::{Document, RefPath, resolve_reference};

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for printers that serialize a declaration tree into concrete
/// target-language source files.
pub trait Printer {
    type Config;
    type Error: std::error::Error;
    fn print(
        &self,
        tree: &ir::DeclarationTree,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
