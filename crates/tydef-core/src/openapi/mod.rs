pub mod adapter;
pub mod document;

pub use adapter::{OpenApiOptions, compile_openapi};
pub use document::OpenApiDocument;
