pub mod document;
pub mod node;
pub mod path;

pub use document::{Document, resolve_reference};
pub use node::{AdditionalProperties, Combinator, Items, Schema, SchemaNode, SchemaShape, TypeSet};
pub use path::RefPath;
