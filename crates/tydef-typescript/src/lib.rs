pub mod generator;
pub mod render;

pub use generator::{TypeScriptConfig, TypeScriptError, TypeScriptPrinter};
pub use render::{render_tree, type_to_ts};
