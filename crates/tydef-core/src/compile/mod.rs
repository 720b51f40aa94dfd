pub mod expr;
pub mod ident;
pub mod namespace;
pub mod resolver;

use crate::error::{CompileError, ParseError};
use crate::ir::DeclarationTree;
use crate::schema::Document;

pub use expr::{ExprBuilder, collapse_union};
pub use ident::{IdentifierFn, member_identifier, type_identifier};
pub use namespace::assemble;
pub use resolver::Resolver;

/// Declaration name used when neither the caller nor the schema's `title`
/// supplies one.
pub const DEFAULT_ROOT_NAME: &str = "Schema";

/// Options shared by every compilation.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Maps a path segment to a type-identifier fragment.
    pub identifier: IdentifierFn,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            identifier: type_identifier,
        }
    }
}

/// Compile a standalone JSON-Schema-family document into a declaration
/// tree. `root_name` seeds the ambient top-level declaration's name,
/// falling back to the schema's own `title`, then to a constant.
pub fn compile_schema(
    document: &Document,
    root_name: Option<&str>,
) -> Result<DeclarationTree, CompileError> {
    compile_schema_with_options(document, root_name, &CompileOptions::default())
}

pub fn compile_schema_with_options(
    document: &Document,
    root_name: Option<&str>,
    options: &CompileOptions,
) -> Result<DeclarationTree, CompileError> {
    let root = document.root_schema().ok_or(ParseError::InvalidRoot)?;
    let name = root_name
        .map(str::to_string)
        .or_else(|| root.title().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string());
    let name = (options.identifier)(&name);

    let mut resolver = Resolver::new(document, options);
    resolver.compile_root(&root, &name)?;
    resolver.run()?;

    Ok(DeclarationTree {
        name: name.clone(),
        root: assemble(resolver.into_declarations(), options.identifier),
    })
}
