pub mod decl;
pub mod types;

pub use decl::{Declaration, DeclarationTree, NamespaceNode};
pub use types::{FieldDef, IndexSignature, LiteralValue, ObjectType, QualifiedName, TypeExpr};
