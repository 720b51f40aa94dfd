use crate::ir::{Declaration, NamespaceNode};
use crate::schema::RefPath;

use super::ident::IdentifierFn;

/// Fold a flat `(path, declaration)` list into a namespace tree. A path of
/// length n contributes n-1 namespace levels and one declaration at the
/// deepest level; paths sharing a prefix share the corresponding nodes.
pub fn assemble(
    pairs: Vec<(RefPath, Declaration)>,
    identifier: IdentifierFn,
) -> NamespaceNode {
    let mut root = NamespaceNode::new(String::new());
    for (path, declaration) in pairs {
        let segments = path.segments();
        let parents = &segments[..segments.len().saturating_sub(1)];
        let mut node = &mut root;
        for segment in parents {
            node = node.child_mut(identifier(segment));
        }
        node.declarations.push(declaration);
    }
    root
}
