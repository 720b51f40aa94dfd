use serde::Serialize;

use super::types::TypeExpr;

/// One named, emittable type definition. Exported unless it is the single
/// document root, which is ambient instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub ambient: bool,
    pub ty: TypeExpr,
}

/// A namespace level: ordered child namespaces and the declarations
/// attached directly at this level. The first path to arrive at a segment
/// creates its node; later paths sharing the prefix reuse it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceNode {
    pub name: String,
    pub children: Vec<NamespaceNode>,
    pub declarations: Vec<Declaration>,
}

impl NamespaceNode {
    pub fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// The existing child with this name, or a freshly appended one.
    pub fn child_mut(&mut self, name: String) -> &mut NamespaceNode {
        if let Some(i) = self.children.iter().position(|c| c.name == name) {
            &mut self.children[i]
        } else {
            self.children.push(NamespaceNode::new(name));
            self.children.last_mut().unwrap()
        }
    }

    pub fn child(&self, name: &str) -> Option<&NamespaceNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Total declarations in this subtree.
    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
            + self
                .children
                .iter()
                .map(NamespaceNode::declaration_count)
                .sum::<usize>()
    }
}

/// The compiler's output: a named tree of namespaces and declarations,
/// handed whole to a printer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclarationTree {
    pub name: String,
    pub root: NamespaceNode,
}

impl DeclarationTree {
    pub fn declaration_count(&self) -> usize {
        self.root.declaration_count()
    }
}
