use indexmap::IndexSet;

use crate::error::CompileError;
use crate::ir::Declaration;
use crate::schema::{Document, RefPath, SchemaNode};

use super::CompileOptions;
use super::expr::ExprBuilder;

/// The reference resolution engine: an explicit worklist fixpoint over a
/// monotonically growing discovered set.
///
/// Building a declaration may discover further paths at arbitrary depth,
/// so passes repeat until discovered-minus-resolved is empty. Termination
/// follows from the document being finite and paths deduplicating: a path
/// already resolved is never rebuilt, which is also what makes cyclic and
/// self-referential schemas safe. The second encounter of a cycle
/// resolves to a reference expression instead of recursing.
pub struct Resolver<'a> {
    document: &'a Document,
    options: &'a CompileOptions,
    discovered: IndexSet<RefPath>,
    resolved: IndexSet<RefPath>,
    declarations: Vec<(RefPath, Declaration)>,
}

impl<'a> Resolver<'a> {
    pub fn new(document: &'a Document, options: &'a CompileOptions) -> Self {
        Self {
            document,
            options,
            discovered: IndexSet::new(),
            resolved: IndexSet::new(),
            declarations: Vec::new(),
        }
    }

    /// Register a path as discovered without resolving it yet.
    pub fn discover(&mut self, path: RefPath) {
        self.discovered.insert(path);
    }

    /// Attach a ready-made declaration at a path, marking it resolved so
    /// the fixpoint never rebuilds it. Used by the OpenAPI adapter for its
    /// hand-assembled declarations.
    pub fn declare(&mut self, path: RefPath, declaration: Declaration) {
        self.resolved.insert(path.clone());
        self.declarations.push((path, declaration));
    }

    /// Compile the root schema into the single ambient declaration,
    /// seeding the discovered set with everything it references.
    pub fn compile_root(&mut self, node: &SchemaNode, name: &str) -> Result<(), CompileError> {
        let mut builder = ExprBuilder::new(self.options.identifier, &mut self.discovered);
        let ty = builder.build_one(node)?;
        let path = RefPath::from_segments(vec![name.to_string()]);
        self.declare(
            path,
            Declaration {
                name: name.to_string(),
                ambient: true,
                ty,
            },
        );
        Ok(())
    }

    /// Run passes until no new reference is discovered.
    pub fn run(&mut self) -> Result<(), CompileError> {
        loop {
            let pending: Vec<RefPath> = self
                .discovered
                .iter()
                .filter(|path| !self.resolved.contains(*path))
                .cloned()
                .collect();
            if pending.is_empty() {
                return Ok(());
            }
            log::debug!("resolution pass over {} pending reference(s)", pending.len());

            for path in pending {
                if !self.resolved.insert(path.clone()) {
                    continue;
                }
                let node = self
                    .document
                    .resolve(&path)
                    .ok_or_else(|| CompileError::RefTargetNotFound(path.clone()))?;
                let mut builder =
                    ExprBuilder::new(self.options.identifier, &mut self.discovered);
                let ty = builder.build_one(&node)?;
                let name = (self.options.identifier)(path.last().unwrap_or_default());
                self.declarations.push((
                    path,
                    Declaration {
                        name,
                        ambient: false,
                        ty,
                    },
                ));
            }
        }
    }

    /// The complete `(path, declaration)` list in first-discovery order.
    pub fn into_declarations(self) -> Vec<(RefPath, Declaration)> {
        self.declarations
    }
}
