use minijinja::{Environment, context};
use thiserror::Error;

use tydef_core::ir::DeclarationTree;
use tydef_core::{GeneratedFile, Printer};

use crate::render::render_tree;

/// Printer configuration.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptConfig {
    /// Output file name; defaults to `<tree name>.d.ts`, lower-cased.
    pub file_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum TypeScriptError {
    #[error("template render failed: {0}")]
    Template(#[from] minijinja::Error),
}

/// Serializes a declaration tree into a single `.d.ts` file.
pub struct TypeScriptPrinter;

impl Printer for TypeScriptPrinter {
    type Config = TypeScriptConfig;
    type Error = TypeScriptError;

    fn print(
        &self,
        tree: &DeclarationTree,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error> {
        let mut env = Environment::new();
        env.add_template(
            "declarations.d.ts.j2",
            include_str!("../templates/declarations.d.ts.j2"),
        )?;
        let template = env.get_template("declarations.d.ts.j2")?;

        let body = render_tree(tree);
        let content = template.render(context! {
            title => tree.name.clone(),
            body => body.trim_end(),
        })?;

        let path = config
            .file_name
            .clone()
            .unwrap_or_else(|| format!("{}.d.ts", tree.name.to_lowercase()));
        log::debug!("printing {} declaration(s) to {}", tree.declaration_count(), path);

        Ok(vec![GeneratedFile {
            path,
            content: format!("{content}\n"),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tydef_core::ir::{Declaration, FieldDef, NamespaceNode, TypeExpr};

    fn tree() -> DeclarationTree {
        DeclarationTree {
            name: "Demo".to_string(),
            root: NamespaceNode {
                name: String::new(),
                declarations: vec![Declaration {
                    name: "Id".to_string(),
                    ambient: true,
                    ty: TypeExpr::NonNull(Box::new(TypeExpr::Number)),
                }],
                children: vec![NamespaceNode {
                    name: "Definitions".to_string(),
                    declarations: vec![Declaration {
                        name: "Pet".to_string(),
                        ambient: false,
                        ty: TypeExpr::Object(tydef_core::ir::ObjectType {
                            fields: vec![FieldDef {
                                name: "name".to_string(),
                                required: true,
                                read_only: false,
                                ty: TypeExpr::String,
                            }],
                            index: None,
                        }),
                    }],
                    children: vec![],
                }],
            },
        }
    }

    #[test]
    fn prints_one_file_with_default_name() {
        let files = TypeScriptPrinter
            .print(&tree(), &TypeScriptConfig::default())
            .expect("printing succeeds");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "demo.d.ts");
        assert!(files[0].content.ends_with("}\n"));
        insta::assert_snapshot!(files[0].content.trim_end(), @r###"
        // Generated by tydef for Demo. DO NOT EDIT.

        declare type Id = number;
        declare namespace Definitions {
          export interface Pet {
            name: string;
          }
        }
        "###);
    }

    #[test]
    fn explicit_file_name_wins() {
        let config = TypeScriptConfig {
            file_name: Some("types.d.ts".to_string()),
        };
        let files = TypeScriptPrinter.print(&tree(), &config).unwrap();
        assert_eq!(files[0].path, "types.d.ts");
    }
}
