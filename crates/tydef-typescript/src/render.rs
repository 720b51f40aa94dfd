use tydef_core::ir::{
    Declaration, DeclarationTree, LiteralValue, NamespaceNode, ObjectType, TypeExpr,
};

/// Render a type expression as TypeScript source.
///
/// The non-null wrapper is erased: the emitted code targets strict
/// TypeScript, where types exclude `null` unless it is spelled out.
pub fn type_to_ts(expr: &TypeExpr) -> String {
    match expr {
        TypeExpr::Any => "unknown".to_string(),
        TypeExpr::Never => "never".to_string(),
        TypeExpr::String => "string".to_string(),
        TypeExpr::Number => "number".to_string(),
        TypeExpr::Boolean => "boolean".to_string(),
        TypeExpr::Null => "null".to_string(),
        TypeExpr::Literal(value) => literal_to_ts(value),
        TypeExpr::Array(inner) => {
            let inner_ts = type_to_ts(inner);
            if matches!(
                inner.as_ref(),
                TypeExpr::Union(_) | TypeExpr::Intersection(_)
            ) {
                format!("({inner_ts})[]")
            } else {
                format!("{inner_ts}[]")
            }
        }
        TypeExpr::Object(obj) => object_to_ts(obj),
        TypeExpr::Reference(name) => name.to_string(),
        TypeExpr::Union(variants) => variants
            .iter()
            .map(type_to_ts)
            .collect::<Vec<_>>()
            .join(" | "),
        TypeExpr::Intersection(parts) => parts
            .iter()
            .map(|part| {
                let ts = type_to_ts(part);
                if matches!(part, TypeExpr::Union(_)) {
                    format!("({ts})")
                } else {
                    ts
                }
            })
            .collect::<Vec<_>>()
            .join(" & "),
        TypeExpr::NonNull(inner) => type_to_ts(inner),
    }
}

fn literal_to_ts(value: &LiteralValue) -> String {
    match value {
        LiteralValue::String(s) => format!("\"{s}\""),
        LiteralValue::Number(n) => {
            if n.fract() == 0.0 && n.is_finite() {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        LiteralValue::Boolean(b) => b.to_string(),
    }
}

fn object_to_ts(obj: &ObjectType) -> String {
    let mut members: Vec<String> = obj.fields.iter().map(field_to_ts).collect();
    if let Some(index) = &obj.index {
        members.push(format!(
            "{}[key: string]: {}",
            if index.read_only { "readonly " } else { "" },
            type_to_ts(&index.value)
        ));
    }
    if members.is_empty() {
        return "{}".to_string();
    }
    format!("{{ {} }}", members.join("; "))
}

fn field_to_ts(field: &tydef_core::ir::FieldDef) -> String {
    format!(
        "{}{}{}: {}",
        if field.read_only { "readonly " } else { "" },
        member_name(&field.name),
        if field.required { "" } else { "?" },
        type_to_ts(&field.ty)
    )
}

/// Render the whole declaration tree, one line per alias, one block per
/// interface or namespace.
pub fn render_tree(tree: &DeclarationTree) -> String {
    let mut out = String::new();
    render_level(&tree.root, 0, &mut out);
    out
}

fn render_level(node: &NamespaceNode, depth: usize, out: &mut String) {
    for declaration in &node.declarations {
        render_declaration(declaration, depth, out);
    }
    for child in &node.children {
        render_namespace(child, depth, out);
    }
}

fn render_namespace(node: &NamespaceNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let keyword = if depth == 0 {
        "declare namespace"
    } else {
        "export namespace"
    };
    out.push_str(&format!("{indent}{keyword} {} {{\n", node.name));
    render_level(node, depth + 1, out);
    out.push_str(&format!("{indent}}}\n"));
}

fn render_declaration(declaration: &Declaration, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let keyword = if depth == 0 { "declare" } else { "export" };
    if let Some(obj) = declaration.ty.as_object() {
        out.push_str(&format!("{indent}{keyword} interface {} {{\n", declaration.name));
        for field in &obj.fields {
            out.push_str(&format!("{indent}  {};\n", field_to_ts(field)));
        }
        if let Some(index) = &obj.index {
            out.push_str(&format!(
                "{indent}  {}[key: string]: {};\n",
                if index.read_only { "readonly " } else { "" },
                type_to_ts(&index.value)
            ));
        }
        out.push_str(&format!("{indent}}}\n"));
    } else {
        out.push_str(&format!(
            "{indent}{keyword} type {} = {};\n",
            declaration.name,
            type_to_ts(&declaration.ty)
        ));
    }
}

/// Quote member names that are not valid identifiers.
fn member_name(name: &str) -> String {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };
    if valid {
        name.to_string()
    } else {
        format!("\"{name}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tydef_core::ir::{FieldDef, IndexSignature, QualifiedName};

    #[test]
    fn primitives() {
        assert_eq!(type_to_ts(&TypeExpr::String), "string");
        assert_eq!(type_to_ts(&TypeExpr::Number), "number");
        assert_eq!(type_to_ts(&TypeExpr::Boolean), "boolean");
        assert_eq!(type_to_ts(&TypeExpr::Null), "null");
        assert_eq!(type_to_ts(&TypeExpr::Any), "unknown");
        assert_eq!(type_to_ts(&TypeExpr::Never), "never");
    }

    #[test]
    fn literals() {
        assert_eq!(
            type_to_ts(&TypeExpr::Literal(LiteralValue::String("up".into()))),
            "\"up\""
        );
        assert_eq!(
            type_to_ts(&TypeExpr::Literal(LiteralValue::Number(200.0))),
            "200"
        );
        assert_eq!(
            type_to_ts(&TypeExpr::Literal(LiteralValue::Number(1.5))),
            "1.5"
        );
        assert_eq!(
            type_to_ts(&TypeExpr::Literal(LiteralValue::Boolean(true))),
            "true"
        );
    }

    #[test]
    fn union_elements_are_parenthesized_in_arrays() {
        let union = TypeExpr::Union(vec![TypeExpr::String, TypeExpr::Number]);
        assert_eq!(
            type_to_ts(&TypeExpr::Array(Box::new(union))),
            "(string | number)[]"
        );
        assert_eq!(
            type_to_ts(&TypeExpr::Array(Box::new(TypeExpr::String))),
            "string[]"
        );
    }

    #[test]
    fn non_null_wrapper_is_erased() {
        assert_eq!(
            type_to_ts(&TypeExpr::NonNull(Box::new(TypeExpr::Number))),
            "number"
        );
    }

    #[test]
    fn qualified_references_join_with_dots() {
        let name = QualifiedName(vec!["Components".into(), "Schemas".into(), "Pet".into()]);
        assert_eq!(type_to_ts(&TypeExpr::Reference(name)), "Components.Schemas.Pet");
    }

    #[test]
    fn inline_objects() {
        let obj = TypeExpr::Object(ObjectType {
            fields: vec![
                FieldDef {
                    name: "id".into(),
                    required: true,
                    read_only: false,
                    ty: TypeExpr::Number,
                },
                FieldDef {
                    name: "x-next".into(),
                    required: false,
                    read_only: true,
                    ty: TypeExpr::String,
                },
            ],
            index: Some(Box::new(IndexSignature {
                required: false,
                read_only: false,
                value: TypeExpr::Any,
            })),
        });
        assert_eq!(
            type_to_ts(&obj),
            "{ id: number; readonly \"x-next\"?: string; [key: string]: unknown }"
        );
    }

    #[test]
    fn intersection_parenthesizes_unions() {
        let expr = TypeExpr::Intersection(vec![
            TypeExpr::Union(vec![TypeExpr::String, TypeExpr::Number]),
            TypeExpr::Boolean,
        ]);
        assert_eq!(type_to_ts(&expr), "(string | number) & boolean");
    }
}
