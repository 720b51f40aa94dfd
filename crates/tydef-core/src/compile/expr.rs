use indexmap::IndexSet;
use serde_json::Value;

use crate::error::CompileError;
use crate::ir::{FieldDef, IndexSignature, LiteralValue, ObjectType, TypeExpr};
use crate::schema::{
    AdditionalProperties, Combinator, Items, RefPath, Schema, SchemaNode, SchemaShape, TypeSet,
};

use super::ident::{IdentifierFn, qualify};

/// Recognized primitive type tags, after folding `integer` into `number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeTag {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Any,
}

/// Translates one schema node into one or more type expressions.
///
/// Reference discovery is an explicit accumulator: every `$ref` met while
/// building is appended to `discovered`, which the resolution engine owns
/// and drains. The builder never recurses into a referenced schema.
pub struct ExprBuilder<'a> {
    identifier: IdentifierFn,
    discovered: &'a mut IndexSet<RefPath>,
}

impl<'a> ExprBuilder<'a> {
    pub fn new(identifier: IdentifierFn, discovered: &'a mut IndexSet<RefPath>) -> Self {
        Self {
            identifier,
            discovered,
        }
    }

    /// Build the expressions for one node. A node may legitimately resolve
    /// to more than one alternative; callers collapse with
    /// [`collapse_union`] when they need a single expression.
    pub fn build(&mut self, node: &SchemaNode) -> Result<Vec<TypeExpr>, CompileError> {
        match node.shape() {
            SchemaShape::Anything => Ok(vec![TypeExpr::Any]),
            SchemaShape::Nothing => Ok(vec![TypeExpr::Never]),
            SchemaShape::Reference(raw) => {
                let path = RefPath::parse(raw);
                let name = qualify(&path, self.identifier);
                self.discovered.insert(path);
                Ok(vec![TypeExpr::Reference(name)])
            }
            SchemaShape::Const(value) => Ok(vec![const_literal(value)?]),
            SchemaShape::Enum(values) => enum_literals(values),
            SchemaShape::Typed(types, schema) => self.build_typed(types, schema),
            SchemaShape::Combinator(combinator, branches) => {
                self.build_combinator(combinator, branches)
            }
            SchemaShape::Unknown(schema) => Err(CompileError::UnsupportedSchema(fragment(schema))),
        }
    }

    /// Build and collapse to a single expression.
    pub fn build_one(&mut self, node: &SchemaNode) -> Result<TypeExpr, CompileError> {
        Ok(collapse_union(self.build(node)?))
    }

    /// One expression per non-null type tag. With `null` among the tags
    /// the raw (nullable) expressions pass through; without it each is
    /// wrapped as guaranteed non-null.
    fn build_typed(
        &mut self,
        types: &TypeSet,
        schema: &Schema,
    ) -> Result<Vec<TypeExpr>, CompileError> {
        let tags = types.tags();
        let nullable = tags.iter().any(|t| *t == "null");
        let rest: Vec<TypeTag> = tags
            .iter()
            .filter(|t| **t != "null")
            .map(|t| parse_tag(t))
            .collect::<Result<_, _>>()?;

        if rest.is_empty() {
            return Ok(vec![TypeExpr::Null]);
        }

        let mut out = Vec::with_capacity(rest.len());
        for tag in rest {
            let expr = self.build_tag(tag, schema)?;
            // Never is already uninhabited; wrapping it would be noise.
            out.push(if nullable || expr == TypeExpr::Never {
                expr
            } else {
                TypeExpr::NonNull(Box::new(expr))
            });
        }
        Ok(out)
    }

    fn build_tag(&mut self, tag: TypeTag, schema: &Schema) -> Result<TypeExpr, CompileError> {
        match tag {
            TypeTag::String => Ok(TypeExpr::String),
            TypeTag::Number => Ok(TypeExpr::Number),
            TypeTag::Boolean => Ok(TypeExpr::Boolean),
            TypeTag::Any => Ok(TypeExpr::Any),
            TypeTag::Object => self.build_object(schema),
            TypeTag::Array => self.build_array(schema),
        }
    }

    fn build_object(&mut self, schema: &Schema) -> Result<TypeExpr, CompileError> {
        let mut fields = Vec::with_capacity(schema.properties.len());
        for (name, prop) in &schema.properties {
            fields.push(FieldDef {
                name: name.clone(),
                required: schema.required.iter().any(|r| r == name),
                read_only: prop.read_only(),
                ty: self.build_one(prop)?,
            });
        }

        // Pattern properties and the additionalProperties flag merge into
        // one index signature; the target type system permits only one
        // string-keyed index per object. Every contributing value type
        // survives as a union member, and the flags are the AND across
        // all contributors.
        let mut contributions: Vec<(TypeExpr, bool, bool)> = Vec::new();
        for (pattern, prop) in &schema.pattern_properties {
            contributions.push((
                self.build_one(prop)?,
                schema.required.iter().any(|r| r == pattern),
                prop.read_only(),
            ));
        }
        match &schema.additional_properties {
            Some(AdditionalProperties::Bool(true)) => {
                contributions.push((TypeExpr::Any, false, false));
            }
            Some(AdditionalProperties::Schema(node)) => {
                contributions.push((self.build_one(node)?, false, node.read_only()));
            }
            Some(AdditionalProperties::Bool(false)) | None => {}
        }

        let index = if contributions.is_empty() {
            None
        } else {
            let required = contributions.iter().all(|(_, required, _)| *required);
            let read_only = contributions.iter().all(|(_, _, read_only)| *read_only);
            let value =
                collapse_union(contributions.into_iter().map(|(value, _, _)| value).collect());
            Some(Box::new(IndexSignature {
                required,
                read_only,
                value,
            }))
        };

        Ok(TypeExpr::Object(ObjectType { fields, index }))
    }

    fn build_array(&mut self, schema: &Schema) -> Result<TypeExpr, CompileError> {
        if let (Some(min), Some(max)) = (schema.min_items, schema.max_items) {
            // An unsatisfiable length constraint admits no value at all.
            if min > max {
                return Ok(TypeExpr::Never);
            }
        }
        let element = match &schema.items {
            None => TypeExpr::Any,
            Some(Items::One(node)) => self.build_one(node)?,
            Some(Items::Many(nodes)) => {
                let mut parts = Vec::with_capacity(nodes.len());
                for node in nodes {
                    parts.push(self.build_one(node)?);
                }
                collapse_union(parts)
            }
        };
        Ok(TypeExpr::Array(Box::new(element)))
    }

    fn build_combinator(
        &mut self,
        combinator: Combinator,
        branches: &[SchemaNode],
    ) -> Result<Vec<TypeExpr>, CompileError> {
        let mut parts = Vec::with_capacity(branches.len());
        for branch in branches {
            parts.push(self.build_one(branch)?);
        }
        // "Exactly one" and "any of" are both approximated as a union;
        // the distinction is not expressible in the target type system.
        let combined = match combinator {
            Combinator::OneOf | Combinator::AnyOf => collapse_union(parts),
            Combinator::AllOf => collapse_intersection(parts),
        };
        Ok(vec![combined])
    }
}

/// Collapse alternatives into a single expression without introducing a
/// spurious wrapper around one member.
pub fn collapse_union(mut exprs: Vec<TypeExpr>) -> TypeExpr {
    match exprs.len() {
        0 => TypeExpr::Never,
        1 => exprs.remove(0),
        _ => TypeExpr::Union(exprs),
    }
}

fn collapse_intersection(mut exprs: Vec<TypeExpr>) -> TypeExpr {
    match exprs.len() {
        0 => TypeExpr::Any,
        1 => exprs.remove(0),
        _ => TypeExpr::Intersection(exprs),
    }
}

/// The literal type of a `const` value.
fn const_literal(value: &Value) -> Result<TypeExpr, CompileError> {
    match value {
        Value::Null => Ok(TypeExpr::Null),
        Value::Bool(b) => Ok(TypeExpr::Literal(LiteralValue::Boolean(*b))),
        Value::Number(n) => Ok(TypeExpr::Literal(LiteralValue::Number(
            n.as_f64().unwrap_or_default(),
        ))),
        Value::String(s) => Ok(TypeExpr::Literal(LiteralValue::String(s.clone()))),
        other => Err(CompileError::UnsupportedSchema(other.clone())),
    }
}

/// One literal per non-null enum member. Null members contribute to
/// nullability elsewhere and never produce a literal-null type.
fn enum_literals(values: &[Value]) -> Result<Vec<TypeExpr>, CompileError> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Null => {}
            Value::Bool(b) => out.push(TypeExpr::Literal(LiteralValue::Boolean(*b))),
            Value::Number(n) => out.push(TypeExpr::Literal(LiteralValue::Number(
                n.as_f64().unwrap_or_default(),
            ))),
            Value::String(s) => out.push(TypeExpr::Literal(LiteralValue::String(s.clone()))),
            other => return Err(CompileError::UnsupportedEnum(other.clone())),
        }
    }
    Ok(out)
}

fn parse_tag(tag: &str) -> Result<TypeTag, CompileError> {
    match tag {
        "string" => Ok(TypeTag::String),
        "integer" | "number" => Ok(TypeTag::Number),
        "boolean" => Ok(TypeTag::Boolean),
        "object" => Ok(TypeTag::Object),
        "array" => Ok(TypeTag::Array),
        "any" => Ok(TypeTag::Any),
        other => Err(CompileError::UnsupportedType(other.to_string())),
    }
}

fn fragment(schema: &Schema) -> Value {
    serde_json::to_value(schema).unwrap_or(Value::Null)
}
