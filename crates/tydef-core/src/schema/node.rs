use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A schema node: either a boolean schema (`true` admits everything,
/// `false` admits nothing) or a schema object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Bool(bool),
    Schema(Box<Schema>),
}

impl SchemaNode {
    /// Classify this node into the shape the expression builder dispatches
    /// on. First match wins: boolean, `$ref`, `const`, `enum`, `type`,
    /// combinator; anything else is `Unknown`.
    pub fn shape(&self) -> SchemaShape<'_> {
        let schema = match self {
            SchemaNode::Bool(true) => return SchemaShape::Anything,
            SchemaNode::Bool(false) => return SchemaShape::Nothing,
            SchemaNode::Schema(schema) => schema,
        };
        if let Some(ref raw) = schema.ref_path {
            return SchemaShape::Reference(raw);
        }
        if let Some(ref value) = schema.const_value {
            return SchemaShape::Const(value);
        }
        if !schema.enum_values.is_empty() {
            return SchemaShape::Enum(&schema.enum_values);
        }
        if let Some(ref types) = schema.type_set {
            return SchemaShape::Typed(types, schema);
        }
        if let Some((combinator, branches)) = schema.combinator() {
            return SchemaShape::Combinator(combinator, branches);
        }
        SchemaShape::Unknown(schema)
    }

    /// Whether this node marks its value read-only.
    pub fn read_only(&self) -> bool {
        matches!(self, SchemaNode::Schema(s) if s.read_only == Some(true))
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            SchemaNode::Schema(s) => s.title.as_deref(),
            SchemaNode::Bool(_) => None,
        }
    }
}

/// The shape of a schema node, in dispatch order.
#[derive(Debug)]
pub enum SchemaShape<'a> {
    /// Boolean schema `true`: the universal type.
    Anything,
    /// Boolean schema `false`: the uninhabited type.
    Nothing,
    Reference(&'a str),
    Const(&'a serde_json::Value),
    Enum(&'a [serde_json::Value]),
    Typed(&'a TypeSet, &'a Schema),
    Combinator(Combinator, &'a [SchemaNode]),
    Unknown(&'a Schema),
}

/// Which combinator keyword a schema carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    OneOf,
    AnyOf,
    AllOf,
}

/// The `type` field: a single tag or a list of tags. Tags are kept as raw
/// strings so an unrecognized tag surfaces as a compile error rather than
/// a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeSet {
    pub fn tags(&self) -> Vec<&str> {
        match self {
            TypeSet::Single(tag) => vec![tag.as_str()],
            TypeSet::Multiple(tags) => tags.iter().map(String::as_str).collect(),
        }
    }
}

/// `items` can be a single schema or an ordered list of schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    One(Box<SchemaNode>),
    Many(Vec<SchemaNode>),
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaNode>),
}

/// A schema object covering the supported keyword subset. Unknown keywords
/// are ignored on input and never round-tripped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(
        rename = "const",
        default,
        deserialize_with = "some_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub const_value: Option<serde_json::Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_set: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Object shape
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,

    #[serde(
        rename = "patternProperties",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub pattern_properties: IndexMap<String, SchemaNode>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    // Array shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    // Composition
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaNode>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,
}

impl Schema {
    /// The single combinator this schema carries, if exactly one of
    /// `oneOf`/`anyOf`/`allOf` is present. Two or more at once is not a
    /// recognized shape.
    pub fn combinator(&self) -> Option<(Combinator, &[SchemaNode])> {
        let mut found: Option<(Combinator, &[SchemaNode])> = None;
        for (kind, branches) in [
            (Combinator::OneOf, &self.one_of),
            (Combinator::AnyOf, &self.any_of),
            (Combinator::AllOf, &self.all_of),
        ] {
            if !branches.is_empty() {
                if found.is_some() {
                    return None;
                }
                found = Some((kind, branches.as_slice()));
            }
        }
        found
    }
}

/// Deserialize helper that keeps an explicit JSON `null` as
/// `Some(Value::Null)` instead of collapsing it to `None`, so
/// `"const": null` is distinguishable from an absent `const`.
fn some_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}
