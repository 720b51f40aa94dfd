use serde_json::Value;

use super::node::SchemaNode;
use super::path::RefPath;
use crate::error::ParseError;

/// A loaded document, kept as a raw JSON value so reference paths can
/// address any subtree uniformly. The core treats a document as read-only;
/// the OpenAPI adapter clones one into a working overlay before writing
/// synthesized fragments into it.
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn from_json(input: &str) -> Result<Self, ParseError> {
        Ok(Self {
            root: serde_json::from_str(input)?,
        })
    }

    pub fn from_yaml(input: &str) -> Result<Self, ParseError> {
        Ok(Self {
            root: serde_yaml_ng::from_str(input)?,
        })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The whole document interpreted as one schema node.
    pub fn root_schema(&self) -> Option<SchemaNode> {
        serde_json::from_value(self.root.clone()).ok()
    }

    /// Look up a reference path inside the document. `None` for an absent
    /// path is a precondition violation of the caller, not a recoverable
    /// condition.
    pub fn resolve(&self, path: &RefPath) -> Option<SchemaNode> {
        let mut value = &self.root;
        for segment in path.segments() {
            value = value.get(segment)?;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Write a schema node at the given path, creating intermediate
    /// objects. Used by the OpenAPI adapter to populate the scratch area
    /// of its working copy.
    pub fn insert(&mut self, path: &RefPath, node: &SchemaNode) {
        let Some((last, parents)) = path.segments().split_last() else {
            return;
        };
        let mut value = &mut self.root;
        for segment in parents {
            let Value::Object(map) = value else { return };
            value = map
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
        }
        let Value::Object(map) = value else { return };
        map.insert(
            last.clone(),
            serde_json::to_value(node).unwrap_or(Value::Null),
        );
    }

    /// The keys of the object found at the given segments, in document
    /// order. Empty if the path is absent or not an object.
    pub fn keys_at(&self, segments: &[&str]) -> Vec<String> {
        let mut value = &self.root;
        for segment in segments {
            match value.get(segment) {
                Some(next) => value = next,
                None => return Vec::new(),
            }
        }
        match value {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Look up a reference path inside a document. See [`Document::resolve`].
pub fn resolve_reference(document: &Document, path: &RefPath) -> Option<SchemaNode> {
    document.resolve(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_path() {
        let doc = Document::from_value(json!({
            "definitions": {"Pet": {"type": "string"}}
        }));
        let node = doc.resolve(&RefPath::parse("#/definitions/Pet"));
        assert!(node.is_some());
        assert!(doc.resolve(&RefPath::parse("#/definitions/Missing")).is_none());
    }

    #[test]
    fn insert_creates_intermediate_objects() {
        let mut doc = Document::from_value(json!({}));
        let node: SchemaNode = serde_json::from_value(json!({"type": "number"})).unwrap();
        let path = RefPath::parse("#/paths/Pets/get/Body");
        doc.insert(&path, &node);
        assert_eq!(doc.resolve(&path), Some(node));
    }

    #[test]
    fn keys_in_document_order() {
        let doc = Document::from_value(json!({
            "components": {"schemas": {"Zebra": {}, "Ant": {}}}
        }));
        assert_eq!(doc.keys_at(&["components", "schemas"]), vec!["Zebra", "Ant"]);
    }
}
