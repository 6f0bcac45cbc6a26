//! Build documents from a JSON tree description.
//!
//! The interchange/fixture format is a nested node tree:
//!
//! ```json
//! {
//!   "tag": "div",
//!   "attrs": { "id": "main", "class": "wrap" },
//!   "children": [
//!     "plain text",
//!     { "comment": "a note" },
//!     { "tag": "p", "children": ["hello"] }
//!   ]
//! }
//! ```
//!
//! Strings are text nodes, objects with a `"comment"` key are comments, and
//! everything else must be an element object carrying `"tag"`. The top-level
//! value may also be an array of such nodes, which become the document
//! node's children.

use crate::error::{DomError, Result};
use crate::{Document, NodeId};
use serde_json::Value;
use std::path::Path;

/// Nesting bound for loaded trees, matching the fragment parser's default.
const MAX_LOAD_DEPTH: usize = 256;

impl Document {
    /// Build a document from a JSON tree value.
    pub fn from_json(value: &Value) -> Result<Document> {
        let mut doc = Document::new();
        let root = doc.root_id();
        match value {
            Value::Array(items) => {
                for item in items {
                    let node = load_node(&mut doc, item, 1)?;
                    doc.append(root, node)?;
                }
            }
            _ => {
                let node = load_node(&mut doc, value, 1)?;
                doc.append(root, node)?;
            }
        }
        tracing::debug!("loaded document with {} nodes", doc.len());
        Ok(doc)
    }

    /// Build a document from JSON text.
    pub fn from_json_str(input: &str) -> Result<Document> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json(&value)
    }

    /// Build a document from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Document> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

fn load_node(doc: &mut Document, value: &Value, depth: usize) -> Result<NodeId> {
    if depth > MAX_LOAD_DEPTH {
        return Err(DomError::MaxDepthExceeded {
            current: depth,
            max: MAX_LOAD_DEPTH,
        });
    }

    match value {
        Value::String(text) => Ok(doc.create_text(text)),
        Value::Object(map) => {
            if let Some(comment) = map.get("comment") {
                let text = comment
                    .as_str()
                    .ok_or_else(|| DomError::InvalidTree("\"comment\" must be a string".into()))?;
                return Ok(doc.create_comment(text));
            }

            let tag = map
                .get("tag")
                .and_then(Value::as_str)
                .ok_or_else(|| DomError::InvalidTree("node object is missing \"tag\"".into()))?;
            let element = doc.create_element(tag);

            if let Some(attrs) = map.get("attrs") {
                let attrs = attrs.as_object().ok_or_else(|| {
                    DomError::InvalidTree("\"attrs\" must be an object".into())
                })?;
                for (name, value) in attrs {
                    let value = value.as_str().ok_or_else(|| {
                        DomError::InvalidTree(format!(
                            "attribute {:?} must be a string value",
                            name
                        ))
                    })?;
                    doc.set_attr(element, name, value)?;
                }
            }

            if let Some(children) = map.get("children") {
                let children = children.as_array().ok_or_else(|| {
                    DomError::InvalidTree("\"children\" must be an array".into())
                })?;
                for child in children {
                    let child_id = load_node(doc, child, depth + 1)?;
                    doc.append(element, child_id)?;
                }
            }

            Ok(element)
        }
        other => Err(DomError::InvalidTree(format!(
            "expected string or object node, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_simple_tree() {
        let doc = Document::from_json(&json!({
            "tag": "html",
            "children": [{
                "tag": "body",
                "children": [
                    { "tag": "p", "attrs": { "class": "note" }, "children": ["hello"] },
                    { "comment": "marker" },
                    "loose text"
                ]
            }]
        }))
        .unwrap();

        let html = doc.children_of(doc.root_id()).unwrap()[0];
        assert_eq!(doc.get(html).unwrap().tag(), Some("html"));
        let body = doc.children_of(html).unwrap()[0];
        assert_eq!(doc.children_of(body).unwrap().len(), 3);
        assert_eq!(doc.text_content(body).unwrap(), "helloloose text");

        let p = doc.children_of(body).unwrap()[0];
        assert_eq!(doc.attr(p, "class").unwrap().as_deref(), Some("note"));
    }

    #[test]
    fn test_top_level_array_and_style_attr() {
        let doc = Document::from_json(&json!([
            { "tag": "div", "attrs": { "style": "display: none" } },
            "tail"
        ]))
        .unwrap();

        let kids = doc.children_of(doc.root_id()).unwrap().to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(
            doc.style_prop(kids[0], "display").unwrap().as_deref(),
            Some("none")
        );
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(
            Document::from_json(&json!({ "children": [] })),
            Err(DomError::InvalidTree(_))
        ));
        assert!(matches!(
            Document::from_json(&json!(42)),
            Err(DomError::InvalidTree(_))
        ));
        assert!(matches!(
            Document::from_json(&json!({ "tag": "p", "attrs": { "n": 1 } })),
            Err(DomError::InvalidTree(_))
        ));
        assert!(matches!(
            Document::from_json_str("{ not json"),
            Err(DomError::ParseError(_))
        ));
    }
}
