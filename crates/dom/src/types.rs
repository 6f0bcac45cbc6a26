//! Core node types for the document arena.
//!
//! Design notes:
//! 1. Use u32 indices instead of pointers (4 bytes, Copy, no ownership knots)
//! 2. Node kind is a tagged union, so there is exactly one place that can
//!    answer "what is this node?" — no duck-typed probing downstream
//! 3. Use SmallVec for child lists (most nodes have few children)

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node identifier (index into the document arena).
/// u32 allows 4 billion nodes, enough for any document.
pub type NodeId = u32;

/// A single node in the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,
    pub data: NodeData,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self {
            parent_id: None,
            children_ids: SmallVec::new(),
            data,
        }
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Tag name for element nodes
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|e| e.tag.as_str())
    }
}

/// Node-specific data. The discriminant answers every "what kind of node"
/// question the operations need; there is no nodeType integer to compare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element with tag, attributes and inline style
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data.
///
/// The `class` attribute is stored as-is in `attributes`; class helpers view
/// it as a whitespace-separated set. Inline style is kept as an ordered
/// property list, not a raw attribute string — the renderer serializes it
/// back to `style="…"` and the parsers fold a `style` attribute into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementData {
    /// Tag name, stored lowercase
    pub tag: String,
    /// Attribute map (names stored lowercase, `style` excluded)
    pub attributes: HashMap<String, String>,
    /// Inline style properties in declaration order
    pub style: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: HashMap::new(),
            style: Vec::new(),
        }
    }

    /// Get an attribute value. `name` must already be lowercase.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        self.attributes.remove(name).is_some()
    }

    /// Get an inline style property value. `name` must already be lowercase.
    pub fn style_prop(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style property, replacing an existing declaration of the
    /// same name in place and appending otherwise.
    pub fn set_style_prop(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.style.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.style.push((name, value.to_string())),
        }
    }

    /// View of the `class` attribute as a whitespace-separated set.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|c| c == name)
    }

    /// Add a class. Adding a class that is already present is a no-op, so the
    /// class set never holds duplicates.
    pub fn add_class(&mut self, name: &str) {
        if self.has_class(name) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, name),
            _ => name.to_string(),
        };
        self.set_attr("class", &joined);
    }

    pub fn remove_class(&mut self, name: &str) {
        let remaining: Vec<&str> = self.classes().filter(|c| *c != name).collect();
        if remaining.is_empty() {
            self.remove_attr("class");
        } else {
            let joined = remaining.join(" ");
            self.set_attr("class", &joined);
        }
    }
}

/// Parse an inline style string ("color: red; font-size: 12px") into an
/// ordered declaration list. Empty and nameless declarations are skipped.
pub(crate) fn parse_style_declarations(input: &str) -> Vec<(String, String)> {
    input
        .split(';')
        .filter_map(|pair| {
            let (n, v) = pair.split_once(':')?;
            let name = n.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            Some((name, v.trim().to_string()))
        })
        .collect()
}

/// Serialize a declaration list back to `name: value; …` form.
pub(crate) fn style_to_string(style: &[(String, String)]) -> String {
    style
        .iter()
        .map(|(n, v)| format!("{}: {}", n, v))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_set_semantics() {
        let mut el = ElementData::new("DIV");
        assert_eq!(el.tag, "div");

        el.add_class("on");
        el.add_class("on");
        assert_eq!(el.attr("class"), Some("on"));
        assert!(el.has_class("on"));

        el.add_class("hot");
        assert_eq!(el.attr("class"), Some("on hot"));

        el.remove_class("on");
        assert_eq!(el.attr("class"), Some("hot"));
        el.remove_class("hot");
        assert_eq!(el.attr("class"), None);
    }

    #[test]
    fn test_style_props_keep_order() {
        let mut el = ElementData::new("p");
        el.set_style_prop("display", "none");
        el.set_style_prop("color", "red");
        el.set_style_prop("display", "block");

        assert_eq!(el.style_prop("display"), Some("block"));
        assert_eq!(
            el.style,
            vec![
                ("display".to_string(), "block".to_string()),
                ("color".to_string(), "red".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_style_declarations() {
        let decls = parse_style_declarations("Color: red; ; font-size : 12px;");
        assert_eq!(
            decls,
            vec![
                ("color".to_string(), "red".to_string()),
                ("font-size".to_string(), "12px".to_string()),
            ]
        );
        assert_eq!(style_to_string(&decls), "color: red; font-size: 12px");
    }
}
