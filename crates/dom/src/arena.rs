//! Arena-based document storage
//!
//! A `Document` owns every node it ever created in a single `Vec`; tree
//! structure is expressed through parent/child id links, so surgery is index
//! bookkeeping rather than pointer juggling. Detached nodes stay in the
//! arena and simply become unreachable from the root.
//!
//! ## Layout
//!
//! ```text
//! Document: Vec<Node>
//!           [Node0][Node1][Node2]...
//!            ↑ id 0 is always the document node
//! ```

use crate::error::{DomError, Result};
use crate::events::{EventRegistry, ReadyState};
use crate::types::{parse_style_declarations, style_to_string, ElementData, Node, NodeData};
use crate::NodeId;
use ahash::AHashMap;
use std::collections::HashMap;
use std::fmt;

/// An in-memory document tree.
///
/// Node id 0 is the document node and always exists. All other nodes are
/// created detached and wired in with [`append`](Document::append) /
/// [`prepend`](Document::prepend).
pub struct Document {
    /// All nodes ever created, stored sequentially
    nodes: Vec<Node>,

    /// id attribute → NodeId lookup. Entries can go stale when a subtree is
    /// detached; lookups verify against the live node before trusting them.
    id_index: AHashMap<String, NodeId>,

    /// Per-node event listeners
    pub(crate) listeners: EventRegistry,

    /// Document readiness plus the queued ready callbacks
    pub(crate) ready_state: ReadyState,
    pub(crate) ready_queue: Vec<Box<dyn FnOnce()>>,
}

impl Document {
    /// Create an empty document (just the document node).
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            id_index: AHashMap::new(),
            listeners: EventRegistry::new(),
            ready_state: ReadyState::Loading,
            ready_queue: Vec::new(),
        }
    }

    /// The document node's id. Always 0, always valid.
    pub fn root_id(&self) -> NodeId {
        0
    }

    /// Total number of nodes ever created (including detached ones).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Comment(text.to_string()))
    }

    /// Get node by id (immutable)
    pub fn get(&self, node: NodeId) -> Result<&Node> {
        self.nodes
            .get(node as usize)
            .ok_or(DomError::NodeNotFound(node))
    }

    /// Get node by id (mutable)
    pub fn get_mut(&mut self, node: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(node as usize)
            .ok_or(DomError::NodeNotFound(node))
    }

    /// Whether the node can be reached from the document node.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cur = node;
        loop {
            if cur == self.root_id() {
                return true;
            }
            match self.get(cur).ok().and_then(|n| n.parent_id) {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    fn assert_no_cycle(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut cur = Some(parent);
        while let Some(id) = cur {
            if id == child {
                return Err(DomError::WouldCycle {
                    node: child,
                    parent,
                });
            }
            cur = self.get(id)?.parent_id;
        }
        Ok(())
    }

    fn unlink(&mut self, node: NodeId) -> Result<()> {
        if let Some(parent) = self.get(node)?.parent_id {
            self.get_mut(parent)?.children_ids.retain(|c| *c != node);
            self.get_mut(node)?.parent_id = None;
        }
        Ok(())
    }

    /// Move `child` to the end of `parent`'s child list, detaching it from
    /// any previous parent first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(child)?;
        self.assert_no_cycle(parent, child)?;
        self.unlink(child)?;
        self.get_mut(parent)?.children_ids.push(child);
        self.get_mut(child)?.parent_id = Some(parent);
        Ok(())
    }

    /// Move `child` to the front of `parent`'s child list.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(child)?;
        self.assert_no_cycle(parent, child)?;
        self.unlink(child)?;
        self.get_mut(parent)?.children_ids.insert(0, child);
        self.get_mut(child)?.parent_id = Some(parent);
        Ok(())
    }

    /// Detach a node from its parent. The subtree stays intact (and stays in
    /// the arena), it just becomes unreachable from the root.
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        self.get(node)?;
        self.unlink(node)
    }

    /// Detach every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) -> Result<()> {
        let children: Vec<NodeId> = self.get(node)?.children_ids.to_vec();
        for child in children {
            self.unlink(child)?;
        }
        Ok(())
    }

    /// Deep-copy a subtree. The copy is detached; listeners are not copied.
    pub fn clone_subtree(&mut self, node: NodeId) -> Result<NodeId> {
        let data = self.get(node)?.data.clone();
        let children: Vec<NodeId> = self.get(node)?.children_ids.to_vec();
        let copy = self.alloc(data);
        for child in children {
            let child_copy = self.clone_subtree(child)?;
            self.append(copy, child_copy)?;
        }
        Ok(copy)
    }

    /// Parent id, if attached to one.
    pub fn parent_of(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node)?.parent_id)
    }

    /// Child ids in tree order.
    pub fn children_of(&self, node: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(node)?.children_ids)
    }

    /// Element children only (text and comment nodes skipped).
    pub fn element_children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        for &child in self.children_of(node)? {
            if self.get(child)?.is_element() {
                out.push(child);
            }
        }
        Ok(out)
    }

    /// Traverse a subtree depth-first (iterative, no recursion), visiting the
    /// start node first and children left-to-right. The visitor aborts the
    /// walk by returning an error.
    pub fn traverse_df<F>(&self, start: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(NodeId, &Node) -> Result<()>,
    {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = self.get(id)?;
            visit(id, node)?;
            for &child in node.children_ids.iter().rev() {
                stack.push(child);
            }
        }
        Ok(())
    }

    /// All ids in the subtree below `node`, in document order (preorder,
    /// left-to-right), excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        self.traverse_df(node, |id, _| {
            if id != node {
                out.push(id);
            }
            Ok(())
        })?;
        Ok(out)
    }

    /// Concatenated text of every descendant text node, document order.
    pub fn text_content(&self, node: NodeId) -> Result<String> {
        let mut text = String::new();
        self.traverse_df(node, |_, n| {
            if let Some(t) = n.as_text() {
                text.push_str(t);
            }
            Ok(())
        })?;
        Ok(text)
    }

    /// Get an attribute value. Attribute names are ASCII-case-insensitive;
    /// `style` reads back the serialized inline style list.
    pub fn attr(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        let el = self
            .get(node)?
            .as_element()
            .ok_or(DomError::NotAnElement(node))?;
        let name = name.to_ascii_lowercase();
        if name == "style" {
            if el.style.is_empty() {
                return Ok(None);
            }
            return Ok(Some(style_to_string(&el.style)));
        }
        Ok(el.attr(&name).map(str::to_string))
    }

    /// Set an attribute. Setting `style` replaces the inline style list;
    /// setting `id` keeps the id index current.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        if !self.get(node)?.is_element() {
            return Err(DomError::NotAnElement(node));
        }
        let name = name.to_ascii_lowercase();
        if name == "style" {
            let decls = parse_style_declarations(value);
            if let Some(el) = self.get_mut(node)?.as_element_mut() {
                el.style = decls;
            }
            return Ok(());
        }
        if name == "id" {
            self.drop_id_entry(node)?;
            self.id_index.insert(value.to_string(), node);
        }
        if let Some(el) = self.get_mut(node)?.as_element_mut() {
            el.set_attr(&name, value);
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<()> {
        if !self.get(node)?.is_element() {
            return Err(DomError::NotAnElement(node));
        }
        let name = name.to_ascii_lowercase();
        if name == "style" {
            if let Some(el) = self.get_mut(node)?.as_element_mut() {
                el.style.clear();
            }
            return Ok(());
        }
        if name == "id" {
            self.drop_id_entry(node)?;
        }
        if let Some(el) = self.get_mut(node)?.as_element_mut() {
            el.remove_attr(&name);
        }
        Ok(())
    }

    fn drop_id_entry(&mut self, node: NodeId) -> Result<()> {
        let old = self
            .get(node)?
            .as_element()
            .and_then(|el| el.attr("id"))
            .map(str::to_string);
        if let Some(old) = old {
            if self.id_index.get(&old) == Some(&node) {
                self.id_index.remove(&old);
            }
        }
        Ok(())
    }

    /// The full attribute map of an element (`style` excluded).
    pub fn attributes(&self, node: NodeId) -> Result<&HashMap<String, String>> {
        Ok(&self
            .get(node)?
            .as_element()
            .ok_or(DomError::NotAnElement(node))?
            .attributes)
    }

    /// Get an inline style property.
    pub fn style_prop(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        let el = self
            .get(node)?
            .as_element()
            .ok_or(DomError::NotAnElement(node))?;
        Ok(el.style_prop(&name.to_ascii_lowercase()).map(str::to_string))
    }

    /// Set an inline style property.
    pub fn set_style_prop(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.get_mut(node)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(node))?
            .set_style_prop(name, value);
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, name: &str) -> Result<bool> {
        Ok(self
            .get(node)?
            .as_element()
            .ok_or(DomError::NotAnElement(node))?
            .has_class(name))
    }

    pub fn add_class(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.get_mut(node)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(node))?
            .add_class(name);
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.get_mut(node)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(node))?
            .remove_class(name);
        Ok(())
    }

    /// Find the first attached element carrying the given id attribute, in
    /// document order. Uses the id index as a fast path; a stale or missing
    /// entry falls back to a scan. With duplicate ids the index may answer
    /// with any one of them.
    pub fn element_by_id(&self, id_value: &str) -> Option<NodeId> {
        if let Some(&candidate) = self.id_index.get(id_value) {
            let fresh = self
                .get(candidate)
                .ok()
                .and_then(|n| n.as_element())
                .map(|el| el.attr("id") == Some(id_value))
                .unwrap_or(false);
            if fresh && self.is_attached(candidate) {
                return Some(candidate);
            }
        }
        let mut found = None;
        let _ = self.traverse_df(self.root_id(), |id, node| {
            if found.is_none() {
                if let Some(el) = node.as_element() {
                    if el.attr("id") == Some(id_value) {
                        found = Some(id);
                    }
                }
            }
            Ok(())
        });
        found
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("ready_state", &self.ready_state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_get() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let text = doc.create_text("hello");
        doc.append(doc.root_id(), div).unwrap();
        doc.append(div, text).unwrap();

        assert_eq!(doc.get(div).unwrap().tag(), Some("div"));
        assert_eq!(doc.children_of(div).unwrap(), &[text]);
        assert_eq!(doc.parent_of(text).unwrap(), Some(div));
        assert!(matches!(doc.get(99), Err(DomError::NodeNotFound(99))));
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append(doc.root_id(), a).unwrap();
        doc.append(doc.root_id(), b).unwrap();

        doc.append(a, child).unwrap();
        doc.append(b, child).unwrap();

        assert!(doc.children_of(a).unwrap().is_empty());
        assert_eq!(doc.children_of(b).unwrap(), &[child]);
        assert_eq!(doc.parent_of(child).unwrap(), Some(b));
    }

    #[test]
    fn test_append_rejects_cycle() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append(doc.root_id(), outer).unwrap();
        doc.append(outer, inner).unwrap();

        assert!(matches!(
            doc.append(inner, outer),
            Err(DomError::WouldCycle { .. })
        ));
    }

    #[test]
    fn test_detach_keeps_subtree() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let span = doc.create_element("span");
        doc.append(doc.root_id(), div).unwrap();
        doc.append(div, span).unwrap();

        doc.detach(div).unwrap();
        assert!(!doc.is_attached(div));
        assert!(!doc.is_attached(span));
        assert_eq!(doc.parent_of(span).unwrap(), Some(div));
        assert!(doc.children_of(doc.root_id()).unwrap().is_empty());
    }

    #[test]
    fn test_descendants_document_order() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let p1 = doc.create_element("p");
        let p2 = doc.create_element("p");
        let t1 = doc.create_text("x");
        doc.append(doc.root_id(), div).unwrap();
        doc.append(div, p1).unwrap();
        doc.append(p1, t1).unwrap();
        doc.append(div, p2).unwrap();

        assert_eq!(doc.descendants(doc.root_id()).unwrap(), vec![div, p1, t1, p2]);
    }

    #[test]
    fn test_text_content() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let b = doc.create_element("b");
        doc.append(doc.root_id(), div).unwrap();
        let t1 = doc.create_text("one ");
        doc.append(div, t1).unwrap();
        doc.append(div, b).unwrap();
        let t2 = doc.create_text("two");
        doc.append(b, t2).unwrap();

        assert_eq!(doc.text_content(div).unwrap(), "one two");
    }

    #[test]
    fn test_attr_and_style_special_case() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.append(doc.root_id(), div).unwrap();

        doc.set_attr(div, "Data-Role", "card").unwrap();
        assert_eq!(doc.attr(div, "data-role").unwrap().as_deref(), Some("card"));

        doc.set_attr(div, "style", "color: red; display: none").unwrap();
        assert_eq!(doc.style_prop(div, "display").unwrap().as_deref(), Some("none"));
        assert_eq!(
            doc.attr(div, "style").unwrap().as_deref(),
            Some("color: red; display: none")
        );
        assert!(doc.attributes(div).unwrap().get("style").is_none());

        let text = doc.create_text("x");
        assert!(matches!(
            doc.attr(text, "id"),
            Err(DomError::NotAnElement(_))
        ));
    }

    #[test]
    fn test_element_by_id_index_and_fallback() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append(doc.root_id(), a).unwrap();
        doc.append(doc.root_id(), b).unwrap();

        doc.set_attr(a, "id", "main").unwrap();
        assert_eq!(doc.element_by_id("main"), Some(a));

        // Stale entry after detach: lookup must not answer with a detached node.
        doc.detach(a).unwrap();
        assert_eq!(doc.element_by_id("main"), None);

        // Reassignment retargets the index.
        doc.set_attr(b, "id", "main").unwrap();
        assert_eq!(doc.element_by_id("main"), Some(b));
    }

    #[test]
    fn test_clone_subtree() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "class", "card").unwrap();
        let text = doc.create_text("hi");
        doc.append(doc.root_id(), div).unwrap();
        doc.append(div, text).unwrap();

        let copy = doc.clone_subtree(div).unwrap();
        assert_ne!(copy, div);
        assert!(!doc.is_attached(copy));
        assert_eq!(doc.attr(copy, "class").unwrap().as_deref(), Some("card"));
        assert_eq!(doc.text_content(copy).unwrap(), "hi");

        // Mutating the copy leaves the original alone.
        doc.set_attr(copy, "class", "copy").unwrap();
        assert_eq!(doc.attr(div, "class").unwrap().as_deref(), Some("card"));
    }
}
