//! Markup serialization.
//!
//! Two views of a subtree: compact markup (the content accessors' get-mode
//! source of truth, round-trippable through the fragment parser) and a
//! capped, indented outline for diagnostics and demos.

use crate::error::Result;
use crate::parser::is_void_element;
use crate::types::style_to_string;
use crate::utils::cap_text_length;
use crate::{Document, NodeData, NodeId};

/// Serialize a node's children to compact markup (the "inner" view).
pub fn inner_markup(doc: &Document, node: NodeId) -> Result<String> {
    let mut out = String::new();
    for &child in doc.children_of(node)? {
        render_node(doc, child, &mut out)?;
    }
    Ok(out)
}

/// Serialize a node itself, children included.
pub fn outer_markup(doc: &Document, node: NodeId) -> Result<String> {
    let mut out = String::new();
    render_node(doc, node, &mut out)?;
    Ok(out)
}

fn render_node(doc: &Document, node: NodeId, out: &mut String) -> Result<()> {
    match &doc.get(node)?.data {
        NodeData::Document => {
            for &child in doc.children_of(node)? {
                render_node(doc, child, out)?;
            }
        }
        NodeData::Text(t) => out.push_str(&escape(t, false)),
        NodeData::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);

            // Sorted attribute order keeps output deterministic regardless
            // of map iteration order.
            let mut attrs: Vec<(&String, &String)> = el.attributes.iter().collect();
            attrs.sort_by(|a, b| a.0.cmp(b.0));
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&escape(value, true));
                    out.push('"');
                }
            }
            if !el.style.is_empty() {
                out.push_str(" style=\"");
                out.push_str(&escape(&style_to_string(&el.style), true));
                out.push('"');
            }
            out.push('>');

            if is_void_element(&el.tag) && doc.children_of(node)?.is_empty() {
                return Ok(());
            }
            for &child in doc.children_of(node)? {
                render_node(doc, child, out)?;
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
    Ok(())
}

fn escape(input: &str, in_attr: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Knobs for the outline view.
#[derive(Debug, Clone)]
pub struct OutlineConfig {
    /// Stop after this many nodes
    pub max_nodes: usize,
    /// Cap rendered text runs to this many bytes
    pub max_text_length: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_nodes: 512,
            max_text_length: 40,
        }
    }
}

/// Indented one-line-per-node outline of a subtree. Elements show tag plus
/// id/class, text shows a capped quoted run.
pub fn outline(doc: &Document, node: NodeId, config: &OutlineConfig) -> Result<String> {
    let mut lines = Vec::new();
    let mut left = config.max_nodes;
    outline_node(doc, node, 0, config, &mut lines, &mut left)?;
    Ok(lines.join("\n"))
}

fn outline_node(
    doc: &Document,
    node: NodeId,
    depth: usize,
    config: &OutlineConfig,
    lines: &mut Vec<String>,
    left: &mut usize,
) -> Result<()> {
    if *left == 0 {
        return Ok(());
    }
    *left -= 1;
    let indent = "  ".repeat(depth);

    match &doc.get(node)?.data {
        NodeData::Document => {
            lines.push(format!("{}#document", indent));
            for &child in doc.children_of(node)? {
                outline_node(doc, child, depth + 1, config, lines, left)?;
            }
        }
        NodeData::Element(el) => {
            let mut line = format!("{}<{}", indent, el.tag);
            if let Some(id) = el.attr("id") {
                line.push_str(&format!(" id=\"{}\"", id));
            }
            if let Some(class) = el.attr("class") {
                line.push_str(&format!(" class=\"{}\"", class));
            }
            line.push('>');
            lines.push(line);
            for &child in doc.children_of(node)? {
                outline_node(doc, child, depth + 1, config, lines, left)?;
            }
        }
        NodeData::Text(t) => {
            let shown = t.replace('\n', " ");
            let shown = shown.trim();
            if !shown.is_empty() {
                lines.push(format!(
                    "{}\"{}\"",
                    indent,
                    cap_text_length(shown, config.max_text_length)
                ));
            }
        }
        NodeData::Comment(c) => {
            lines.push(format!(
                "{}<!-- {} -->",
                indent,
                cap_text_length(c.trim(), config.max_text_length)
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_fragment;

    #[test]
    fn test_inner_and_outer_markup() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "id", "x").unwrap();
        doc.set_attr(div, "class", "a b").unwrap();
        doc.append(doc.root_id(), div).unwrap();
        let b = doc.create_element("b");
        doc.append(div, b).unwrap();
        let t = doc.create_text("hi & <bye>");
        doc.append(b, t).unwrap();

        assert_eq!(
            outer_markup(&doc, div).unwrap(),
            "<div class=\"a b\" id=\"x\"><b>hi &amp; &lt;bye&gt;</b></div>"
        );
        assert_eq!(
            inner_markup(&doc, div).unwrap(),
            "<b>hi &amp; &lt;bye&gt;</b>"
        );
    }

    #[test]
    fn test_void_style_and_flag_attrs() {
        let mut doc = Document::new();
        let img = doc.create_element("img");
        doc.set_attr(img, "src", "pic.png").unwrap();
        doc.set_attr(img, "hidden", "").unwrap();
        doc.set_style_prop(img, "display", "none").unwrap();
        doc.append(doc.root_id(), img).unwrap();

        assert_eq!(
            outer_markup(&doc, img).unwrap(),
            "<img hidden src=\"pic.png\" style=\"display: none\">"
        );
    }

    #[test]
    fn test_round_trip_through_parser() {
        let mut doc = Document::new();
        let roots = parse_fragment(
            &mut doc,
            "<div class=\"wrap\"><p data-n=\"1\">a &amp; b</p><br><!--c--></div>",
        )
        .unwrap();
        let markup = outer_markup(&doc, roots[0]).unwrap();

        let mut doc2 = Document::new();
        let reparsed = parse_fragment(&mut doc2, &markup).unwrap();
        assert_eq!(outer_markup(&doc2, reparsed[0]).unwrap(), markup);
    }

    #[test]
    fn test_outline_caps() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "id", "main").unwrap();
        doc.append(doc.root_id(), div).unwrap();
        let t = doc.create_text("some rather long text");
        doc.append(div, t).unwrap();

        let text = outline(
            &doc,
            doc.root_id(),
            &OutlineConfig {
                max_nodes: 2,
                max_text_length: 10,
            },
        )
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["#document", "  <div id=\"main\">"]);

        let full = outline(&doc, doc.root_id(), &OutlineConfig::default()).unwrap();
        assert!(full.contains("\"some rather long text\""));
        let capped = outline(
            &doc,
            div,
            &OutlineConfig {
                max_nodes: 10,
                max_text_length: 10,
            },
        )
        .unwrap();
        assert!(capped.contains("\"some rathe...\""));
    }
}
