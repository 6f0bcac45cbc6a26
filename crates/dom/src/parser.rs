//! Markup fragment parser.
//!
//! A single-pass scanner that turns a markup string into detached nodes
//! owned by a `Document`. It handles the fragment subset the content
//! accessors need — elements, attributes, text with basic entities,
//! comments, void and self-closing tags — and is deliberately forgiving the
//! way tree construction in browsers is: unmatched close tags are ignored
//! and elements still open at end of input are closed implicitly.
//! Structural impossibilities (unterminated tags or comments) are errors.

use crate::error::{DomError, Result};
use crate::{Document, NodeId};

/// Elements that never have children and never take a close tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Knobs for fragment parsing.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Keep comment nodes (drop them when false)
    pub keep_comments: bool,
    /// Maximum open-element nesting before giving up
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            keep_comments: true,
            max_depth: 256,
        }
    }
}

/// Parse a fragment with default config. Returns the top-level node ids in
/// input order; every node is detached and owned by `doc`.
pub fn parse_fragment(doc: &mut Document, input: &str) -> Result<Vec<NodeId>> {
    parse_fragment_with(doc, input, &ParserConfig::default())
}

/// Parse a fragment.
pub fn parse_fragment_with(
    doc: &mut Document,
    input: &str,
    config: &ParserConfig,
) -> Result<Vec<NodeId>> {
    let mut parser = Parser {
        doc,
        bytes: input.as_bytes(),
        input,
        pos: 0,
        roots: Vec::new(),
        // (id, tag) of open elements
        stack: Vec::new(),
        pending_attrs: Vec::new(),
        config,
    };
    parser.run()?;
    tracing::debug!("parsed fragment: {} root nodes", parser.roots.len());
    Ok(parser.roots)
}

struct Parser<'a> {
    doc: &'a mut Document,
    bytes: &'a [u8],
    input: &'a str,
    pos: usize,
    roots: Vec<NodeId>,
    stack: Vec<(NodeId, String)>,
    pending_attrs: Vec<(String, String)>,
    config: &'a ParserConfig,
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<()> {
        let mut text = String::new();
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'<' && self.at_markup_start() {
                self.flush_text(&mut text)?;
                match self.bytes.get(self.pos + 1) {
                    Some(&b'/') => self.close_tag()?,
                    Some(&b'!') => self.comment_or_declaration()?,
                    _ => self.open_tag()?,
                }
            } else {
                // Either plain text or a '<' that does not begin markup;
                // both are literal text.
                let rest = &self.input[self.pos..];
                let mut ch = rest.chars();
                if let Some(c) = ch.next() {
                    text.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.flush_text(&mut text)?;
        if !self.stack.is_empty() {
            tracing::debug!("implicitly closing {} unclosed elements", self.stack.len());
        }
        Ok(())
    }

    fn at_markup_start(&self) -> bool {
        match self.bytes.get(self.pos + 1) {
            Some(c) if c.is_ascii_alphabetic() => true,
            Some(&b'!') => true,
            Some(&b'/') => self
                .bytes
                .get(self.pos + 2)
                .map(|c| c.is_ascii_alphabetic())
                .unwrap_or(false),
            _ => false,
        }
    }

    fn flush_text(&mut self, text: &mut String) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let decoded = decode_entities(text);
        let node = self.doc.create_text(&decoded);
        self.attach(node)?;
        text.clear();
        Ok(())
    }

    fn attach(&mut self, node: NodeId) -> Result<()> {
        match self.stack.last() {
            Some(&(parent, _)) => self.doc.append(parent, node)?,
            None => self.roots.push(node),
        }
        Ok(())
    }

    fn comment_or_declaration(&mut self) -> Result<()> {
        if self.input[self.pos..].starts_with("<!--") {
            let body_start = self.pos + 4;
            let Some(rel_end) = self.input[body_start..].find("-->") else {
                return Err(DomError::MarkupParse {
                    reason: "unterminated comment".to_string(),
                    offset: self.pos,
                });
            };
            if self.config.keep_comments {
                let body = &self.input[body_start..body_start + rel_end];
                let node = self.doc.create_comment(body);
                self.attach(node)?;
            }
            self.pos = body_start + rel_end + 3;
            return Ok(());
        }
        // Other "<!…>" declarations (doctype and friends) are skipped whole.
        match self.input[self.pos..].find('>') {
            Some(rel) => {
                self.pos += rel + 1;
                Ok(())
            }
            None => Err(DomError::MarkupParse {
                reason: "unterminated declaration".to_string(),
                offset: self.pos,
            }),
        }
    }

    fn close_tag(&mut self) -> Result<()> {
        let name_start = self.pos + 2;
        let Some(rel) = self.input[name_start..].find('>') else {
            return Err(DomError::MarkupParse {
                reason: "unterminated close tag".to_string(),
                offset: self.pos,
            });
        };
        let name = self.input[name_start..name_start + rel]
            .trim()
            .to_ascii_lowercase();
        self.pos = name_start + rel + 1;

        // Pop to the nearest matching open element; a close tag with no
        // matching open element is ignored.
        if let Some(open_at) = self.stack.iter().rposition(|(_, tag)| *tag == name) {
            self.stack.truncate(open_at);
        }
        Ok(())
    }

    fn open_tag(&mut self) -> Result<()> {
        let tag_offset = self.pos;
        self.pos += 1; // consume '<'
        let name = self.read_ident();
        let tag = name.to_ascii_lowercase();

        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            match self.bytes.get(self.pos) {
                None => {
                    return Err(DomError::MarkupParse {
                        reason: format!("unterminated <{}> tag", tag),
                        offset: tag_offset,
                    })
                }
                Some(&b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(&b'/') => {
                    self.pos += 1;
                    if self.bytes.get(self.pos) == Some(&b'>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                    // Stray slash inside a tag; skip it.
                }
                Some(_) => {
                    self.read_attribute(tag_offset)?;
                }
            }
        }

        let element = self.doc.create_element(&tag);
        for (attr_name, attr_value) in std::mem::take(&mut self.pending_attrs) {
            // First declaration of an attribute wins.
            if self.doc.attr(element, &attr_name)?.is_none() {
                self.doc.set_attr(element, &attr_name, &attr_value)?;
            }
        }
        self.attach(element)?;

        if !self_closing && !is_void_element(&tag) {
            if self.stack.len() + 1 > self.config.max_depth {
                return Err(DomError::MaxDepthExceeded {
                    current: self.stack.len() + 1,
                    max: self.config.max_depth,
                });
            }
            self.stack.push((element, tag));
        }
        Ok(())
    }

    fn read_attribute(&mut self, tag_offset: usize) -> Result<()> {
        let name = self.read_attr_name();
        if name.is_empty() {
            return Err(DomError::MarkupParse {
                reason: "malformed attribute".to_string(),
                offset: self.pos,
            });
        }
        self.skip_whitespace();

        let value = if self.bytes.get(self.pos) == Some(&b'=') {
            self.pos += 1;
            self.skip_whitespace();
            match self.bytes.get(self.pos) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    self.pos += 1;
                    let start = self.pos;
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != q {
                        self.pos += 1;
                    }
                    if self.pos >= self.bytes.len() {
                        return Err(DomError::MarkupParse {
                            reason: "unterminated attribute value".to_string(),
                            offset: tag_offset,
                        });
                    }
                    let raw = &self.input[start..self.pos];
                    self.pos += 1;
                    decode_entities(raw)
                }
                _ => {
                    let start = self.pos;
                    while self.pos < self.bytes.len()
                        && !self.bytes[self.pos].is_ascii_whitespace()
                        && self.bytes[self.pos] != b'>'
                        && self.bytes[self.pos] != b'/'
                    {
                        self.pos += 1;
                    }
                    decode_entities(&self.input[start..self.pos])
                }
            }
        } else {
            // Valueless attribute ("disabled"): present with an empty value.
            String::new()
        };

        self.pending_attrs.push((name, value));
        Ok(())
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_alphanumeric()
                || self.bytes[self.pos] == b'-'
                || self.bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }
        self.input[start..self.pos].to_string()
    }

    fn read_attr_name(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.bytes.len()
            && !self.bytes[self.pos].is_ascii_whitespace()
            && !matches!(self.bytes[self.pos], b'=' | b'>' | b'/')
        {
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }
}

/// Decode the basic named and numeric entities the renderer emits.
pub(crate) fn decode_entities(input: &str) -> String {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&apos;", '\''),
    ];
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    'outer: while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        for (name, ch) in ENTITIES {
            if tail.starts_with(name) {
                out.push(*ch);
                rest = &tail[name.len()..];
                continue 'outer;
            }
        }
        out.push('&');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeData;

    #[test]
    fn test_simple_fragment() {
        let mut doc = Document::new();
        let roots = parse_fragment(&mut doc, "<b>hi</b> there").unwrap();
        assert_eq!(roots.len(), 2);

        assert_eq!(doc.get(roots[0]).unwrap().tag(), Some("b"));
        assert_eq!(doc.text_content(roots[0]).unwrap(), "hi");
        assert_eq!(doc.get(roots[1]).unwrap().as_text(), Some(" there"));
        assert!(!doc.is_attached(roots[0]));
    }

    #[test]
    fn test_attributes_all_quote_styles() {
        let mut doc = Document::new();
        let roots =
            parse_fragment(&mut doc, r#"<input type="text" id='q' value=5 disabled>"#).unwrap();
        let input = roots[0];
        assert_eq!(doc.attr(input, "type").unwrap().as_deref(), Some("text"));
        assert_eq!(doc.attr(input, "id").unwrap().as_deref(), Some("q"));
        assert_eq!(doc.attr(input, "value").unwrap().as_deref(), Some("5"));
        assert_eq!(doc.attr(input, "disabled").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_nesting_void_and_self_closing() {
        let mut doc = Document::new();
        let roots = parse_fragment(&mut doc, "<div><br><img src=x/><p>deep</p></div>").unwrap();
        assert_eq!(roots.len(), 1);
        let div = roots[0];
        let kids = doc.children_of(div).unwrap().to_vec();
        assert_eq!(kids.len(), 3);
        assert_eq!(doc.get(kids[0]).unwrap().tag(), Some("br"));
        assert_eq!(doc.get(kids[1]).unwrap().tag(), Some("img"));
        assert_eq!(doc.text_content(kids[2]).unwrap(), "deep");
    }

    #[test]
    fn test_style_attribute_folds_into_style_list() {
        let mut doc = Document::new();
        let roots = parse_fragment(&mut doc, r#"<p style="display: none">x</p>"#).unwrap();
        assert_eq!(
            doc.style_prop(roots[0], "display").unwrap().as_deref(),
            Some("none")
        );
    }

    #[test]
    fn test_entities_decode() {
        let mut doc = Document::new();
        let roots = parse_fragment(&mut doc, "<p title=\"a &amp;&quot;b&quot;\">1 &lt; 2 &amp;c</p>").unwrap();
        assert_eq!(doc.text_content(roots[0]).unwrap(), "1 < 2 &c");
        assert_eq!(
            doc.attr(roots[0], "title").unwrap().as_deref(),
            Some("a &\"b\"")
        );
        assert_eq!(decode_entities("&unknown; &"), "&unknown; &");
    }

    #[test]
    fn test_comments_and_config() {
        let mut doc = Document::new();
        let roots = parse_fragment(&mut doc, "<!-- note --><p>x</p>").unwrap();
        assert_eq!(roots.len(), 2);
        assert!(matches!(
            doc.get(roots[0]).unwrap().data,
            NodeData::Comment(ref c) if c == " note "
        ));

        let cfg = ParserConfig {
            keep_comments: false,
            ..Default::default()
        };
        let roots = parse_fragment_with(&mut doc, "<!-- note --><p>x</p>", &cfg).unwrap();
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_unmatched_close_ignored_and_implicit_close() {
        let mut doc = Document::new();
        let roots = parse_fragment(&mut doc, "</b><div><p>open").unwrap();
        assert_eq!(roots.len(), 1);
        let div = roots[0];
        assert_eq!(doc.get(div).unwrap().tag(), Some("div"));
        assert_eq!(doc.text_content(div).unwrap(), "open");
    }

    #[test]
    fn test_stray_lt_is_text() {
        let mut doc = Document::new();
        let roots = parse_fragment(&mut doc, "a < b").unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(doc.get(roots[0]).unwrap().as_text(), Some("a < b"));
    }

    #[test]
    fn test_structural_errors() {
        let mut doc = Document::new();
        assert!(matches!(
            parse_fragment(&mut doc, "<div"),
            Err(DomError::MarkupParse { .. })
        ));
        assert!(matches!(
            parse_fragment(&mut doc, "<!-- never closed"),
            Err(DomError::MarkupParse { .. })
        ));
        assert!(matches!(
            parse_fragment(&mut doc, "<p title=\"x>"),
            Err(DomError::MarkupParse { .. })
        ));
    }

    #[test]
    fn test_depth_guard() {
        let mut doc = Document::new();
        let cfg = ParserConfig {
            max_depth: 3,
            ..Default::default()
        };
        assert!(parse_fragment_with(&mut doc, "<a><a><a></a></a></a>", &cfg).is_ok());
        assert!(matches!(
            parse_fragment_with(&mut doc, "<a><a><a><a></a></a></a></a>", &cfg),
            Err(DomError::MaxDepthExceeded { current: 4, max: 3 })
        ));
    }
}
