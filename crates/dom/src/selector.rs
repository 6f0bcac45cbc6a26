//! A small CSS selector engine.
//!
//! Supports comma-separated groups of compound selectors joined by
//! descendant (whitespace) and child (`>`) combinators. A compound is any
//! run of simple selectors over one element: `*`, `tag`, `#id`, `.class`,
//! `[attr]`, `[attr=value]`. No cascade, no specificity, no pseudo-classes.
//!
//! Matching is right-to-left: the rightmost compound must match the
//! candidate element, then the remaining compounds are matched against its
//! ancestor chain.

use crate::error::{DomError, Result};
use crate::{Document, NodeId};

/// A parsed selector: one or more alternatives ("groups").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    groups: Vec<ComplexSelector>,
}

/// Compounds joined by combinators. `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    simples: Vec<Simple>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

impl SelectorList {
    /// Parse a selector expression. Malformed input is an error the caller
    /// sees unmodified; there is no partial recovery.
    pub fn parse(input: &str) -> Result<SelectorList> {
        let mut groups = Vec::new();
        for part in split_top_level_commas(input) {
            let part = part.trim();
            if part.is_empty() {
                return Err(parse_error(input, "empty selector group"));
            }
            groups.push(parse_complex(input, part)?);
        }
        if groups.is_empty() {
            return Err(parse_error(input, "empty selector"));
        }
        Ok(SelectorList { groups })
    }

    /// Whether `node` is an element matching any group.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let is_element = doc.get(node).map(|n| n.is_element()).unwrap_or(false);
        if !is_element {
            return false;
        }
        self.groups
            .iter()
            .any(|cx| matches_at(doc, cx, cx.compounds.len() - 1, node))
    }
}

impl Document {
    /// All elements matching the selector, in document order.
    pub fn query(&self, selectors: &SelectorList) -> Vec<NodeId> {
        let mut hits = Vec::new();
        let _ = self.traverse_df(self.root_id(), |id, node| {
            if node.is_element() && selectors.matches(self, id) {
                hits.push(id);
            }
            Ok(())
        });
        tracing::trace!("query matched {} elements", hits.len());
        hits
    }

    /// Whether one node matches the selector.
    pub fn matches(&self, node: NodeId, selectors: &SelectorList) -> bool {
        selectors.matches(self, node)
    }
}

fn parse_error(input: &str, reason: impl Into<String>) -> DomError {
    DomError::SelectorParse {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Split on commas that are not inside an attribute bracket.
fn split_top_level_commas(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_complex(input: &str, group: &str) -> Result<ComplexSelector> {
    let chars: Vec<char> = group.chars().collect();
    let mut i = 0usize;
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();

    while i < chars.len() {
        let mut saw_ws = false;
        while i < chars.len() && chars[i].is_whitespace() {
            saw_ws = true;
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        if !compounds.is_empty() {
            if chars[i] == '>' {
                combinators.push(Combinator::Child);
                i += 1;
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(parse_error(input, "dangling combinator"));
                }
            } else if saw_ws {
                combinators.push(Combinator::Descendant);
            } else {
                return Err(parse_error(
                    input,
                    format!("unexpected character {:?}", chars[i]),
                ));
            }
        } else if chars[i] == '>' {
            return Err(parse_error(input, "combinator with no left-hand side"));
        }

        let (compound, next) = parse_compound(input, &chars, i)?;
        compounds.push(compound);
        i = next;
    }

    if compounds.is_empty() {
        return Err(parse_error(input, "empty selector group"));
    }
    Ok(ComplexSelector {
        compounds,
        combinators,
    })
}

fn parse_compound(input: &str, chars: &[char], mut i: usize) -> Result<(Compound, usize)> {
    let mut simples = Vec::new();

    while i < chars.len() {
        match chars[i] {
            '*' => {
                simples.push(Simple::Universal);
                i += 1;
            }
            '#' => {
                let (ident, next) = parse_ident(chars, i + 1);
                if ident.is_empty() {
                    return Err(parse_error(input, "empty id selector"));
                }
                simples.push(Simple::Id(ident));
                i = next;
            }
            '.' => {
                let (ident, next) = parse_ident(chars, i + 1);
                if ident.is_empty() {
                    return Err(parse_error(input, "empty class selector"));
                }
                simples.push(Simple::Class(ident));
                i = next;
            }
            '[' => {
                let (simple, next) = parse_attr_selector(input, chars, i + 1)?;
                simples.push(simple);
                i = next;
            }
            c if is_ident_start(c) => {
                let (ident, next) = parse_ident(chars, i);
                simples.push(Simple::Type(ident.to_ascii_lowercase()));
                i = next;
            }
            c if c.is_whitespace() || c == '>' => break,
            c => {
                return Err(parse_error(input, format!("unexpected character {:?}", c)));
            }
        }
    }

    if simples.is_empty() {
        return Err(parse_error(input, "expected a selector"));
    }
    Ok((Compound { simples }, i))
}

fn parse_ident(chars: &[char], mut i: usize) -> (String, usize) {
    let start = i;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

fn parse_attr_selector(input: &str, chars: &[char], mut i: usize) -> Result<(Simple, usize)> {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    let (name, next) = parse_ident(chars, i);
    if name.is_empty() {
        return Err(parse_error(input, "empty attribute name"));
    }
    i = next;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    match chars.get(i) {
        Some(&']') => Ok((
            Simple::Attr {
                name: name.to_ascii_lowercase(),
                value: None,
            },
            i + 1,
        )),
        Some(&'=') => {
            i += 1;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            let value;
            match chars.get(i) {
                Some(&q) if q == '"' || q == '\'' => {
                    i += 1;
                    let start = i;
                    while i < chars.len() && chars[i] != q {
                        i += 1;
                    }
                    if i >= chars.len() {
                        return Err(parse_error(input, "unterminated attribute value"));
                    }
                    value = chars[start..i].iter().collect::<String>();
                    i += 1;
                }
                Some(_) => {
                    let start = i;
                    while i < chars.len() && chars[i] != ']' && !chars[i].is_whitespace() {
                        i += 1;
                    }
                    value = chars[start..i].iter().collect::<String>();
                    if value.is_empty() {
                        return Err(parse_error(input, "empty attribute value"));
                    }
                }
                None => return Err(parse_error(input, "unterminated attribute selector")),
            }
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            if chars.get(i) != Some(&']') {
                return Err(parse_error(input, "unterminated attribute selector"));
            }
            Ok((
                Simple::Attr {
                    name: name.to_ascii_lowercase(),
                    value: Some(value),
                },
                i + 1,
            ))
        }
        _ => Err(parse_error(input, "unterminated attribute selector")),
    }
}

/// The element parent of a node, if any (stops at the document node).
fn element_parent(doc: &Document, node: NodeId) -> Option<NodeId> {
    let parent = doc.get(node).ok()?.parent_id?;
    doc.get(parent).ok()?.is_element().then_some(parent)
}

fn matches_at(doc: &Document, cx: &ComplexSelector, idx: usize, node: NodeId) -> bool {
    if !compound_matches(doc, node, &cx.compounds[idx]) {
        return false;
    }
    if idx == 0 {
        return true;
    }
    match cx.combinators[idx - 1] {
        Combinator::Child => match element_parent(doc, node) {
            Some(p) => matches_at(doc, cx, idx - 1, p),
            None => false,
        },
        Combinator::Descendant => {
            let mut cur = element_parent(doc, node);
            while let Some(p) = cur {
                if matches_at(doc, cx, idx - 1, p) {
                    return true;
                }
                cur = element_parent(doc, p);
            }
            false
        }
    }
}

fn compound_matches(doc: &Document, node: NodeId, compound: &Compound) -> bool {
    let Ok(n) = doc.get(node) else {
        return false;
    };
    let Some(el) = n.as_element() else {
        return false;
    };
    compound.simples.iter().all(|simple| match simple {
        Simple::Universal => true,
        Simple::Type(t) => el.tag == *t,
        Simple::Id(want) => el.attr("id") == Some(want.as_str()),
        Simple::Class(want) => el.has_class(want),
        Simple::Attr { name, value: None } => el.attr(name).is_some(),
        Simple::Attr {
            name,
            value: Some(want),
        } => el.attr(name) == Some(want.as_str()),
    })
}
