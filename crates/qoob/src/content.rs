//! Markup and text content accessors.

use crate::query::{each_mut, find, Selector};
use dom::{inner_markup, parse_fragment, Document, Result};

/// Get each matched element's inner markup.
pub fn html(doc: &Document, selector: &Selector) -> Result<Option<Vec<String>>> {
    let Some(ids) = find(doc, selector)? else {
        return Ok(None);
    };
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        out.push(inner_markup(doc, id)?);
    }
    Ok(Some(out))
}

/// Replace each matched element's children with the parsed markup. The
/// fragment is parsed per element so every target gets its own copy.
pub fn set_html(doc: &mut Document, selector: &Selector, markup: &str) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| {
        doc.clear_children(id)?;
        let roots = parse_fragment(doc, markup)?;
        for root in roots {
            doc.append(id, root)?;
        }
        Ok(())
    })
}

/// Get each matched element's text content (concatenated descendant text).
pub fn text(doc: &Document, selector: &Selector) -> Result<Option<Vec<String>>> {
    let Some(ids) = find(doc, selector)? else {
        return Ok(None);
    };
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        out.push(doc.text_content(id)?);
    }
    Ok(Some(out))
}

/// Replace each matched element's children with a single text node.
pub fn set_text(doc: &mut Document, selector: &Selector, value: &str) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| {
        doc.clear_children(id)?;
        let node = doc.create_text(value);
        doc.append(id, node)
    })
}
