//! Tree navigation and structural operations.

use crate::query::{each, each_mut, find, try_each, uniques, Selector};
use dom::{parse_fragment, Document, NodeId, Result, SelectorList};

/// For each matched descendant, the nearest ancestor that is a member of
/// the normalized ancestor pool. Membership is identity-based, not
/// selector-based: the parent chain is walked outward and the first
/// chain member that IS one of the pool nodes is recorded; reaching the
/// root without a hit records nothing for that descendant. The result is
/// de-duplicated by identity, first occurrence first.
pub fn ancestor(
    doc: &Document,
    selector: &Selector,
    ancestor_selector: &Selector,
) -> Result<Vec<NodeId>> {
    let pool = find(doc, ancestor_selector)?.unwrap_or_default();
    let mut list = Vec::new();
    each(doc, selector, |id, _| {
        let mut cur = doc.parent_of(id).ok().flatten();
        while let Some(node) = cur {
            if pool.contains(&node) {
                list.push(node);
                break;
            }
            cur = doc.parent_of(node).ok().flatten();
        }
    })?;
    Ok(uniques(list))
}

/// Each matched element's immediate parent, in dispatch order. Parentless
/// nodes contribute nothing; the document node counts as a parent.
pub fn parent(doc: &Document, selector: &Selector) -> Result<Vec<NodeId>> {
    let mut parents = Vec::new();
    try_each(doc, selector, |id, _| {
        if let Some(p) = doc.parent_of(id)? {
            parents.push(p);
        }
        Ok(())
    })?;
    Ok(parents)
}

/// Children of every matched element. Without a sub-selector: element
/// children only (text and comment nodes are excluded). With one: all
/// descendants matching it, in per-element document order.
pub fn children(
    doc: &Document,
    selector: &Selector,
    child_selector: Option<&str>,
) -> Result<Vec<NodeId>> {
    let sub = child_selector.map(SelectorList::parse).transpose()?;
    let mut out = Vec::new();
    try_each(doc, selector, |id, _| {
        match &sub {
            Some(sub) => {
                for node in doc.descendants(id)? {
                    if doc.matches(node, sub) {
                        out.push(node);
                    }
                }
            }
            None => out.extend(doc.element_children(id)?),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Every other element child of each matched element's parent, excluding
/// the element itself.
pub fn siblings(doc: &Document, selector: &Selector) -> Result<Vec<NodeId>> {
    let mut out = Vec::new();
    try_each(doc, selector, |id, _| {
        if let Some(p) = doc.parent_of(id)? {
            for sibling in doc.element_children(p)? {
                if sibling != id {
                    out.push(sibling);
                }
            }
        }
        Ok(())
    })?;
    Ok(out)
}

/// Move every matched child node to the end of each matched target, in
/// turn. Moving semantics: a child ends up inside the last target.
pub fn append(doc: &mut Document, targets: &Selector, children: &Selector) -> Result<()> {
    let kids = find(doc, children)?.unwrap_or_default();
    each_mut(doc, targets, |doc, target, _| {
        for &kid in &kids {
            doc.append(target, kid)?;
        }
        Ok(())
    })
}

/// Move every matched child node to the front of each matched target,
/// keeping the children's order.
pub fn prepend(doc: &mut Document, targets: &Selector, children: &Selector) -> Result<()> {
    let kids = find(doc, children)?.unwrap_or_default();
    each_mut(doc, targets, |doc, target, _| {
        for &kid in kids.iter().rev() {
            doc.prepend(target, kid)?;
        }
        Ok(())
    })
}

/// Detach every matched element from its parent.
pub fn remove(doc: &mut Document, selector: &Selector) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| doc.detach(id))
}

/// Create a new element of the given type, optionally filled by parsing
/// `markup` as its children. The element is detached until appended.
pub fn make(doc: &mut Document, tag: &str, markup: Option<&str>) -> Result<NodeId> {
    let element = doc.create_element(tag);
    if let Some(markup) = markup {
        let roots = parse_fragment(doc, markup)?;
        for root in roots {
            doc.append(element, root)?;
        }
    }
    Ok(element)
}

/// Deep-copy every matched element, returning the detached copies in
/// dispatch order. Listeners are not copied.
pub fn clone(doc: &mut Document, selector: &Selector) -> Result<Vec<NodeId>> {
    let Some(ids) = find(doc, selector)? else {
        return Ok(Vec::new());
    };
    let mut copies = Vec::with_capacity(ids.len());
    for id in ids {
        copies.push(doc.clone_subtree(id)?);
    }
    Ok(copies)
}
