//! Attribute, value, data-attribute and inline-style accessors.
//!
//! All get-mode operations return `Ok(None)` for the Absent selector and
//! otherwise one entry per matched element in dispatch order, with missing
//! data as `None` placeholders — the output is always positionally aligned
//! with the normalized target sequence, never shortened.

use crate::query::{each_mut, find, try_each, Selector};
use crate::utils::camelize;
use dom::{Document, Result};
use std::collections::HashMap;

/// Get the named attribute for every matched element.
pub fn attr(doc: &Document, selector: &Selector, name: &str) -> Result<Option<Vec<Option<String>>>> {
    let Some(ids) = find(doc, selector)? else {
        return Ok(None);
    };
    let mut values = Vec::with_capacity(ids.len());
    for id in ids {
        values.push(doc.attr(id, name)?);
    }
    Ok(Some(values))
}

/// Set the named attribute on every matched element.
pub fn set_attr(doc: &mut Document, selector: &Selector, name: &str, value: &str) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| doc.set_attr(id, name, value))
}

/// Remove the named attribute from every matched element.
pub fn remove_attr(doc: &mut Document, selector: &Selector, name: &str) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| doc.remove_attr(id, name))
}

/// Set a presence-style flag attribute to a value equal to its own name,
/// e.g. `state(doc, &sel, "disabled")` writes `disabled="disabled"`.
pub fn state(doc: &mut Document, selector: &Selector, name: &str) -> Result<()> {
    set_attr(doc, selector, name, name)
}

/// Get the form value for every matched element.
pub fn val(doc: &Document, selector: &Selector) -> Result<Option<Vec<Option<String>>>> {
    attr(doc, selector, "value")
}

/// Set the form value on every matched element.
pub fn set_val(doc: &mut Document, selector: &Selector, value: &str) -> Result<()> {
    set_attr(doc, selector, "value", value)
}

/// Get the custom data attribute `data-{name}` for every matched element.
pub fn data(doc: &Document, selector: &Selector, name: &str) -> Result<Option<Vec<Option<String>>>> {
    attr(doc, selector, &format!("data-{}", name))
}

/// Set the custom data attribute `data-{name}` on every matched element.
pub fn set_data(doc: &mut Document, selector: &Selector, name: &str, value: &str) -> Result<()> {
    set_attr(doc, selector, &format!("data-{}", name), value)
}

/// Each matched element's full `data-*` map, keyed camel-case the way the
/// storage layer exposes it (`data-user-id` → `userId`).
pub fn dataset(
    doc: &Document,
    selector: &Selector,
) -> Result<Option<Vec<HashMap<String, String>>>> {
    let Some(ids) = find(doc, selector)? else {
        return Ok(None);
    };
    let mut maps = Vec::with_capacity(ids.len());
    for id in ids {
        let mut map = HashMap::new();
        for (name, value) in doc.attributes(id)? {
            if let Some(rest) = name.strip_prefix("data-") {
                map.insert(camelize(rest), value.clone());
            }
        }
        maps.push(map);
    }
    Ok(Some(maps))
}

/// Apply a property→value mapping to every matched element's inline style
/// in one pass, in the order given.
pub fn css(doc: &mut Document, selector: &Selector, properties: &[(&str, &str)]) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| {
        for (name, value) in properties {
            doc.set_style_prop(id, name, value)?;
        }
        Ok(())
    })
}

/// Get one inline style property for every matched element.
pub fn style(doc: &Document, selector: &Selector, name: &str) -> Result<Option<Vec<Option<String>>>> {
    let Some(ids) = find(doc, selector)? else {
        return Ok(None);
    };
    let mut values = Vec::with_capacity(ids.len());
    try_each(doc, &Selector::Many(ids), |id, _| {
        values.push(doc.style_prop(id, name)?);
        Ok(())
    })?;
    Ok(Some(values))
}
