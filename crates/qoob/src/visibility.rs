//! Visibility helpers over the inline `display` property.

use crate::query::{each_mut, Selector};
use dom::{Document, NodeId, Result};

const STATE_ATTR: &str = "data-toggler-state";

/// Hide every matched element (inline `display: none`).
pub fn hide(doc: &mut Document, selector: &Selector) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| {
        doc.set_style_prop(id, "display", "none")
    })
}

/// Show every matched element. `display` defaults to `block`.
pub fn show(doc: &mut Document, selector: &Selector, display: Option<&str>) -> Result<()> {
    let display = display.unwrap_or("block");
    each_mut(doc, selector, |doc, id, _| {
        doc.set_style_prop(id, "display", display)
    })
}

/// Toggle visibility per element: an element whose inline display is
/// `none` is shown with the preferred display, any other is hidden. Only
/// the inline style is consulted.
pub fn toggle(doc: &mut Document, selector: &Selector, display: Option<&str>) -> Result<()> {
    let display = display.unwrap_or("block");
    each_mut(doc, selector, |doc, id, _| {
        let hidden = doc.style_prop(id, "display")?.as_deref() == Some("none");
        doc.set_style_prop(id, "display", if hidden { display } else { "none" })
    })
}

/// Two-state helper driven by a `data-toggler-state` attribute. Per
/// element: the state (default `off`) picks which action runs; unless the
/// action returns `Ok(true)` (a veto), the stored state then flips.
pub fn toggler<FOn, FOff>(
    doc: &mut Document,
    selector: &Selector,
    mut on_action: FOn,
    mut off_action: FOff,
) -> Result<()>
where
    FOn: FnMut(&mut Document, NodeId) -> Result<bool>,
    FOff: FnMut(&mut Document, NodeId) -> Result<bool>,
{
    each_mut(doc, selector, |doc, id, _| {
        let state = doc.attr(id, STATE_ATTR)?.unwrap_or_else(|| "off".to_string());
        if state == "off" {
            if !on_action(doc, id)? {
                doc.set_attr(id, STATE_ATTR, "on")?;
            }
        } else if !off_action(doc, id)? {
            doc.set_attr(id, STATE_ATTR, "off")?;
        }
        Ok(())
    })
}
