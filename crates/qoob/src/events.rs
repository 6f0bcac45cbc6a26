//! Event binding and dispatch over matched sets.

use crate::query::{each_mut, try_each, Selector};
use dom::{Document, Event, ListenerId, Result, SharedCallback};
use std::cell::RefCell;
use std::rc::Rc;

/// Bind a callback to every matched element for a named event. One closure
/// is shared across the whole set — captured state is common to all
/// bindings, and `Event::target` tells the callback which element fired.
/// Returns the listener ids in dispatch order, one per element; these are
/// the handles [`off`] takes.
pub fn on<F>(
    doc: &mut Document,
    selector: &Selector,
    event: &str,
    callback: F,
) -> Result<Vec<ListenerId>>
where
    F: FnMut(&Event) + 'static,
{
    let shared: SharedCallback = Rc::new(RefCell::new(callback));
    let mut ids = Vec::new();
    each_mut(doc, selector, |doc, id, _| {
        ids.push(doc.add_shared_listener(id, event, Rc::clone(&shared))?);
        Ok(())
    })?;
    Ok(ids)
}

/// Unbind one listener by id from every matched element. Returns how many
/// bindings were removed.
pub fn off(
    doc: &mut Document,
    selector: &Selector,
    event: &str,
    listener: ListenerId,
) -> Result<usize> {
    let mut removed = 0;
    each_mut(doc, selector, |doc, id, _| {
        if doc.remove_listener(id, event, listener) {
            removed += 1;
        }
        Ok(())
    })?;
    Ok(removed)
}

/// Unbind every listener for a named event from every matched element.
/// Returns how many bindings were removed.
pub fn off_all(doc: &mut Document, selector: &Selector, event: &str) -> Result<usize> {
    let mut removed = 0;
    each_mut(doc, selector, |doc, id, _| {
        removed += doc.remove_listeners(id, event);
        Ok(())
    })?;
    Ok(removed)
}

/// Fire a named event at every matched element, invoking each element's
/// listeners in registration order. Target-only: nothing bubbles. Returns
/// the total number of listener invocations.
pub fn trigger(doc: &Document, selector: &Selector, event: &str) -> Result<usize> {
    let mut fired = 0;
    try_each(doc, selector, |id, _| {
        fired += doc.dispatch(id, event)?;
        Ok(())
    })?;
    Ok(fired)
}

/// Run the callback once the document has finished loading: immediately if
/// it already has, otherwise when [`Document::finish_loading`] runs.
pub fn ready<F>(doc: &mut Document, callback: F)
where
    F: FnOnce() + 'static,
{
    doc.on_ready(callback)
}
