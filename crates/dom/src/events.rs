//! Event listener registry and document readiness.
//!
//! Listeners attach to individual nodes and are invoked in registration
//! order when an event is dispatched at that node. A listener receives the
//! event value only — it has no handle back into the `Document`, so dispatch
//! never aliases the tree; state flows out through whatever the closure
//! captured.

use crate::error::Result;
use crate::{Document, NodeId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Listener identifier, unique within one document.
pub type ListenerId = u64;

/// An event delivered to listeners. `target` is the node the event was
/// fired at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub target: NodeId,
}

/// Document readiness, driven by [`Document::finish_loading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadyState {
    Loading,
    Complete,
}

/// A callback shared between every element it was bound to. Binding one
/// closure across a whole matched set means the set shares the closure's
/// captured state.
pub type SharedCallback = Rc<RefCell<dyn FnMut(&Event)>>;

pub(crate) struct ListenerEntry {
    id: ListenerId,
    event: String,
    callback: SharedCallback,
}

/// Per-node listener storage.
pub(crate) struct EventRegistry {
    next_id: ListenerId,
    by_node: AHashMap<NodeId, Vec<ListenerEntry>>,
}

impl EventRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            by_node: AHashMap::new(),
        }
    }
}

impl Document {
    /// Bind a callback to one node for a named event. Returns the listener's
    /// id, the handle [`remove_listener`](Document::remove_listener) takes.
    pub fn add_listener<F>(&mut self, node: NodeId, event: &str, callback: F) -> Result<ListenerId>
    where
        F: FnMut(&Event) + 'static,
    {
        self.add_shared_listener(node, event, Rc::new(RefCell::new(callback)))
    }

    /// Bind an already-shared callback. Bulk binding uses this to attach one
    /// closure to every matched element under distinct listener ids.
    pub fn add_shared_listener(
        &mut self,
        node: NodeId,
        event: &str,
        callback: SharedCallback,
    ) -> Result<ListenerId> {
        self.get(node)?;
        let id = self.listeners.next_id;
        self.listeners.next_id += 1;
        self.listeners.by_node.entry(node).or_default().push(ListenerEntry {
            id,
            event: event.to_string(),
            callback,
        });
        tracing::debug!("bound listener {} for {:?} on node {}", id, event, node);
        Ok(id)
    }

    /// Remove one listener by id. Returns whether anything was removed.
    pub fn remove_listener(&mut self, node: NodeId, event: &str, id: ListenerId) -> bool {
        let Some(entries) = self.listeners.by_node.get_mut(&node) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.event == event));
        before != entries.len()
    }

    /// Remove every listener for a named event on one node. Returns the
    /// number removed.
    pub fn remove_listeners(&mut self, node: NodeId, event: &str) -> usize {
        let Some(entries) = self.listeners.by_node.get_mut(&node) else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|e| e.event != event);
        before - entries.len()
    }

    /// Number of listeners bound to a node for a named event.
    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        self.listeners
            .by_node
            .get(&node)
            .map(|entries| entries.iter().filter(|e| e.event == event).count())
            .unwrap_or(0)
    }

    /// Fire a named event at one node, invoking its listeners in
    /// registration order. Returns the number invoked. Listeners added
    /// during dispatch run on the next dispatch, not this one.
    pub fn dispatch(&self, node: NodeId, event_name: &str) -> Result<usize> {
        self.get(node)?;
        let to_call: Vec<SharedCallback> = self
            .listeners
            .by_node
            .get(&node)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.event == event_name)
                    .map(|e| Rc::clone(&e.callback))
                    .collect()
            })
            .unwrap_or_default();

        let event = Event {
            name: event_name.to_string(),
            target: node,
        };
        for callback in &to_call {
            let mut f = callback.borrow_mut();
            (&mut *f)(&event);
        }
        tracing::trace!("dispatched {:?} at node {}: {} listeners", event_name, node, to_call.len());
        Ok(to_call.len())
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Run `callback` now if the document has finished loading, otherwise
    /// queue it for [`finish_loading`](Document::finish_loading). Fire-once;
    /// there is no way to cancel a queued callback.
    pub fn on_ready<F>(&mut self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        match self.ready_state {
            ReadyState::Complete => callback(),
            ReadyState::Loading => self.ready_queue.push(Box::new(callback)),
        }
    }

    /// Mark the document complete and drain queued ready callbacks in
    /// registration order. Subsequent calls are no-ops.
    pub fn finish_loading(&mut self) {
        if self.ready_state == ReadyState::Complete {
            return;
        }
        self.ready_state = ReadyState::Complete;
        let queued = std::mem::take(&mut self.ready_queue);
        tracing::debug!("document complete, running {} ready callbacks", queued.len());
        for callback in queued {
            callback();
        }
    }
}
