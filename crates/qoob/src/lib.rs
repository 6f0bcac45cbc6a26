//! qoob — bulk DOM operations over polymorphic selectors.
//!
//! A flat set of free functions that accept a [`Selector`] (a query
//! expression, a single node handle, or a sequence of handles) and apply an
//! operation across every matched element: querying, attribute/class/
//! content get-or-set, event binding, tree traversal, visibility toggling.
//!
//! Every operation is two steps deep:
//!
//! 1. [`find`] normalizes the selector into one ordered sequence of node
//!    handles, or the Absent marker (`Selector::None` in, `None` out).
//! 2. The `each` dispatchers apply a per-element action over that sequence,
//!    in order, aborting on the first action error.
//!
//! Get-mode accessors return one entry per matched element, positionally
//! aligned with the normalized sequence, with missing data as `None`
//! placeholders. Set-mode accessors write every matched element.
//!
//! The whole surface is re-exported here; `use qoob::*` (or the `qoob::`
//! prefix) is the single namespace.

pub mod attrs;
pub mod classes;
pub mod content;
pub mod events;
pub mod query;
pub mod tree;
pub mod utils;
pub mod visibility;

pub use attrs::{
    attr, css, data, dataset, remove_attr, set_attr, set_data, set_val, state, style, val,
};
pub use classes::{add_class, add_classes, has_class, remove_class, remove_classes};
pub use content::{html, set_html, set_text, text};
pub use events::{off, off_all, on, ready, trigger};
pub use query::{each, each_mut, find, first, is, try_each, uniques, Selector};
pub use tree::{ancestor, append, children, clone, make, parent, prepend, remove, siblings};
pub use utils::camelize;
pub use visibility::{hide, show, toggle, toggler};

pub use dom::{
    inner_markup, outer_markup, outline, Document, DomError, Event, ListenerId, NodeId,
    OutlineConfig, ReadyState, Result,
};
