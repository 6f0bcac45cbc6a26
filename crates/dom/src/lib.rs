//! In-memory document tree.
//!
//! The substrate the `qoob` operations run on: an arena-allocated node tree
//! addressed by `NodeId` handles, with a small selector engine, a markup
//! fragment parser and renderer, a JSON document loader, and per-node event
//! listeners. Fully synchronous; the only shared mutable resource is the
//! document itself.

pub mod arena;
pub mod error;
pub mod events;
pub mod load;
pub mod parser;
pub mod render;
pub mod selector;
pub mod types;
pub mod utils;

pub use arena::Document;
pub use error::{DomError, Result};
pub use events::{Event, ListenerId, ReadyState, SharedCallback};
pub use parser::{parse_fragment, parse_fragment_with, ParserConfig};
pub use render::{inner_markup, outer_markup, outline, OutlineConfig};
pub use selector::SelectorList;
pub use types::{ElementData, Node, NodeData, NodeId};
