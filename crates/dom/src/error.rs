//! Error types for document operations
//!
//! Simple, flat error hierarchy. Operations above the substrate propagate
//! these unmodified; nothing wraps or re-throws with added context.

use crate::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Inserting node {node} under {parent} would create a cycle")]
    WouldCycle { node: NodeId, parent: NodeId },

    #[error("Invalid selector {input:?}: {reason}")]
    SelectorParse { input: String, reason: String },

    #[error("Malformed markup at byte {offset}: {reason}")]
    MarkupParse { reason: String, offset: usize },

    #[error("Maximum nesting depth exceeded: {current} > {max}")]
    MaxDepthExceeded { current: usize, max: usize },

    #[error("Invalid document tree: {0}")]
    InvalidTree(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
