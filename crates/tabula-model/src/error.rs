use thiserror::Error;

use crate::{NodeKind, NodePath};

/// Errors from the document tree primitives.
///
/// Callers that batch per-cell edits treat [`TreeError::StalePath`] as a
/// skip-and-continue signal: a concurrent step of the same batch already
/// removed or moved the target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The path does not address an existing node.
    #[error("no node at {0}")]
    StalePath(NodePath),

    /// The node kind cannot live under this parent.
    #[error("{child} cannot be a child of {parent}")]
    InvalidChild { parent: NodeKind, child: NodeKind },

    /// Insertion index past the end of the parent's children.
    #[error("index {index} out of bounds in {parent} (len {len})")]
    IndexOutOfBounds {
        parent: NodePath,
        index: usize,
        len: usize,
    },

    /// Content can only be moved between two distinct cells.
    #[error("cannot move content from {from} to {to}")]
    IncompatibleMove { from: NodePath, to: NodePath },
}
