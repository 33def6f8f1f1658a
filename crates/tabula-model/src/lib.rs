//! `tabula-model` defines the core in-memory document tree for table editing.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the table engine (grid projection, selection resolution, structural edits)
//! - host editor shells that own selection and rendering
//! - IPC boundaries via `serde` (JSON-safe schema)
//!
//! Nothing here knows about grids or selections: this crate owns the tree
//! (tables, rows, cells, content blocks), path addressing, and the atomic
//! transforms with their deferred-normalization scopes.

mod address;
mod document;
mod error;
mod node;
mod serde_defaults;

pub use address::{NodePath, Position, Range};
pub use document::{Descendants, Document};
pub use error::TreeError;
pub use node::{
    Block, Cell, CellPatch, CellStyle, Node, NodeKind, NodeRef, Row, Table, TablePatch, TextAlign,
    WidthMode, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT,
};
