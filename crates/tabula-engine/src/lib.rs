//! `tabula-engine` projects document tables onto a grid and runs the
//! structural edits behind a table UI: selection resolution across merged
//! cells, row/column insertion and deletion, merging and splitting.
//!
//! The engine renders nothing and handles no pointer events. Hosts feed a
//! [`tabula_model::Range`] into [`Session::set_range`] on every selection
//! change and trigger [`commands`] against the session; each operation builds
//! its [`FilledMatrix`] fresh from the tree, so no grid state can go stale
//! between edits. Operations never fail outward: sub-steps that lose a race
//! with the tree are skipped with a `log` warning.

pub mod commands;
mod config;
mod grid;
mod selection;
mod session;

pub use commands::{
    DeleteColumn, DeleteRow, DeleteTable, InsertColumn, InsertRow, InsertTable, MergeCells,
    SplitCell, StretchColumns, TableCommand,
};
pub use config::TableConfig;
pub use grid::{FilledMatrix, GridCoord, GridSlot, SpanContext};
pub use selection::{enclosing_table_path, nearest_cell_path, TableSelection};
pub use session::Session;
