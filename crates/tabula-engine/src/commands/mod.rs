//! Structural table commands.
//!
//! Every command follows the same two-phase contract: `is_disabled` answers
//! the cheap menu-state query, `execute` re-checks it, gathers a read-only
//! plan (paths, grid coordinates, width snapshots), and applies the plan
//! inside one deferred-normalization scope. Sub-steps that hit a stale path
//! or a grid hole are logged and skipped; no error reaches the host.

mod delete_column;
mod delete_row;
mod delete_table;
mod insert_column;
mod insert_row;
mod insert_table;
mod merge_cells;
mod split_cell;
mod stretch_columns;

pub use delete_column::DeleteColumn;
pub use delete_row::DeleteRow;
pub use delete_table::DeleteTable;
pub use insert_column::InsertColumn;
pub use insert_row::InsertRow;
pub use insert_table::InsertTable;
pub use merge_cells::MergeCells;
pub use split_cell::SplitCell;
pub use stretch_columns::StretchColumns;

use log::warn;
use tabula_model::{Cell, NodePath};

use crate::grid::FilledMatrix;
use crate::selection::enclosing_table_path;
use crate::session::Session;

/// A structural table edit triggered from a menu or shortcut.
pub trait TableCommand {
    /// Stable verb used in diagnostics.
    fn name(&self) -> &'static str;

    /// Menu-state query: true when the command must not run right now.
    fn is_disabled(&self, session: &Session) -> bool;

    /// Run the edit. Disabled commands are silent no-ops.
    fn execute(&self, session: &mut Session);
}

/// The acting cell for commands that require a collapsed range inside a cell.
pub(crate) fn collapsed_selected_cell(session: &Session) -> Option<(NodePath, &Cell)> {
    let range = session.range()?;
    if !range.is_collapsed() {
        return None;
    }
    session.selected_cell()
}

/// Everything a cell-anchored command reads before mutating.
pub(crate) struct CellContext {
    pub cell_path: NodePath,
    pub row_path: NodePath,
    pub table_path: NodePath,
    pub matrix: FilledMatrix,
}

/// Gather the acting cell's paths and a fresh grid for a collapsed range.
pub(crate) fn cell_context(session: &Session) -> Option<CellContext> {
    let (cell_path, _) = collapsed_selected_cell(session)?;
    let row_path = cell_path.parent()?;
    let table_path = enclosing_table_path(session.document(), &cell_path)?;
    let table = session.document().table(&table_path)?;
    let matrix = FilledMatrix::build(&table_path, table);
    Some(CellContext {
        cell_path,
        row_path,
        table_path,
        matrix,
    })
}

/// Remove a whole table (the single-row / single-column degenerate cases and
/// the delete-table command) and drop the session's selection state, whose
/// paths all pointed into it.
pub(crate) fn remove_whole_table(session: &mut Session, table_path: &NodePath, op: &str) {
    if session.document_mut().remove_node(table_path).is_err() {
        warn!("{op}: table {table_path} disappeared before removal");
    }
    session.clear_range();
}
