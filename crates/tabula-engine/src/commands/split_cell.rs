use log::warn;
use tabula_model::{Cell, CellPatch, Node};

use crate::commands::TableCommand;
use crate::session::Session;

/// Split the acting merged cell back into unit cells.
///
/// The origin keeps its content and shrinks to 1x1. Empty cells fill the rest
/// of the region: right after the origin in its own row, and at the same tree
/// offsets in each lower row, clamped to the row end when prior edits have
/// desynchronized row lengths.
pub struct SplitCell;

impl TableCommand for SplitCell {
    fn name(&self) -> &'static str {
        "split-cell"
    }

    fn is_disabled(&self, session: &Session) -> bool {
        // A cross-cell selection has no single cell to split.
        if session.table_selection().is_some() {
            return true;
        }
        let Some((_, cell)) = session.selected_cell() else {
            return true;
        };
        !cell.is_spanned()
    }

    fn execute(&self, session: &mut Session) {
        if self.is_disabled(session) {
            return;
        }
        let Some((cell_path, cell)) = session.selected_cell() else {
            return;
        };
        let row_span = cell.row_span.max(1) as usize;
        let col_span = cell.col_span.max(1) as usize;
        let Some(row_path) = cell_path.parent() else {
            return;
        };
        let Some(table_path) = row_path.parent() else {
            return;
        };
        let (Some(cell_index), Some(row_index)) = (cell_path.last(), row_path.last()) else {
            return;
        };
        let has_header = session
            .document()
            .table(&table_path)
            .is_some_and(|table| table.has_header_row());

        session.document_mut().without_normalizing(|doc| {
            if let Err(err) = doc.set_cell_attrs(&cell_path, &CellPatch::spans(1, 1)) {
                warn!("split-cell: failed to reset spans on {cell_path}: {err}");
                return;
            }

            // Fill out the origin's own row.
            for c in 1..col_span {
                let mut new_cell = Cell::empty();
                if row_index == 0 && has_header {
                    new_cell.is_header = true;
                }
                let at = row_path.child(cell_index + c);
                if let Err(err) = doc.insert_node(&at, Node::Cell(new_cell)) {
                    warn!("split-cell: failed to insert cell at {at}: {err}");
                }
            }

            // Fill the lower rows of the region.
            for r in 1..row_span {
                let target_row = table_path.child(row_index + r);
                if doc.row(&target_row).is_none() {
                    warn!("split-cell: missing row {target_row}");
                    continue;
                }
                for c in 0..col_span {
                    let row_len = doc.row(&target_row).map_or(0, |row| row.cells.len());
                    let at = target_row.child((cell_index + c).min(row_len));
                    if let Err(err) = doc.insert_node(&at, Node::Cell(Cell::empty())) {
                        warn!("split-cell: failed to insert cell at {at}: {err}");
                    }
                }
            }
        });
    }
}
