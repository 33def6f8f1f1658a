use log::warn;
use tabula_model::{Cell, CellPatch, Document, Node, NodePath};

use crate::commands::{cell_context, collapsed_selected_cell, remove_whole_table, TableCommand};
use crate::session::Session;

/// Delete the acting cell's row.
///
/// A single-row table is removed outright. Vertically merged cells crossing
/// the row shrink by one row; a merged origin that lives in the deleted row
/// is re-created in the next row with its content, style and remaining span.
pub struct DeleteRow;

impl TableCommand for DeleteRow {
    fn name(&self) -> &'static str {
        "delete-row"
    }

    fn is_disabled(&self, session: &Session) -> bool {
        collapsed_selected_cell(session).is_none()
    }

    fn execute(&self, session: &mut Session) {
        if self.is_disabled(session) {
            return;
        }
        let Some(ctx) = cell_context(session) else {
            return;
        };
        let Some(table) = session.document().table(&ctx.table_path) else {
            return;
        };
        if table.rows.len() <= 1 {
            remove_whole_table(session, &ctx.table_path, "delete-row");
            return;
        }
        let Some(coord) = ctx.matrix.position_of(&ctx.cell_path) else {
            warn!(
                "delete-row: cell {} owns no slot in its own grid",
                ctx.cell_path
            );
            return;
        };
        let tr = coord.x;
        let has_next_row = tr + 1 < ctx.matrix.row_count();

        session.document_mut().without_normalizing(|doc| {
            // Replacement cells for merged origins that die with the row,
            // keyed by grid column.
            let mut replacements: Vec<(usize, Cell)> = Vec::new();

            for (y, slot) in ctx.matrix.row(tr).iter().enumerate() {
                let Some(slot) = slot else { continue };
                if slot.ctx.ttb == 1 && slot.ctx.btt == 1 {
                    // No vertical span; the slot simply dies with the row.
                    continue;
                }
                let origin_x = tr.saturating_sub(slot.ctx.ttb as usize - 1);
                if ctx.matrix.slot(origin_x, y).is_none() {
                    warn!("delete-row: no origin slot above covered slot ({tr}, {y})");
                    continue;
                }

                // The slot carries the origin's attributes, so the shrunk
                // span is computed from a snapshot; writing it once per
                // covered slot stays idempotent.
                let shrunk = slot.row_span.saturating_sub(1).max(1);
                if slot.hidden {
                    set_row_span(doc, &slot.path, shrunk);
                } else if slot.ctx.is_origin() {
                    // The origin itself sits in the deleted row.
                    if has_next_row && slot.row_span > 1 {
                        let Some(origin_cell) = doc.cell(&slot.path) else {
                            warn!("delete-row: origin cell {} vanished", slot.path);
                            continue;
                        };
                        let mut replacement = origin_cell.clone();
                        replacement.row_span = slot.row_span - 1;
                        replacement.hidden = false;
                        replacements.push((y, replacement));
                    } else {
                        set_row_span(doc, &slot.path, shrunk);
                    }
                } else {
                    set_row_span(doc, &slot.path, shrunk);
                }
            }

            if doc.remove_node(&ctx.row_path).is_err() {
                warn!("delete-row: row {} already gone", ctx.row_path);
                return;
            }

            // The former next row now sits at the deleted row's path; insert
            // the replacements into it in ascending column order, clamping to
            // the row end when the tree offsets have drifted.
            replacements.sort_by_key(|(column, _)| *column);
            for (column, cell) in replacements {
                let row_len = doc.row(&ctx.row_path).map_or(0, |row| row.cells.len());
                let at = ctx.row_path.child(column.min(row_len));
                if let Err(err) = doc.insert_node(&at, Node::Cell(cell)) {
                    warn!("delete-row: failed to restore merged cell at {at}: {err}");
                }
            }
        });
    }
}

fn set_row_span(doc: &mut Document, path: &NodePath, value: u32) {
    if let Err(err) = doc.set_cell_attrs(path, &CellPatch::row_span(value)) {
        warn!("delete-row: failed to set row span on {path}: {err}");
    }
}
