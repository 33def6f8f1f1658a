use std::collections::BTreeSet;

use log::warn;
use tabula_model::{CellPatch, NodePath, TablePatch};

use crate::commands::{cell_context, collapsed_selected_cell, remove_whole_table, TableCommand};
use crate::session::Session;

/// Delete the acting cell's grid column.
///
/// A single-column table is removed outright. Merged cells crossing the
/// column shrink by one column; unspanned cells in the column are deleted
/// back-to-front so earlier removals cannot shift later targets.
pub struct DeleteColumn;

impl TableCommand for DeleteColumn {
    fn name(&self) -> &'static str {
        "delete-column"
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
        if ctx.matrix.column_count() <= 1 {
            remove_whole_table(session, &ctx.table_path, "delete-column");
            return;
        }
        let Some(coord) = ctx.matrix.position_of(&ctx.cell_path) else {
            warn!(
                "delete-column: cell {} owns no slot in its own grid",
                ctx.cell_path
            );
            return;
        };
        let k = coord.y;
        let Some(table) = session.document().table(&ctx.table_path) else {
            return;
        };
        let mut widths = table.column_widths.clone();

        session.document_mut().without_normalizing(|doc| {
            let mut processed: BTreeSet<NodePath> = BTreeSet::new();
            let mut doomed: Vec<NodePath> = Vec::new();

            for x in 0..ctx.matrix.row_count() {
                let Some(slot) = ctx.matrix.slot(x, k) else { continue };
                if slot.ctx.in_merge() {
                    let Some((_, origin_slot)) = ctx.matrix.origin_of(x, k) else {
                        warn!("delete-column: no origin slot for covered slot ({x}, {k})");
                        continue;
                    };
                    if processed.insert(origin_slot.path.clone()) {
                        let narrowed = origin_slot.col_span.saturating_sub(1).max(1);
                        if let Err(err) = doc
                            .set_cell_attrs(&origin_slot.path, &CellPatch::col_span(narrowed))
                        {
                            warn!(
                                "delete-column: failed to narrow {}: {err}",
                                origin_slot.path
                            );
                        }
                    }
                } else {
                    doomed.push(slot.path.clone());
                }
            }

            // Descending path order: removing a later sibling first keeps the
            // earlier paths valid.
            doomed.sort_by(|a, b| b.cmp(a));
            for path in doomed {
                if !doc.contains(&path) {
                    warn!("delete-column: cell {path} already gone");
                    continue;
                }
                if let Err(err) = doc.remove_node(&path) {
                    warn!("delete-column: failed to remove {path}: {err}");
                }
            }

            if k < widths.len() {
                widths.remove(k);
                if let Err(err) = doc.set_table_attrs(&ctx.table_path, &TablePatch::widths(widths))
                {
                    warn!("delete-column: failed to update column widths: {err}");
                }
            }
        });
    }
}
