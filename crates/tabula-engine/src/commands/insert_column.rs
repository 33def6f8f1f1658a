use std::collections::BTreeSet;

use log::warn;
use tabula_model::{Cell, CellPatch, Node, NodePath, TablePatch};

use crate::commands::{cell_context, TableCommand};
use crate::session::Session;

/// Columns narrower than this cannot be split by an insert.
const MIN_SPLITTABLE_WIDTH: u32 = 20;

/// Insert a new column to the left of the acting cell's column.
///
/// Merged cells crossing the column are not cut: each grows by one column and
/// the rows it covers receive no new cell. The split column's width is halved
/// between the new column and the old one (floor to the new, remainder to the
/// old).
pub struct InsertColumn;

impl TableCommand for InsertColumn {
    fn name(&self) -> &'static str {
        "insert-column"
    }

    fn is_disabled(&self, session: &Session) -> bool {
        let Some(ctx) = cell_context(session) else {
            return true;
        };
        let Some(coord) = ctx.matrix.position_of(&ctx.cell_path) else {
            return true;
        };
        let Some(table) = session.document().table(&ctx.table_path) else {
            return true;
        };
        matches!(
            table.column_widths.get(coord.y),
            Some(&width) if width < MIN_SPLITTABLE_WIDTH
        )
    }

    fn execute(&self, session: &mut Session) {
        if self.is_disabled(session) {
            return;
        }
        let Some(ctx) = cell_context(session) else {
            return;
        };
        let Some(coord) = ctx.matrix.position_of(&ctx.cell_path) else {
            return;
        };
        let k = coord.y;
        let Some(table) = session.document().table(&ctx.table_path) else {
            return;
        };
        let has_header = table.has_header_row();
        let mut widths = table.column_widths.clone();
        let fallback_width = session.config().min_column_width;

        session.document_mut().without_normalizing(|doc| {
            let mut processed: BTreeSet<NodePath> = BTreeSet::new();
            let mut skip_rows: BTreeSet<usize> = BTreeSet::new();

            // Widen merged cells that cross column `k` and remember which rows
            // they cover.
            for x in 0..ctx.matrix.row_count() {
                let Some(slot) = ctx.matrix.slot(x, k) else { continue };
                if !slot.ctx.in_merge() {
                    continue;
                }
                let Some((origin, origin_slot)) = ctx.matrix.origin_of(x, k) else {
                    warn!("insert-column: no origin slot for covered slot ({x}, {k})");
                    continue;
                };
                if processed.insert(origin_slot.path.clone()) {
                    if !origin_slot.hidden {
                        if let Err(err) = doc.set_cell_attrs(
                            &origin_slot.path,
                            &CellPatch::col_span(origin_slot.col_span + 1),
                        ) {
                            warn!("insert-column: failed to widen {}: {err}", origin_slot.path);
                        }
                    }
                    for r in 0..origin_slot.row_span as usize {
                        skip_rows.insert(origin.x + r);
                    }
                } else {
                    skip_rows.insert(x);
                }
            }

            // One empty cell per uncovered row, inserted before the cell that
            // owns the slot at column `k`.
            for x in 0..ctx.matrix.row_count() {
                if skip_rows.contains(&x) {
                    continue;
                }
                let Some(slot) = ctx.matrix.slot(x, k) else { continue };
                let mut cell = Cell::empty();
                if x == 0 && has_header {
                    cell.is_header = true;
                }
                if let Err(err) = doc.insert_node(&slot.path, Node::Cell(cell)) {
                    warn!("insert-column: failed to insert cell at {}: {err}", slot.path);
                }
            }

            // Split column k's width: floor half to the new column, the
            // remainder to the old one.
            while widths.len() <= k {
                widths.push(fallback_width);
            }
            let current = widths[k];
            let half = current / 2;
            widths.insert(k, half);
            widths[k + 1] = current - half;
            if let Err(err) = doc.set_table_attrs(&ctx.table_path, &TablePatch::widths(widths)) {
                warn!("insert-column: failed to update column widths: {err}");
            }
        });
    }
}
