use std::collections::BTreeSet;

use log::warn;
use tabula_model::{Cell, CellPatch, Node, NodePath, Row};

use crate::commands::{cell_context, collapsed_selected_cell, TableCommand};
use crate::session::Session;

/// Insert a new row above the acting cell's row.
///
/// Merged cells crossing the acting row are not cut: each such cell grows by
/// one row and contributes no cell to the new row. The new row's height comes
/// from the session's minimum row height.
pub struct InsertRow;

impl TableCommand for InsertRow {
    fn name(&self) -> &'static str {
        "insert-row"
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
        let Some(coord) = ctx.matrix.position_of(&ctx.cell_path) else {
            warn!(
                "insert-row: cell {} owns no slot in its own grid",
                ctx.cell_path
            );
            return;
        };
        let tr = coord.x;
        let row_slots = ctx.matrix.row(tr);
        if row_slots.is_empty() {
            warn!("insert-row: grid row {tr} has no slots");
            return;
        }
        let row_height = session.config().min_row_height;

        // Plan: merged cells touching the acting row grow by one row and
        // block their columns from receiving a fresh cell.
        let mut processed: BTreeSet<NodePath> = BTreeSet::new();
        let mut skip_columns: BTreeSet<usize> = BTreeSet::new();
        let mut grown: Vec<(NodePath, u32)> = Vec::new();
        for (y, slot) in row_slots.iter().enumerate() {
            let Some(slot) = slot else { continue };
            if !slot.ctx.in_merge() {
                continue;
            }
            let Some((origin, origin_slot)) = ctx.matrix.origin_of(tr, y) else {
                warn!("insert-row: no origin slot for covered slot ({tr}, {y})");
                continue;
            };
            if processed.insert(origin_slot.path.clone()) {
                if !origin_slot.hidden {
                    grown.push((origin_slot.path.clone(), origin_slot.row_span + 1));
                }
                for c in 0..origin_slot.col_span as usize {
                    skip_columns.insert(origin.y + c);
                }
            } else {
                skip_columns.insert(y);
            }
        }

        let cells: Vec<Cell> = row_slots
            .iter()
            .enumerate()
            .filter(|(y, slot)| slot.is_some() && !skip_columns.contains(y))
            .map(|_| Cell::empty())
            .collect();
        if cells.is_empty() {
            // Every column is crossed by a merged cell; there is no row to
            // add, so leave the spans alone too.
            return;
        }

        session.document_mut().without_normalizing(|doc| {
            for (path, row_span) in &grown {
                if let Err(err) = doc.set_cell_attrs(path, &CellPatch::row_span(*row_span)) {
                    warn!("insert-row: failed to grow {path}: {err}");
                }
            }
            let row = Row::with_height(cells, row_height);
            if let Err(err) = doc.insert_node(&ctx.row_path, Node::Row(row)) {
                warn!("insert-row: failed to insert row at {}: {err}", ctx.row_path);
            }
        });
    }
}
