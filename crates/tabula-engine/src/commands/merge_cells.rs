use std::collections::BTreeSet;

use log::warn;
use tabula_model::{CellPatch, NodePath};

use crate::commands::TableCommand;
use crate::selection::enclosing_table_path;
use crate::session::Session;

/// Merge the selected region into its first cell.
///
/// The region is span-closed by construction (selection resolution already
/// expanded it), so merging is: move every other cell's content to the end of
/// the first cell's original content, delete the donors back-to-front, and
/// give the first cell the region's full spans. Consumes the table selection.
pub struct MergeCells;

impl TableCommand for MergeCells {
    fn name(&self) -> &'static str {
        "merge-cells"
    }

    fn is_disabled(&self, session: &Session) -> bool {
        let Some(selection) = session.table_selection() else {
            return true;
        };
        let (Some(first), Some(last)) = (selection.first(), selection.last()) else {
            return true;
        };
        let doc = session.document();
        let Some(first_table) = enclosing_table_path(doc, &first.path) else {
            return true;
        };
        match enclosing_table_path(doc, &last.path) {
            Some(last_table) => first_table != last_table,
            None => true,
        }
    }

    fn execute(&self, session: &mut Session) {
        if self.is_disabled(session) {
            return;
        }
        let Some(selection) = session.table_selection().cloned() else {
            return;
        };
        let Some(base_path) = selection.first().map(|slot| slot.path.clone()) else {
            return;
        };

        // Plan: the distinct cells of the region and its final spans, both in
        // selection-local coordinates (the region's top-left slot is (0, 0)).
        let mut seen: BTreeSet<NodePath> = BTreeSet::new();
        let mut donors: Vec<NodePath> = Vec::new();
        let mut max_x = 0usize;
        let mut max_y = 0usize;
        for (x, row) in selection.rows().enumerate() {
            for (y, slot) in row.iter().enumerate() {
                // Only top-edge slots carry a cell into the merge; lower
                // covered slots repeat origins already seen.
                if slot.ctx.ttb != 1 {
                    continue;
                }
                if !seen.insert(slot.path.clone()) {
                    continue;
                }
                max_x = max_x.max(x + slot.row_span as usize - 1);
                max_y = max_y.max(y + slot.col_span as usize - 1);
                if slot.path != base_path {
                    donors.push(slot.path.clone());
                }
            }
        }
        let final_row_span = (max_x + 1) as u32;
        let final_col_span = (max_y + 1) as u32;

        // Donor content lands after the base cell's original content; the
        // anchor index is captured once so that processing donors in
        // descending path order still yields document order.
        let Some(base_cell) = session.document().cell(&base_path) else {
            warn!("merge-cells: base cell {base_path} vanished");
            return;
        };
        let content_anchor = base_cell.content.len();

        donors.sort_by(|a, b| b.cmp(a));

        session.document_mut().without_normalizing(|doc| {
            for path in &donors {
                if !doc.contains(path) {
                    warn!("merge-cells: cell {path} already gone");
                    continue;
                }
                if let Err(err) = doc.move_children(path, &base_path, content_anchor) {
                    warn!("merge-cells: failed to move content from {path}: {err}");
                    continue;
                }
                if let Err(err) = doc.remove_node(path) {
                    warn!("merge-cells: failed to remove {path}: {err}");
                }
            }
            if let Err(err) = doc.set_cell_attrs(
                &base_path,
                &CellPatch::spans(final_row_span, final_col_span),
            ) {
                warn!("merge-cells: failed to set merged spans on {base_path}: {err}");
            }
        });

        session.clear_table_selection();
    }
}
