use log::warn;
use tabula_model::{TablePatch, WidthMode};

use crate::commands::TableCommand;
use crate::selection::enclosing_table_path;
use crate::session::Session;

/// Columns never shrink below this during a stretch.
const MIN_STRETCH_WIDTH: u32 = 10;

/// Rescale the enclosing table's column widths to fill `target_width` pixels
/// (the host measures its container) and switch the table to automatic width.
///
/// Widths scale proportionally with a floor of [`MIN_STRETCH_WIDTH`]; any
/// rounding shortfall beyond a 1px guard goes to the last column. With no
/// configured widths or a zero target only the width mode changes.
pub struct StretchColumns {
    pub target_width: u32,
}

impl TableCommand for StretchColumns {
    fn name(&self) -> &'static str {
        "stretch-columns"
    }

    fn is_disabled(&self, session: &Session) -> bool {
        let Some(range) = session.range() else {
            return true;
        };
        if !range.is_collapsed() {
            return true;
        }
        enclosing_table_path(session.document(), &range.start().path).is_none()
    }

    fn execute(&self, session: &mut Session) {
        if self.is_disabled(session) {
            return;
        }
        let Some(range) = session.range() else {
            return;
        };
        let Some(table_path) = enclosing_table_path(session.document(), &range.start().path)
        else {
            return;
        };
        let Some(table) = session.document().table(&table_path) else {
            return;
        };
        let widths = &table.column_widths;
        let total: u64 = widths.iter().map(|&w| u64::from(w)).sum();

        let patch = if total == 0 || self.target_width == 0 {
            TablePatch::width_mode(WidthMode::Auto)
        } else {
            let target = u64::from(self.target_width);
            let mut scaled: Vec<u32> = widths
                .iter()
                .map(|&w| ((u64::from(w) * target / total) as u32).max(MIN_STRETCH_WIDTH))
                .collect();

            let sum: u64 = scaled.iter().map(|&w| u64::from(w)).sum();
            if sum > target {
                // The per-column floor pushed us over; scale back down.
                for width in &mut scaled {
                    *width = ((u64::from(*width) * target / sum) as u32).max(MIN_STRETCH_WIDTH);
                }
            } else {
                let shortfall = (target - sum) as u32;
                if shortfall > 1 {
                    if let Some(last) = scaled.last_mut() {
                        *last += shortfall - 1;
                    }
                }
            }
            TablePatch {
                column_widths: Some(scaled),
                width_mode: Some(WidthMode::Auto),
            }
        };

        if let Err(err) = session.document_mut().set_table_attrs(&table_path, &patch) {
            warn!("stretch-columns: failed to update table {table_path}: {err}");
        }
    }
}
