use log::warn;
use tabula_model::{Node, NodePath, Table};

use crate::commands::TableCommand;
use crate::selection::enclosing_table_path;
use crate::session::Session;

/// Insert a fresh table after the top-level block holding the caret.
///
/// Tables do not nest: the command is disabled whenever the caret is already
/// inside one. Dimensions are clamped to at least 1x1; widths and row heights
/// come from the session configuration.
pub struct InsertTable {
    pub rows: usize,
    pub cols: usize,
}

impl InsertTable {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }
}

impl TableCommand for InsertTable {
    fn name(&self) -> &'static str {
        "insert-table"
    }

    fn is_disabled(&self, session: &Session) -> bool {
        let Some(range) = session.range() else {
            return true;
        };
        if !range.is_collapsed() {
            return true;
        }
        enclosing_table_path(session.document(), &range.start().path).is_some()
    }

    fn execute(&self, session: &mut Session) {
        if self.is_disabled(session) {
            return;
        }
        let Some(range) = session.range() else {
            return;
        };
        let table = Table::filled(
            self.rows.max(1),
            self.cols.max(1),
            session.config().min_column_width,
            session.config().min_row_height,
        );

        let block_count = session.document().children().len();
        let index = range
            .start()
            .path
            .as_slice()
            .first()
            .map_or(block_count, |&block| block + 1)
            .min(block_count);
        let at = NodePath::root(index);
        if let Err(err) = session.document_mut().insert_node(&at, Node::Table(table)) {
            warn!("insert-table: failed to insert table at {at}: {err}");
        }
    }
}
