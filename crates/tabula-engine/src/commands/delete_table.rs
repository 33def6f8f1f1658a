use crate::commands::{remove_whole_table, TableCommand};
use crate::selection::enclosing_table_path;
use crate::session::Session;

/// Delete the table enclosing the caret, wholesale.
pub struct DeleteTable;

impl TableCommand for DeleteTable {
    fn name(&self) -> &'static str {
        "delete-table"
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
        remove_whole_table(session, &table_path, "delete-table");
    }
}
