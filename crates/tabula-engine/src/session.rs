use tabula_model::{Cell, Document, NodePath, Range};

use crate::config::TableConfig;
use crate::selection::{self, TableSelection};

/// A single-threaded editing session over one document.
///
/// The session pairs the document with the transient state the table engine
/// needs: the host-supplied [`Range`], the table selection derived from it,
/// and the per-session [`TableConfig`]. The table selection is written in
/// exactly one place, [`Session::set_range`]; commands only read it, and the
/// ones that consume it clear it.
#[derive(Clone, Debug, Default)]
pub struct Session {
    document: Document,
    range: Option<Range>,
    table_selection: Option<TableSelection>,
    config: TableConfig,
}

impl Session {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            range: None,
            table_selection: None,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(document: Document, config: TableConfig) -> Self {
        Self {
            config,
            ..Self::new(document)
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access for host edits outside the command set.
    ///
    /// Structural edits made this way can leave the stored range pointing at
    /// stale paths; call [`Session::set_range`] afterwards to re-derive the
    /// table selection.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }

    /// Update the caret/selection and re-derive the table selection.
    ///
    /// Collapsing into a single cell, leaving tables entirely, or spanning
    /// two different tables all clear it.
    pub fn set_range(&mut self, range: Option<Range>) {
        self.table_selection = match &range {
            Some(range) => selection::resolve(&self.document, range),
            None => None,
        };
        self.range = range;
    }

    /// The current cross-cell table selection, if any.
    pub fn table_selection(&self) -> Option<&TableSelection> {
        self.table_selection.as_ref()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TableConfig) {
        self.config = config;
    }

    /// The nearest cell enclosing the range's first endpoint.
    pub fn selected_cell(&self) -> Option<(NodePath, &Cell)> {
        let range = self.range.as_ref()?;
        let path = selection::nearest_cell_path(&self.document, &range.start().path)?;
        let cell = self.document.cell(&path)?;
        Some((path, cell))
    }

    pub(crate) fn clear_table_selection(&mut self) {
        self.table_selection = None;
    }

    /// Drop both the range and the table selection. Used after edits that
    /// invalidate every stored path, such as whole-table removal.
    pub(crate) fn clear_range(&mut self) {
        self.range = None;
        self.table_selection = None;
    }
}
