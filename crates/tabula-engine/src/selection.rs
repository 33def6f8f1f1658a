use std::collections::BTreeSet;

use tabula_model::{Document, NodePath, NodeRef, Range};

use crate::grid::{FilledMatrix, GridCoord, GridSlot};

/// The resolved table selection: grid slots grouped by matrix row, row-major.
///
/// A merged cell contributes one slot per grid position it covers, so the
/// same cell path can appear several times; [`TableSelection::distinct_cells`]
/// collapses the repeats for consumers that act once per cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableSelection {
    rows: Vec<Vec<GridSlot>>,
}

impl TableSelection {
    pub(crate) fn from_rows(rows: Vec<Vec<GridSlot>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Selected rows, each a run of slots in grid order.
    pub fn rows(&self) -> impl Iterator<Item = &[GridSlot]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// All selected slots, row-major.
    pub fn slots(&self) -> impl Iterator<Item = &GridSlot> {
        self.rows.iter().flatten()
    }

    /// The first selected slot in row-major order.
    pub fn first(&self) -> Option<&GridSlot> {
        self.rows.first()?.first()
    }

    /// The last selected slot in row-major order.
    pub fn last(&self) -> Option<&GridSlot> {
        self.rows.last()?.last()
    }

    /// Distinct selected cells in first-occurrence (document) order.
    ///
    /// This is the iteration surface for bulk formatting: apply a mark to
    /// every cell returned here and each merged cell is touched exactly once.
    pub fn distinct_cells(&self) -> Vec<&GridSlot> {
        let mut seen: BTreeSet<&NodePath> = BTreeSet::new();
        let mut cells = Vec::new();
        for slot in self.slots() {
            if seen.insert(&slot.path) {
                cells.push(slot);
            }
        }
        cells
    }
}

/// Innermost cell on the ancestor-or-self chain of `path`.
pub fn nearest_cell_path(doc: &Document, path: &NodePath) -> Option<NodePath> {
    for len in (1..=path.len()).rev() {
        let candidate = path.truncated(len);
        if matches!(doc.node(&candidate), Some(NodeRef::Cell(_))) {
            return Some(candidate);
        }
    }
    None
}

/// Deepest table on the ancestor-or-self chain of `path`.
pub fn enclosing_table_path(doc: &Document, path: &NodePath) -> Option<NodePath> {
    for len in (1..=path.len()).rev() {
        let candidate = path.truncated(len);
        if matches!(doc.node(&candidate), Some(NodeRef::Table(_))) {
            return Some(candidate);
        }
    }
    None
}

/// Re-derive the table selection for `range`.
///
/// Returns `None` (selection cleared) when the endpoints collapse into one
/// cell, either endpoint is outside a table, the endpoints sit in different
/// tables, or a lookup goes stale mid-resolution. Otherwise the result is the
/// smallest span-closed rectangle containing both endpoints: the bounds grow
/// until no merged cell is only half inside, which terminates because they
/// only ever grow and the grid is finite.
pub(crate) fn resolve(doc: &Document, range: &Range) -> Option<TableSelection> {
    let from_path = nearest_cell_path(doc, &range.start().path)?;
    let to_path = nearest_cell_path(doc, &range.end().path)?;
    if from_path == to_path {
        return None;
    }

    let table_path = enclosing_table_path(doc, &from_path)?;
    if enclosing_table_path(doc, &to_path)? != table_path {
        return None;
    }

    let table = doc.table(&table_path)?;
    let matrix = FilledMatrix::build(&table_path, table);
    let from = matrix.position_of(&from_path)?;
    let to = matrix.position_of(&to_path)?;

    let mut start = GridCoord::new(from.x.min(to.x), from.y.min(to.y));
    let mut end = GridCoord::new(from.x.max(to.x), from.y.max(to.y));
    loop {
        let (next_start, next_end) = expanded(&matrix, start, end);
        if next_start == start && next_end == end {
            break;
        }
        start = next_start;
        end = next_end;
    }

    let mut rows = Vec::new();
    let mut x = start.x;
    while x <= end.x && x < matrix.row_count() {
        let mut row = Vec::new();
        for y in start.y..=end.y {
            // Unfilled slots (ragged or shadowed regions) are skipped.
            if let Some(slot) = matrix.slot(x, y) {
                row.push(slot.clone());
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
        x += 1;
    }

    if rows.is_empty() {
        return None;
    }
    Some(TableSelection::from_rows(rows))
}

/// One expansion step: push the bounds out to cover every merged cell that
/// any in-bounds slot belongs to.
fn expanded(matrix: &FilledMatrix, start: GridCoord, end: GridCoord) -> (GridCoord, GridCoord) {
    let mut next_start = start;
    let mut next_end = end;
    let mut x = start.x;
    while x <= end.x && x < matrix.row_count() {
        for y in start.y..=end.y {
            let Some(slot) = matrix.slot(x, y) else {
                continue;
            };
            let ctx = slot.ctx;
            next_start.x = next_start.x.min(x.saturating_sub(ctx.ttb as usize - 1));
            next_start.y = next_start.y.min(y.saturating_sub(ctx.rtl as usize - 1));
            next_end.x = next_end.x.max(x + ctx.btt as usize - 1);
            next_end.y = next_end.y.max(y + ctx.ltr as usize - 1);
        }
        x += 1;
    }
    (next_start, next_end)
}
