use tabula_model::{NodePath, Table};

/// Distances from a grid slot to the edges of its owning cell's span.
///
/// All four values are `1` for an unspanned cell. For the slot at offset
/// `(r, c)` inside a `row_span x col_span` region:
/// - `rtl` counts columns from the span's left edge, inclusive (`c + 1`)
/// - `ltr` counts columns to the right edge, inclusive (`col_span - c`)
/// - `ttb` counts rows from the top edge, inclusive (`r + 1`)
/// - `btt` counts rows to the bottom edge, inclusive (`row_span - r`)
///
/// So `rtl + ltr - 1 == col_span` and `ttb + btt - 1 == row_span` on every
/// slot, and subtracting `(ttb - 1, rtl - 1)` from a slot's coordinate always
/// lands on the owning cell's origin slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpanContext {
    pub rtl: u32,
    pub ltr: u32,
    pub ttb: u32,
    pub btt: u32,
}

impl SpanContext {
    /// Context of every slot of an unspanned cell.
    pub const SINGLE: Self = Self {
        rtl: 1,
        ltr: 1,
        ttb: 1,
        btt: 1,
    };

    /// True at the top-left slot of the owning cell.
    #[inline]
    pub const fn is_origin(self) -> bool {
        self.rtl == 1 && self.ttb == 1
    }

    /// True anywhere inside a merged (multi-slot) region.
    #[inline]
    pub const fn in_merge(self) -> bool {
        self.rtl > 1 || self.ltr > 1 || self.ttb > 1 || self.btt > 1
    }
}

/// Coordinate of a slot in the filled matrix: `x` is the row, `y` the column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
}

impl GridCoord {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// One filled slot: the owning cell plus where this slot sits in its span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSlot {
    /// Tree path of the owning cell.
    pub path: NodePath,
    /// The owner's spans, copied at build time.
    pub row_span: u32,
    pub col_span: u32,
    /// The owner's hidden flag.
    pub hidden: bool,
    pub ctx: SpanContext,
}

/// Grid projection of one table.
///
/// Built fresh for every operation and discarded afterwards: the matrix is a
/// pure function of the tree, never cached and never written back, so edits
/// cannot leave a stale grid behind.
#[derive(Clone, Debug, Default)]
pub struct FilledMatrix {
    rows: Vec<Vec<Option<GridSlot>>>,
}

impl FilledMatrix {
    /// Project `table` (rooted at `table_path`) onto the grid.
    ///
    /// Cells are visited in document order. Each cell claims the first
    /// unoccupied column at or after its own index in its row, then stamps
    /// every slot of its span; slots already claimed by an earlier cell are
    /// left untouched, so overlapping spans silently shadow later cells.
    /// Stamping clamps at the table's row count: spans never add rows.
    pub fn build(table_path: &NodePath, table: &Table) -> Self {
        let row_count = table.rows.len();
        let mut rows: Vec<Vec<Option<GridSlot>>> = vec![Vec::new(); row_count];

        for (x, row) in table.rows.iter().enumerate() {
            for (cell_index, cell) in row.cells.iter().enumerate() {
                let row_span = cell.row_span.max(1);
                let col_span = cell.col_span.max(1);

                let mut start_col = cell_index;
                while rows[x]
                    .get(start_col)
                    .is_some_and(|slot| slot.is_some())
                {
                    start_col += 1;
                }

                let path = table_path.child(x).child(cell_index);
                for c in 0..col_span {
                    for r in 0..row_span {
                        let tx = x + r as usize;
                        if tx >= row_count {
                            continue;
                        }
                        let ty = start_col + c as usize;
                        let target = &mut rows[tx];
                        if target.len() <= ty {
                            target.resize(ty + 1, None);
                        }
                        if target[ty].is_some() {
                            continue;
                        }
                        target[ty] = Some(GridSlot {
                            path: path.clone(),
                            row_span,
                            col_span,
                            hidden: cell.hidden,
                            ctx: SpanContext {
                                rtl: c + 1,
                                ltr: col_span - c,
                                ttb: r + 1,
                                btt: row_span - r,
                            },
                        });
                    }
                }
            }
        }

        Self { rows }
    }

    /// Number of grid rows; equal to the table's row count.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of grid columns: the widest filled row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    /// True when no slot is filled.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    /// The slot at `(x, y)`, if filled.
    pub fn slot(&self, x: usize, y: usize) -> Option<&GridSlot> {
        self.rows.get(x)?.get(y)?.as_ref()
    }

    /// Row `x` with holes included. Empty for out-of-range rows.
    pub fn row(&self, x: usize) -> &[Option<GridSlot>] {
        match self.rows.get(x) {
            Some(row) => row,
            None => &[],
        }
    }

    /// Coordinate of the first slot owned by `path`, scanning row-major.
    ///
    /// `None` when the path owns no slot (stale path, or a cell fully
    /// shadowed by an earlier overlapping span).
    pub fn position_of(&self, path: &NodePath) -> Option<GridCoord> {
        for (x, row) in self.rows.iter().enumerate() {
            for (y, slot) in row.iter().enumerate() {
                if let Some(slot) = slot {
                    if slot.path == *path {
                        return Some(GridCoord::new(x, y));
                    }
                }
            }
        }
        None
    }

    /// The origin slot of the cell covering `(x, y)`, with its coordinate.
    ///
    /// `None` when `(x, y)` is unfilled or the computed origin slot is
    /// unfilled, which only happens on malformed grids.
    pub fn origin_of(&self, x: usize, y: usize) -> Option<(GridCoord, &GridSlot)> {
        let slot = self.slot(x, y)?;
        let ox = x.checked_sub(slot.ctx.ttb as usize - 1)?;
        let oy = y.checked_sub(slot.ctx.rtl as usize - 1)?;
        let origin = self.slot(ox, oy)?;
        Some((GridCoord::new(ox, oy), origin))
    }
}
