use core::fmt;

use serde::{Deserialize, Serialize};

/// Default pixel width for a grid column with no configured width.
pub const DEFAULT_COLUMN_WIDTH: u32 = 60;

/// Default pixel height for a table row with no configured height.
pub const DEFAULT_ROW_HEIGHT: u32 = 30;

/// Kind tag for tree nodes, used in validation errors and diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Table,
    Row,
    Cell,
    Block,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Document => "document",
            NodeKind::Table => "table",
            NodeKind::Row => "row",
            NodeKind::Cell => "cell",
            NodeKind::Block => "block",
        };
        f.write_str(name)
    }
}

/// An owned tree node, as passed to the insert/remove primitives.
///
/// Parent/child legality is fixed: the document root holds tables and blocks,
/// tables hold rows, rows hold cells, cells hold blocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Table(Table),
    Row(Row),
    Cell(Cell),
    Block(Block),
}

impl Node {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Table(_) => NodeKind::Table,
            Node::Row(_) => NodeKind::Row,
            Node::Cell(_) => NodeKind::Cell,
            Node::Block(_) => NodeKind::Block,
        }
    }
}

/// A borrowed view of a node, returned by tree navigation.
#[derive(Copy, Clone, Debug)]
pub enum NodeRef<'a> {
    Table(&'a Table),
    Row(&'a Row),
    Cell(&'a Cell),
    Block(&'a Block),
}

impl NodeRef<'_> {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Table(_) => NodeKind::Table,
            NodeRef::Row(_) => NodeKind::Row,
            NodeRef::Cell(_) => NodeKind::Cell,
            NodeRef::Block(_) => NodeKind::Block,
        }
    }

    /// Number of children this node can be indexed into.
    pub fn child_count(&self) -> usize {
        match self {
            NodeRef::Table(table) => table.rows.len(),
            NodeRef::Row(row) => row.cells.len(),
            NodeRef::Cell(cell) => cell.content.len(),
            NodeRef::Block(_) => 0,
        }
    }
}

/// An opaque content block: the unit stored inside cells and between tables.
///
/// Real hosts nest arbitrary rich text here; this crate only moves and copies
/// blocks wholesale, so the payload is plain text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl Block {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Horizontal text alignment within a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Presentation attributes carried on a cell.
///
/// Structural edits preserve these: deleting the row that owns a vertically
/// merged cell copies the style onto the replacement cell in the next row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    /// Explicit pixel width, when the cell overrides its column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl CellStyle {
    /// Returns true if no attribute is set.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A single table cell.
///
/// A cell with `row_span`/`col_span` greater than 1 is the visible origin of a
/// merged region; the covered grid slots hold no tree node of their own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Content blocks. Normalization guarantees at least one.
    #[serde(default)]
    pub content: Vec<Block>,

    /// Rows this cell spans downward. Always `>= 1`.
    #[serde(
        default = "crate::serde_defaults::one",
        skip_serializing_if = "crate::serde_defaults::is_one"
    )]
    pub row_span: u32,

    /// Columns this cell spans rightward. Always `>= 1`.
    #[serde(
        default = "crate::serde_defaults::one",
        skip_serializing_if = "crate::serde_defaults::is_one"
    )]
    pub col_span: u32,

    /// Header cell (`<th>`-equivalent).
    #[serde(default, skip_serializing_if = "crate::serde_defaults::is_false")]
    pub is_header: bool,

    /// Cell exists in the tree but is not rendered.
    ///
    /// Importers mark cells covered by a merge this way; structural edits must
    /// keep span bookkeeping consistent without treating them as visible.
    #[serde(default, skip_serializing_if = "crate::serde_defaults::is_false")]
    pub hidden: bool,

    #[serde(default, skip_serializing_if = "CellStyle::is_default")]
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: vec![Block::default()],
            row_span: 1,
            col_span: 1,
            is_header: false,
            hidden: false,
            style: CellStyle::default(),
        }
    }
}

impl Cell {
    /// An unspanned cell with one empty content block.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An unspanned cell with a single text block. Test/fixture convenience.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Block::new(text)],
            ..Self::default()
        }
    }

    /// Returns true if this cell spans more than one grid slot.
    #[inline]
    pub fn is_spanned(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    /// Apply a partial attribute update, clamping spans to `>= 1`.
    pub fn apply(&mut self, patch: &CellPatch) {
        if let Some(row_span) = patch.row_span {
            self.row_span = row_span.max(1);
        }
        if let Some(col_span) = patch.col_span {
            self.col_span = col_span.max(1);
        }
        if let Some(is_header) = patch.is_header {
            self.is_header = is_header;
        }
        if let Some(hidden) = patch.hidden {
            self.hidden = hidden;
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
    }
}

/// A table row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Pixel height, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            height: None,
        }
    }

    pub fn with_height(cells: Vec<Cell>, height: u32) -> Self {
        Self {
            cells,
            height: Some(height),
        }
    }
}

/// How the table's overall width is determined.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthMode {
    /// Column widths rule; the table is as wide as their sum.
    #[default]
    Auto,
    /// The table stretches to its container; column widths act as ratios.
    Full,
}

impl WidthMode {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A table node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<Row>,

    /// Pixel width per grid column.
    ///
    /// Normalization keeps the length equal to [`Table::grid_column_count`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_widths: Vec<u32>,

    #[serde(default, skip_serializing_if = "WidthMode::is_default")]
    pub width_mode: WidthMode,

    /// Overall pixel height, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Table {
    pub fn new(rows: Vec<Row>, column_widths: Vec<u32>) -> Self {
        Self {
            rows,
            column_widths,
            width_mode: WidthMode::Auto,
            height: None,
        }
    }

    /// A `rows x cols` table of empty cells with uniform column widths and row
    /// heights.
    pub fn filled(rows: usize, cols: usize, column_width: u32, row_height: u32) -> Self {
        let rows = (0..rows)
            .map(|_| Row::with_height((0..cols).map(|_| Cell::empty()).collect(), row_height))
            .collect();
        Self::new(rows, vec![column_width; cols])
    }

    /// Grid column count: the widest row by column-span sum.
    ///
    /// Spans never add rows, so the row count needs no such derivation.
    pub fn grid_column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| cell.col_span.max(1) as usize)
                    .sum::<usize>()
            })
            .max()
            .unwrap_or(0)
    }

    /// Returns true if the first row exists and consists entirely of header
    /// cells. New cells inserted into that row inherit header status.
    pub fn has_header_row(&self) -> bool {
        self.rows
            .first()
            .is_some_and(|row| !row.cells.is_empty() && row.cells.iter().all(|cell| cell.is_header))
    }
}

/// Partial update for cell attributes; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_header: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

impl CellPatch {
    pub fn row_span(value: u32) -> Self {
        Self {
            row_span: Some(value),
            ..Self::default()
        }
    }

    pub fn col_span(value: u32) -> Self {
        Self {
            col_span: Some(value),
            ..Self::default()
        }
    }

    pub fn spans(row_span: u32, col_span: u32) -> Self {
        Self {
            row_span: Some(row_span),
            col_span: Some(col_span),
            ..Self::default()
        }
    }

    pub fn style(style: CellStyle) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }
}

/// Partial update for table attributes; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_mode: Option<WidthMode>,
}

impl TablePatch {
    pub fn widths(column_widths: Vec<u32>) -> Self {
        Self {
            column_widths: Some(column_widths),
            ..Self::default()
        }
    }

    pub fn width_mode(width_mode: WidthMode) -> Self {
        Self {
            width_mode: Some(width_mode),
            ..Self::default()
        }
    }
}

impl Table {
    /// Apply a partial attribute update.
    pub fn apply(&mut self, patch: &TablePatch) {
        if let Some(column_widths) = &patch.column_widths {
            self.column_widths = column_widths.clone();
        }
        if let Some(width_mode) = patch.width_mode {
            self.width_mode = width_mode;
        }
    }
}
