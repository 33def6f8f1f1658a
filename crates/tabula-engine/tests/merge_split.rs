use pretty_assertions::assert_eq;
use tabula_engine::{MergeCells, Session, SplitCell, TableCommand};
use tabula_model::{Cell, Document, Node, NodePath, Position, Range, Row, Table};

fn cell(text: &str) -> Cell {
    Cell::with_text(text)
}

fn spanned(text: &str, row_span: u32, col_span: u32) -> Cell {
    let mut cell = Cell::with_text(text);
    cell.row_span = row_span;
    cell.col_span = col_span;
    cell
}

fn table_doc(rows: Vec<Row>) -> Document {
    Document::with_children(vec![Node::Table(Table::new(rows, vec![]))])
}

fn caret(session: &mut Session, path: impl Into<NodePath>) {
    session.set_range(Some(Range::collapsed(Position::new(path.into(), 0))));
}

fn select(session: &mut Session, from: impl Into<NodePath>, to: impl Into<NodePath>) {
    session.set_range(Some(Range::new(
        Position::new(from.into(), 0),
        Position::new(to.into(), 0),
    )));
}

fn block_texts(cell: &Cell) -> Vec<&str> {
    cell.content.iter().map(|block| block.text.as_str()).collect()
}

fn cell_count(doc: &Document) -> usize {
    doc.table(&NodePath::root(0))
        .map_or(0, |table| table.rows.iter().map(|row| row.cells.len()).sum())
}

#[test]
fn merge_moves_content_in_document_order() {
    let doc = table_doc(vec![
        Row::new(vec![cell("a"), cell("b")]),
        Row::new(vec![cell("c"), cell("d")]),
    ]);
    let mut session = Session::new(doc);
    select(&mut session, [0, 0, 0, 0], [0, 1, 1, 0]);
    assert!(!MergeCells.is_disabled(&session));
    MergeCells.execute(&mut session);

    let base = session
        .document()
        .cell(&NodePath::from([0, 0, 0]))
        .expect("base cell");
    assert_eq!(base.row_span, 2);
    assert_eq!(base.col_span, 2);
    // Donors are deleted back-to-front but their content still lands in
    // document order after the base's own blocks.
    assert_eq!(block_texts(base), vec!["a", "b", "c", "d"]);

    let table = session.document().table(&NodePath::root(0)).expect("table");
    assert_eq!(table.rows[0].cells.len(), 1);
    assert!(
        table.rows[1].cells.is_empty(),
        "the covered row stays in the tree for the span"
    );

    assert!(session.table_selection().is_none(), "merge consumes the selection");
    assert!(session.range().is_some(), "the range itself survives");
}

#[test]
fn merge_bounds_absorb_premerged_cells() {
    // a already spans two columns; merging a..e takes the full 2x2 region
    // and a's content keeps its lead position.
    let doc = table_doc(vec![
        Row::new(vec![spanned("a", 1, 2), cell("c")]),
        Row::new(vec![cell("d"), cell("e"), cell("f")]),
    ]);
    let mut session = Session::new(doc);
    select(&mut session, [0, 0, 0, 0], [0, 1, 1, 0]);
    MergeCells.execute(&mut session);

    let base = session
        .document()
        .cell(&NodePath::from([0, 0, 0]))
        .expect("base cell");
    assert_eq!((base.row_span, base.col_span), (2, 2));
    assert_eq!(block_texts(base), vec!["a", "d", "e"]);

    let table = session.document().table(&NodePath::root(0)).expect("table");
    assert_eq!(table.rows[0].cells.len(), 2);
    assert_eq!(table.rows[1].cells.len(), 1);
    assert_eq!(block_texts(&table.rows[1].cells[0]), vec!["f"]);
}

#[test]
fn merge_requires_a_cross_cell_selection() {
    let mut session = Session::new(table_doc(vec![Row::new(vec![cell("a"), cell("b")])]));
    assert!(MergeCells.is_disabled(&session), "no selection");

    caret(&mut session, [0, 0, 0, 0]);
    assert!(MergeCells.is_disabled(&session), "collapsed caret");

    select(&mut session, [0, 0, 0, 0], [0, 0, 1, 0]);
    assert!(!MergeCells.is_disabled(&session));
}

#[test]
fn split_restores_cell_count_after_merge() {
    let doc = table_doc(vec![
        Row::new(vec![cell("a"), cell("b")]),
        Row::new(vec![cell("c"), cell("d")]),
    ]);
    let mut session = Session::new(doc);
    assert_eq!(cell_count(session.document()), 4);

    select(&mut session, [0, 0, 0, 0], [0, 1, 1, 0]);
    MergeCells.execute(&mut session);
    assert_eq!(cell_count(session.document()), 1);

    caret(&mut session, [0, 0, 0, 0]);
    assert!(!SplitCell.is_disabled(&session));
    SplitCell.execute(&mut session);

    let table = session.document().table(&NodePath::root(0)).expect("table");
    assert_eq!(cell_count(session.document()), 4);
    assert!(table
        .rows
        .iter()
        .flat_map(|row| row.cells.iter())
        .all(|cell| !cell.is_spanned()));
    // The merged content stays with the origin cell.
    assert_eq!(block_texts(&table.rows[0].cells[0]), vec!["a", "b", "c", "d"]);
    assert_eq!(block_texts(&table.rows[1].cells[0]), vec![""]);
}

#[test]
fn split_spreads_into_partial_rows() {
    // The lower row is shorter than the split region's column offset; the
    // fresh cells append at the row end instead of vanishing.
    let doc = table_doc(vec![
        Row::new(vec![cell("x"), spanned("y", 2, 2)]),
        Row::new(vec![cell("z")]),
    ]);
    let mut session = Session::new(doc);
    caret(&mut session, [0, 0, 1, 0]);
    SplitCell.execute(&mut session);

    let table = session.document().table(&NodePath::root(0)).expect("table");
    assert_eq!(table.rows[0].cells.len(), 3);
    assert_eq!(table.rows[1].cells.len(), 3);
    assert_eq!(block_texts(&table.rows[1].cells[0]), vec!["z"]);

    let y = session
        .document()
        .cell(&NodePath::from([0, 0, 1]))
        .expect("split cell");
    assert!(!y.is_spanned());
}

#[test]
fn split_inherits_header_on_the_first_row() {
    let mut wide_header = spanned("h1", 1, 2);
    wide_header.is_header = true;
    let mut other_header = cell("h2");
    other_header.is_header = true;
    let doc = table_doc(vec![
        Row::new(vec![wide_header, other_header]),
        Row::new(vec![cell("u"), cell("v"), cell("w")]),
    ]);
    let mut session = Session::new(doc);
    caret(&mut session, [0, 0, 0, 0]);
    SplitCell.execute(&mut session);

    let inserted = session
        .document()
        .cell(&NodePath::from([0, 0, 1]))
        .expect("inserted cell");
    assert!(inserted.is_header);
    assert_eq!(inserted.content[0].text, "");
}

#[test]
fn split_needs_a_single_spanned_cell() {
    let doc = table_doc(vec![
        Row::new(vec![spanned("a", 2, 1), cell("b")]),
        Row::new(vec![cell("c")]),
    ]);
    let mut session = Session::new(doc);
    assert!(SplitCell.is_disabled(&session), "no range");

    caret(&mut session, [0, 0, 1, 0]);
    assert!(SplitCell.is_disabled(&session), "cell b is not merged");

    caret(&mut session, [0, 0, 0, 0]);
    assert!(!SplitCell.is_disabled(&session));

    select(&mut session, [0, 0, 0, 0], [0, 0, 1, 0]);
    assert!(
        SplitCell.is_disabled(&session),
        "a cross-cell selection has no single target"
    );
}
