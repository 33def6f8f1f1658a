use pretty_assertions::assert_eq;
use tabula_engine::{enclosing_table_path, nearest_cell_path, Session};
use tabula_model::{Block, Cell, Document, Node, NodePath, Position, Range, Row, Table};

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

fn three_by_three() -> Document {
    table_doc(vec![
        Row::new(vec![cell("a"), cell("b"), cell("c")]),
        Row::new(vec![cell("d"), cell("e"), cell("f")]),
        Row::new(vec![cell("g"), cell("h"), cell("i")]),
    ])
}

fn select(session: &mut Session, from: impl Into<NodePath>, to: impl Into<NodePath>) {
    session.set_range(Some(Range::new(
        Position::new(from.into(), 0),
        Position::new(to.into(), 0),
    )));
}

fn caret(session: &mut Session, path: impl Into<NodePath>) {
    session.set_range(Some(Range::collapsed(Position::new(path.into(), 0))));
}

fn selected_paths(session: &Session) -> Vec<Vec<NodePath>> {
    session
        .table_selection()
        .map(|selection| {
            selection
                .rows()
                .map(|row| row.iter().map(|slot| slot.path.clone()).collect())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn plain_drag_resolves_row_major() {
    let mut session = Session::new(three_by_three());
    select(&mut session, [0, 1, 1, 0], [0, 2, 2, 0]);

    assert_eq!(
        selected_paths(&session),
        vec![
            vec![NodePath::from([0, 1, 1]), NodePath::from([0, 1, 2])],
            vec![NodePath::from([0, 2, 1]), NodePath::from([0, 2, 2])],
        ]
    );
}

#[test]
fn selection_expands_over_a_merged_cell() {
    // a spans both rows; selecting a..b in the top row drags the full second
    // row in because a's span reaches it.
    let doc = table_doc(vec![
        Row::new(vec![spanned("a", 2, 1), cell("b")]),
        Row::new(vec![cell("c")]),
    ]);
    let mut session = Session::new(doc);
    select(&mut session, [0, 0, 0, 0], [0, 0, 1, 0]);

    let selection = session.table_selection().expect("selection");
    assert_eq!(selection.row_count(), 2);
    let slots: Vec<NodePath> = selection.slots().map(|slot| slot.path.clone()).collect();
    assert_eq!(
        slots,
        vec![
            NodePath::from([0, 0, 0]),
            NodePath::from([0, 0, 1]),
            NodePath::from([0, 0, 0]),
            NodePath::from([0, 1, 0]),
        ]
    );

    let distinct: Vec<NodePath> = selection
        .distinct_cells()
        .iter()
        .map(|slot| slot.path.clone())
        .collect();
    assert_eq!(
        distinct,
        vec![
            NodePath::from([0, 0, 0]),
            NodePath::from([0, 0, 1]),
            NodePath::from([0, 1, 0]),
        ]
    );
}

#[test]
fn expansion_cascades_until_fixpoint() {
    // d pulls in row 2; g then pulls in column 2. Two growth steps from a
    // selection that named neither.
    let doc = table_doc(vec![
        Row::new(vec![cell("a"), cell("b"), cell("c")]),
        Row::new(vec![spanned("d", 2, 1), cell("e"), cell("f")]),
        Row::new(vec![spanned("g", 1, 2)]),
    ]);
    let mut session = Session::new(doc);
    select(&mut session, [0, 0, 1, 0], [0, 1, 0, 0]);

    let selection = session.table_selection().expect("selection");
    assert_eq!(selection.row_count(), 3);
    assert_eq!(selection.slots().count(), 9);
    assert_eq!(selection.distinct_cells().len(), 7);
}

#[test]
fn single_cell_ranges_clear() {
    let mut session = Session::new(three_by_three());
    select(&mut session, [0, 1, 1, 0], [0, 2, 2, 0]);
    assert!(session.table_selection().is_some());

    // Collapsing into one cell clears it; the range itself stays.
    caret(&mut session, [0, 1, 1, 0]);
    assert!(session.table_selection().is_none());
    assert!(session.range().is_some());

    // Two distinct positions inside the same cell are still one cell.
    select(&mut session, [0, 1, 1, 0], [0, 1, 1]);
    assert!(session.table_selection().is_none());
}

#[test]
fn ranges_outside_or_across_tables_clear() {
    let doc = Document::with_children(vec![
        Node::Block(Block::new("intro")),
        Node::Table(Table::new(vec![Row::new(vec![cell("a"), cell("b")])], vec![])),
        Node::Table(Table::new(vec![Row::new(vec![cell("x"), cell("y")])], vec![])),
    ]);
    let mut session = Session::new(doc);

    // One endpoint outside any table.
    select(&mut session, [0], [1, 0, 0, 0]);
    assert!(session.table_selection().is_none());

    // Endpoints in different tables.
    select(&mut session, [1, 0, 0, 0], [2, 0, 1, 0]);
    assert!(session.table_selection().is_none());

    // A stale endpoint path.
    select(&mut session, [1, 0, 0, 0], [1, 0, 9, 0]);
    assert!(session.table_selection().is_none());
}

#[test]
fn selection_follows_range_updates() {
    let mut session = Session::new(three_by_three());
    select(&mut session, [0, 0, 0, 0], [0, 0, 1, 0]);
    assert_eq!(session.table_selection().expect("selection").slots().count(), 2);

    select(&mut session, [0, 0, 0, 0], [0, 2, 2, 0]);
    assert_eq!(session.table_selection().expect("selection").slots().count(), 9);

    session.set_range(None);
    assert!(session.table_selection().is_none());
    assert!(session.range().is_none());
}

#[test]
fn ancestor_lookups_stop_at_the_right_kind() {
    let doc = three_by_three();
    let block = NodePath::from([0, 1, 2, 0]);

    assert_eq!(
        nearest_cell_path(&doc, &block),
        Some(NodePath::from([0, 1, 2]))
    );
    assert_eq!(
        nearest_cell_path(&doc, &NodePath::from([0, 1, 2])),
        Some(NodePath::from([0, 1, 2])),
        "a cell path is its own nearest cell"
    );
    assert_eq!(enclosing_table_path(&doc, &block), Some(NodePath::root(0)));
    assert_eq!(nearest_cell_path(&doc, &NodePath::root(0)), None);
}
