use pretty_assertions::assert_eq;
use tabula_engine::{FilledMatrix, GridCoord, SpanContext};
use tabula_model::{Cell, NodePath, Row, Table};

fn cell(text: &str) -> Cell {
    Cell::with_text(text)
}

fn spanned(text: &str, row_span: u32, col_span: u32) -> Cell {
    let mut cell = Cell::with_text(text);
    cell.row_span = row_span;
    cell.col_span = col_span;
    cell
}

fn matrix_of(table: &Table) -> FilledMatrix {
    FilledMatrix::build(&NodePath::root(0), table)
}

#[test]
fn plain_grid_covers_every_slot() {
    let table = Table::new(
        vec![
            Row::new(vec![cell("a"), cell("b"), cell("c")]),
            Row::new(vec![cell("d"), cell("e"), cell("f")]),
            Row::new(vec![cell("g"), cell("h"), cell("i")]),
        ],
        vec![],
    );
    let matrix = matrix_of(&table);

    assert_eq!(matrix.row_count(), 3);
    assert_eq!(matrix.column_count(), 3);
    assert!(!matrix.is_empty());
    for x in 0..3 {
        for y in 0..3 {
            let slot = matrix.slot(x, y).expect("every slot filled");
            assert_eq!(slot.path, NodePath::from([0, x, y]));
            assert_eq!(slot.ctx, SpanContext::SINGLE);
            assert!(!slot.ctx.in_merge());
        }
    }
}

#[test]
fn merged_region_stamps_span_contexts() {
    // a spans 2x2; its own row also holds b, the next row only c.
    let table = Table::new(
        vec![
            Row::new(vec![spanned("a", 2, 2), cell("b")]),
            Row::new(vec![cell("c")]),
            Row::new(vec![cell("d"), cell("e"), cell("f")]),
        ],
        vec![],
    );
    let matrix = matrix_of(&table);

    assert_eq!(matrix.column_count(), 3);
    assert_eq!(matrix.column_count(), table.grid_column_count());
    for x in 0..3 {
        assert_eq!(matrix.row(x).len(), 3, "row {x} fills the full rectangle");
    }

    let origin = matrix.slot(0, 0).expect("origin slot");
    assert_eq!(origin.ctx, SpanContext { rtl: 1, ltr: 2, ttb: 1, btt: 2 });
    assert!(origin.ctx.is_origin());
    assert!(origin.ctx.in_merge());

    let lower_right = matrix.slot(1, 1).expect("covered slot");
    assert_eq!(lower_right.path, NodePath::from([0, 0, 0]));
    assert_eq!(lower_right.ctx, SpanContext { rtl: 2, ltr: 1, ttb: 2, btt: 1 });
    assert!(!lower_right.ctx.is_origin());

    // c is the only cell of its row, but the merge pushes it to column 2.
    let shifted = matrix.slot(1, 2).expect("slot probed past the merge");
    assert_eq!(shifted.path, NodePath::from([0, 1, 0]));
    assert_eq!(shifted.ctx, SpanContext::SINGLE);

    // Covered slots point back at the origin.
    let (coord, origin) = matrix.origin_of(1, 1).expect("origin of covered slot");
    assert_eq!(coord, GridCoord::new(0, 0));
    assert_eq!(origin.path, NodePath::from([0, 0, 0]));

    // position_of reports the first slot of a span, i.e. its origin.
    assert_eq!(
        matrix.position_of(&NodePath::from([0, 0, 0])),
        Some(GridCoord::new(0, 0))
    );
    assert_eq!(
        matrix.position_of(&NodePath::from([0, 1, 0])),
        Some(GridCoord::new(1, 2))
    );
}

#[test]
fn document_order_wins_on_overlap() {
    // q (rowSpan 2) claims slot (1, 1) first; r declares a colSpan of 2 over
    // the same slot but only keeps the one left of it.
    let table = Table::new(
        vec![
            Row::new(vec![cell("p"), spanned("q", 2, 1)]),
            Row::new(vec![spanned("r", 1, 2)]),
        ],
        vec![],
    );
    let matrix = matrix_of(&table);

    let r = matrix.slot(1, 0).expect("r keeps its first slot");
    assert_eq!(r.path, NodePath::from([0, 1, 0]));
    assert_eq!(r.ctx.ltr, 2, "the slot still carries r's declared span");

    let contested = matrix.slot(1, 1).expect("q retains the contested slot");
    assert_eq!(contested.path, NodePath::from([0, 0, 1]));
    assert_eq!(contested.ctx, SpanContext { rtl: 1, ltr: 1, ttb: 2, btt: 1 });

    assert_eq!(
        matrix.position_of(&NodePath::from([0, 1, 0])),
        Some(GridCoord::new(1, 0))
    );
}

#[test]
fn overhanging_row_span_adds_no_rows() {
    let table = Table::new(
        vec![
            Row::new(vec![cell("a"), cell("b")]),
            Row::new(vec![spanned("tail", 5, 1), cell("c")]),
        ],
        vec![],
    );
    let matrix = matrix_of(&table);

    assert_eq!(matrix.row_count(), 2);
    assert!(matrix.slot(2, 0).is_none());
    let tail = matrix.slot(1, 0).expect("tail origin");
    assert_eq!(tail.ctx.btt, 5, "the context still reports the declared span");
}

#[test]
fn ragged_rows_report_the_widest_column_count() {
    let table = Table::new(
        vec![
            Row::new(vec![cell("a"), cell("b"), cell("c")]),
            Row::new(vec![cell("d")]),
        ],
        vec![],
    );
    let matrix = matrix_of(&table);

    assert_eq!(matrix.column_count(), 3);
    assert_eq!(matrix.row(1).len(), 1);
    assert!(matrix.slot(1, 1).is_none());
    assert!(matrix.row(7).is_empty());
    assert_eq!(matrix.position_of(&NodePath::from([0, 1, 5])), None);
}

#[test]
fn hidden_cells_keep_their_slots() {
    let mut ghost = cell("ghost");
    ghost.hidden = true;
    let table = Table::new(vec![Row::new(vec![cell("a"), ghost])], vec![]);
    let matrix = matrix_of(&table);

    let slot = matrix.slot(0, 1).expect("hidden cells still project");
    assert!(slot.hidden);
    assert_eq!(slot.ctx, SpanContext::SINGLE);
}
