use folio::application::ports::PdfObject;
use folio::infrastructure::text_processing::{Bounds, scan_drawings};
use lopdf::content::Operation;

fn op(operator: &str, operands: &[i64]) -> Operation {
    Operation::new(operator, operands.iter().map(|&n| n.into()).collect())
}

fn letter_page() -> Option<Bounds> {
    Some(Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 612.0,
        max_y: 792.0,
    })
}

fn scan_drawing(operations: &[Operation]) -> Option<PdfObject> {
    let mut drawings = scan_drawings(operations, letter_page());
    assert!(drawings.len() <= 1, "expected at most one drawing: {drawings:?}");
    drawings.pop()
}

#[test]
fn given_ruled_grid_when_scanning_then_counts_distinct_rules() {
    let operations = vec![
        op("re", &[0, 0, 200, 90]),
        op("m", &[0, 30]),
        op("l", &[200, 30]),
        op("m", &[0, 60]),
        op("l", &[200, 60]),
        op("m", &[100, 0]),
        op("l", &[100, 90]),
        op("S", &[]),
    ];

    let drawing = scan_drawing(&operations).unwrap();

    assert_eq!(
        drawing,
        PdfObject::Drawing {
            width: 200,
            height: 90,
            horizontal_rules: 4,
            vertical_rules: 3,
            segments: 7,
        }
    );
}

#[test]
fn given_closed_triangle_when_scanning_then_closing_edge_is_a_segment() {
    let operations = vec![
        op("m", &[0, 0]),
        op("l", &[50, 0]),
        op("l", &[50, 40]),
        op("h", &[]),
        op("f", &[]),
    ];

    let Some(PdfObject::Drawing {
        horizontal_rules,
        vertical_rules,
        segments,
        ..
    }) = scan_drawing(&operations)
    else {
        panic!("expected a drawing");
    };

    assert_eq!((horizontal_rules, vertical_rules, segments), (1, 1, 3));
}

#[test]
fn given_single_underline_when_scanning_then_no_drawing() {
    let operations = vec![op("m", &[10, 10]), op("l", &[120, 10]), op("S", &[])];
    assert_eq!(scan_drawing(&operations), None);
}

#[test]
fn given_only_text_operators_when_scanning_then_no_drawing() {
    let operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Td", vec![72.into(), 700.into()]),
        Operation::new("ET", vec![]),
    ];
    assert_eq!(scan_drawing(&operations), None);
}

#[test]
fn given_curves_when_scanning_then_only_move_the_cursor() {
    let operations = vec![
        op("m", &[0, 0]),
        op("c", &[10, 20, 30, 20, 40, 0]),
        op("l", &[40, 50]),
        op("l", &[0, 50]),
        op("l", &[0, 0]),
    ];

    let Some(PdfObject::Drawing { segments, vertical_rules, .. }) = scan_drawing(&operations)
    else {
        panic!("expected a drawing");
    };

    assert_eq!(segments, 3);
    assert_eq!(vertical_rules, 2);
}

#[test]
fn given_page_background_fill_when_scanning_then_no_drawing() {
    let operations = vec![op("re", &[0, 0, 612, 792]), op("f", &[])];

    assert!(scan_drawings(&operations, letter_page()).is_empty());
}

#[test]
fn given_background_fill_under_grid_when_scanning_then_only_grid_remains() {
    let operations = vec![
        op("re", &[0, 0, 612, 792]),
        op("f", &[]),
        op("re", &[72, 500, 200, 90]),
        op("m", &[72, 530]),
        op("l", &[272, 530]),
        op("m", &[172, 500]),
        op("l", &[172, 590]),
        op("S", &[]),
    ];

    let drawing = scan_drawing(&operations).unwrap();

    assert_eq!(
        drawing,
        PdfObject::Drawing {
            width: 200,
            height: 90,
            horizontal_rules: 3,
            vertical_rules: 3,
            segments: 6,
        }
    );
}

#[test]
fn given_unknown_page_size_when_scanning_full_rectangle_then_kept_as_box() {
    let operations = vec![op("re", &[0, 0, 612, 792]), op("f", &[])];

    let drawings = scan_drawings(&operations, None);

    assert_eq!(
        drawings,
        vec![PdfObject::Drawing {
            width: 612,
            height: 792,
            horizontal_rules: 2,
            vertical_rules: 2,
            segments: 4,
        }]
    );
}

#[test]
fn given_two_separate_figures_when_scanning_then_one_drawing_each_top_first() {
    let operations = vec![
        op("re", &[72, 100, 150, 60]),
        op("S", &[]),
        op("m", &[300, 600]),
        op("l", &[400, 600]),
        op("l", &[350, 680]),
        op("h", &[]),
        op("S", &[]),
    ];

    let drawings = scan_drawings(&operations, letter_page());

    assert_eq!(drawings.len(), 2);
    assert!(matches!(
        drawings[0],
        PdfObject::Drawing { width: 100, height: 80, segments: 3, .. }
    ));
    assert!(matches!(
        drawings[1],
        PdfObject::Drawing { width: 150, height: 60, segments: 4, .. }
    ));
}
