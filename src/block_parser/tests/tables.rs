use crate::ast::NodeKind;
use crate::block_parser::tests::helpers::{assert_tree, child_names, find_first, parse_blocks};

#[test]
fn parses_table_with_rule_row() {
    assert_tree(
        "| a | b |\n|---+---|\n| c | d |\n",
        "Root\n  Section\n    Table\n      TableRow\n        TableCell\n          Text \"a\"\n        TableCell\n          Text \"b\"\n      TableRow rule\n      TableRow\n        TableCell\n          Text \"c\"\n        TableCell\n          Text \"d\"\n",
    );
}

#[test]
fn rule_row_has_no_cells() {
    let doc = parse_blocks("|---|\n");
    let row = find_first(&doc, "TableRow").unwrap();
    assert_eq!(row.kind(), &NodeKind::TableRow { is_rule: true });
    assert!(row.first_child().is_none());
}

#[test]
fn closing_pipe_is_optional() {
    let doc = parse_blocks("| a | b\n");
    let row = find_first(&doc, "TableRow").unwrap();
    let cells: Vec<_> = row.children().map(|c| c.raw_text()).collect();
    assert_eq!(cells, vec!["a", "b"]);
}

#[test]
fn empty_cell_has_no_children() {
    let doc = parse_blocks("| | x |\n");
    let row = find_first(&doc, "TableRow").unwrap();
    let cells: Vec<_> = row.children().collect();
    assert_eq!(cells.len(), 2);
    assert!(cells[0].first_child().is_none());
}

#[test]
fn indented_rows_are_tables() {
    let doc = parse_blocks("  | x |\n  | y |\n");
    let table = find_first(&doc, "Table").unwrap();
    assert_eq!(child_names(table), vec!["TableRow", "TableRow"]);
}

#[test]
fn table_ends_at_non_pipe_line() {
    let doc = parse_blocks("| a |\ntext\n");
    let section = doc.root().first_child().unwrap();
    assert_eq!(child_names(section), vec!["Table", "Paragraph"]);
}

#[test]
fn cells_hold_inline_markup() {
    assert_tree(
        "| *b* |\n",
        "Root\n  Section\n    Table\n      TableRow\n        TableCell\n          Bold\n            Text \"b\"\n",
    );
}

#[test]
fn plus_only_row_is_rule() {
    let doc = parse_blocks("| a |\n|+|\n| b |\n");
    let table = find_first(&doc, "Table").unwrap();
    let rules: Vec<_> = table
        .children()
        .map(|row| matches!(row.kind(), NodeKind::TableRow { is_rule: true }))
        .collect();
    assert_eq!(rules, vec![false, true, false]);
}
