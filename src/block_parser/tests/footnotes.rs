use crate::block_parser::tests::helpers::{assert_tree, child_names, find_first, parse_blocks};

#[test]
fn reference_and_definition() {
    assert_tree(
        "The homepage[fn:1] text.\n[fn:1] The link is: https://orgmode.org",
        "Root\n  Section\n    Paragraph\n      Text \"The homepage\"\n      FootnoteReference \"1\" Numbered\n      Text \" text.\"\n    FootnoteDefinition \"1\"\n      Text \"The link is: https://orgmode.org\"\n",
    );
}

#[test]
fn definition_spans_lines() {
    let doc = parse_blocks("[fn:1] line one\nline two\n");
    let definition = find_first(&doc, "FootnoteDefinition").unwrap();
    assert_eq!(definition.raw_text(), "line one\nline two");
}

#[test]
fn definition_stops_at_next_definition() {
    let doc = parse_blocks("[fn:a] first\n[fn:b] second\n");
    let section = doc.root().first_child().unwrap();
    assert_eq!(
        child_names(section),
        vec!["FootnoteDefinition", "FootnoteDefinition"]
    );
}

#[test]
fn indented_marker_is_a_reference() {
    assert_tree(
        " [fn:1] x\n",
        "Root\n  Section\n    Paragraph\n      FootnoteReference \"1\" Numbered\n      Text \" x\"\n",
    );
}

#[test]
fn definition_under_headline() {
    let doc = parse_blocks("* H\n[fn:1] note\n");
    let definition = find_first(&doc, "FootnoteDefinition").unwrap();
    let names: Vec<_> = definition.ancestors().map(|n| n.kind().name()).collect();
    assert_eq!(names, vec!["Section", "Headline", "Root"]);
}
