use crate::ast::NodeKind;
use crate::block_parser::tests::helpers::{assert_tree, child_names, find_first, parse_blocks};

#[test]
fn parses_simple_headline() {
    assert_tree(
        "* a h1 heading\n",
        "Root\n  Headline depth=1\n    Text \"a h1 heading\"\n",
    );
}

#[test]
fn parses_keyword_priority_and_tags() {
    assert_tree(
        "** TODO [#A] Write the parser :work:rust:\n",
        "Root\n  Headline depth=2 keyword=TODO priority=A tags=work:rust\n    Text \"Write the parser\"\n",
    );
}

#[test]
fn keyword_must_be_a_whole_word() {
    let doc = parse_blocks("* TODOS are not keywords\n");
    let headline = find_first(&doc, "Headline").unwrap();
    match headline.kind() {
        NodeKind::Headline(h) => assert_eq!(h.keyword, None),
        other => panic!("expected headline, got {other}"),
    }
    assert_eq!(headline.raw_text(), "TODOS are not keywords");
}

#[test]
fn keyword_alone_leaves_empty_title() {
    assert_tree("* DONE\n", "Root\n  Headline depth=1 keyword=DONE\n");
}

#[test]
fn priority_without_keyword() {
    assert_tree(
        "* [#B] Later\n",
        "Root\n  Headline depth=1 priority=B\n    Text \"Later\"\n",
    );
}

#[test]
fn tags_must_end_the_line() {
    assert_tree(
        "* a :b: c\n",
        "Root\n  Headline depth=1\n    Text \"a :b: c\"\n",
    );
}

#[test]
fn title_holds_inline_markup() {
    assert_tree(
        "* Hello *world*\n",
        "Root\n  Headline depth=1\n    Text \"Hello \"\n    Bold\n      Text \"world\"\n",
    );
}

#[test]
fn deeper_headlines_nest() {
    assert_tree(
        "* A\n** B\ntext\n* C\n",
        "Root\n  Headline depth=1\n    Text \"A\"\n    Headline depth=2\n      Text \"B\"\n      Section\n        Paragraph\n          Text \"text\"\n  Headline depth=1\n    Text \"C\"\n",
    );
}

#[test]
fn skipped_levels_attach_to_nearest_shallower() {
    let doc = parse_blocks("* A\n*** C\n** B\n");
    let a = doc.root().first_child().unwrap();
    assert_eq!(child_names(a), vec!["Text", "Headline", "Headline"]);
}

#[test]
fn shallower_headline_closes_deeper_ones() {
    let doc = parse_blocks("** A\n* B\n");
    assert_eq!(child_names(doc.root()), vec!["Headline", "Headline"]);
}

#[test]
fn content_before_first_headline_goes_in_section() {
    assert_tree(
        "intro\n* H\n",
        "Root\n  Section\n    Paragraph\n      Text \"intro\"\n  Headline depth=1\n    Text \"H\"\n",
    );
}

#[test]
fn title_and_body_are_split() {
    let doc = parse_blocks("* Title here\nBody text\n");
    let headline = find_first(&doc, "Headline").unwrap();
    let title: Vec<_> = headline.title().map(|n| n.raw_text()).collect();
    assert_eq!(title, vec!["Title here"]);
    let body: Vec<_> = headline.body().map(|n| n.kind().name()).collect();
    assert_eq!(body, vec!["Section"]);
}

#[test]
fn stars_without_space_are_not_headlines() {
    assert_tree(
        "*bold* text\n",
        "Root\n  Section\n    Paragraph\n      Bold\n        Text \"bold\"\n      Text \" text\"\n",
    );
}

#[test]
fn more_than_six_stars_is_a_paragraph() {
    assert_tree(
        "******* deep\n",
        "Root\n  Section\n    Paragraph\n      Text \"******* deep\"\n",
    );
}
