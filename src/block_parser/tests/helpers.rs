use crate::ast::{Document, NodeRef};
use crate::block_parser::parse_tokens;
use crate::lexer::tokenize;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn parse_blocks(input: &str) -> Document {
    init_logger();
    parse_tokens(&tokenize(input))
}

pub fn find_first<'d>(doc: &'d Document, name: &str) -> Option<NodeRef<'d>> {
    doc.root()
        .descendants()
        .into_iter()
        .find(|n| n.kind().name() == name)
}

pub fn child_names(node: NodeRef<'_>) -> Vec<&'static str> {
    node.children().map(|n| n.kind().name()).collect()
}

pub fn assert_tree(input: &str, expected: &str) {
    let doc = parse_blocks(input);
    similar_asserts::assert_eq!(
        doc.dump(),
        expected,
        "Tree did not match for input:\n{}",
        input
    );
}
