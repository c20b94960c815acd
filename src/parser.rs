use std::borrow::Cow;

use crate::ast::Document;
use crate::block_parser::parse_tokens;
use crate::lexer::{Token, tokenize};

/// Parses Org text into a document tree. Total: any input, including malformed
/// markup, yields a tree whose unmatched delimiters appear as literal text.
///
/// Line endings are normalized first, so CR bytes never reach the tree: leaf text
/// covers the input as returned by [`normalize_line_endings`], not the raw bytes.
pub fn parse(input: &str) -> Document {
    let input = normalize_line_endings(input);
    let tokens = tokenize(&input);
    debug_tokens(&tokens);
    let doc = parse_tokens(&tokens);
    log::debug!("Parsed document with {} nodes", doc.len());
    doc
}

/// CRLF and lone CR line endings become LF.
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

fn debug_tokens(tokens: &[Token]) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    log::trace!("Tokens:");
    for (i, token) in tokens.iter().enumerate() {
        log::trace!(
            "  {}: {:?} = {:?} ({}:{})",
            i,
            token.kind,
            token.text,
            token.line,
            token.column
        );
    }
}
