use crate::ast::{Document, NodeId, NodeKind};
use crate::inline_parser::parse_inline;
use crate::lexer::Token;
use crate::predicates::{
    at_eof, indentation, is_blank_line, is_trailing_blank, line_end, match_bullet,
    match_fixed_width, match_footnote_definition, match_headline_stars, match_horizontal_rule,
    match_table_row, next_line, trim_blanks,
};

mod blocks;
mod footnotes;
mod headlines;
mod lists;
mod tables;

pub use headlines::TODO_KEYWORDS;

/// Builds the block structure of a document from its tokens.
///
/// The parser walks the token stream line by line. At each line start it runs an
/// ordered battery of matchers (headline, list, table, `#+` line, footnote definition,
/// horizontal rule, fixed-width) and falls back to a paragraph. The first matcher that
/// accepts the line consumes its block; nothing is ever re-parsed.
pub struct BlockParser<'p, 'a> {
    tokens: &'p [Token<'a>],
    doc: &'p mut Document,
    pos: usize,
    /// Node receiving the next block: the innermost open headline, the root, or the
    /// greater block being parsed.
    parent: NodeId,
    /// Depth of the innermost open headline, 0 at top level.
    depth: usize,
    allow_headlines: bool,
}

impl<'p, 'a> BlockParser<'p, 'a> {
    pub fn new(tokens: &'p [Token<'a>], doc: &'p mut Document) -> Self {
        let parent = doc.root_id();
        Self {
            tokens,
            doc,
            pos: 0,
            parent,
            depth: 0,
            allow_headlines: true,
        }
    }

    /// Parser for the body of a greater block; headlines are not recognised there.
    fn nested(tokens: &'p [Token<'a>], doc: &'p mut Document, parent: NodeId) -> Self {
        Self {
            tokens,
            doc,
            pos: 0,
            parent,
            depth: 0,
            allow_headlines: false,
        }
    }

    pub fn parse(mut self) {
        log::debug!("Starting block parse over {} tokens", self.tokens.len());

        while !at_eof(self.tokens, self.pos) {
            if is_blank_line(self.tokens, self.pos) {
                self.pos = next_line(self.tokens, self.pos);
                continue;
            }
            if is_trailing_blank(self.tokens, self.pos) {
                break;
            }

            let start = self.pos;
            self.parse_block();

            debug_assert!(self.pos > start, "block parser stuck at token {start}");
            if self.pos <= start {
                self.pos = next_line(self.tokens, start);
            }
        }

        log::debug!("Finished block parse");
    }

    fn parse_block(&mut self) {
        let tokens = self.tokens;
        let pos = self.pos;

        if self.allow_headlines
            && let Some(depth) = match_headline_stars(tokens, pos)
        {
            self.parse_headline(depth);
            return;
        }

        if let Some(bullet) = match_bullet(tokens, pos) {
            log::debug!("List at line {}", self.line());
            let container = self.container();
            self.parse_list(container, bullet);
            return;
        }

        if match_table_row(tokens, pos).is_some() {
            log::debug!("Table at line {}", self.line());
            let container = self.container();
            self.parse_table(container);
            return;
        }

        if let Some(line) = self.match_hash_line(pos) {
            let container = self.container();
            self.parse_hash_line(container, line);
            return;
        }

        if let Some((label, after)) = match_footnote_definition(tokens, pos) {
            let container = self.container();
            self.parse_footnote_definition(container, label, after);
            return;
        }

        if match_horizontal_rule(tokens, pos) {
            log::debug!("Horizontal rule at line {}", self.line());
            let container = self.container();
            self.doc.append(container, NodeKind::HorizontalRule);
            self.pos = next_line(tokens, pos);
            return;
        }

        if match_fixed_width(tokens, pos).is_some() {
            let container = self.container();
            self.parse_fixed_width(container);
            return;
        }

        self.parse_paragraph();
    }

    /// True when the line at `i` opens a block other than a paragraph.
    fn starts_block(&self, i: usize) -> bool {
        let tokens = self.tokens;
        (self.allow_headlines && match_headline_stars(tokens, i).is_some())
            || match_bullet(tokens, i).is_some()
            || match_table_row(tokens, i).is_some()
            || self.match_hash_line(i).is_some()
            || match_footnote_definition(tokens, i).is_some()
            || match_horizontal_rule(tokens, i)
            || match_fixed_width(tokens, i).is_some()
    }

    /// Node that receives a non-headline block. Under the root or a headline this is
    /// the trailing `Section`, created when missing.
    fn container(&mut self) -> NodeId {
        if !self.doc.kind(self.parent).holds_sections() {
            return self.parent;
        }
        if let Some(last) = self.doc.last_child(self.parent)
            && matches!(self.doc.kind(last), NodeKind::Section)
        {
            return last;
        }
        self.doc.append(self.parent, NodeKind::Section)
    }

    /// Index of the terminator of the last line of a paragraph-like run starting at
    /// `start`. The run stops before a blank line, the end of input, or a line that
    /// opens another block.
    fn paragraph_end(&self, start: usize) -> usize {
        let tokens = self.tokens;
        let mut end = line_end(tokens, start);
        loop {
            let i = next_line(tokens, end);
            if at_eof(tokens, i)
                || is_blank_line(tokens, i)
                || is_trailing_blank(tokens, i)
                || self.starts_block(i)
            {
                return end;
            }
            end = line_end(tokens, i);
        }
    }

    fn parse_paragraph(&mut self) {
        let tokens = self.tokens;
        let (_, start) = indentation(tokens, self.pos);
        let end = self.paragraph_end(start);
        log::debug!("Paragraph at line {}", self.line());

        let container = self.container();
        let paragraph = self.doc.append(container, NodeKind::Paragraph);
        self.inline(paragraph, start, end);
        self.pos = next_line(tokens, end);
    }

    /// Inline-parses `start..end` (blank-trimmed) under `parent`.
    fn inline(&mut self, parent: NodeId, start: usize, end: usize) {
        let tokens = self.tokens;
        let (start, end) = trim_blanks(tokens, start, end);
        if start < end {
            parse_inline(self.doc, parent, &tokens[start..end]);
        }
    }

    fn line(&self) -> usize {
        self.tokens.get(self.pos).map_or(0, |t| t.line)
    }
}

/// Parses a token sequence into a document tree.
pub fn parse_tokens(tokens: &[Token]) -> Document {
    let mut doc = Document::new();
    BlockParser::new(tokens, &mut doc).parse();
    doc
}
