use crate::ast::{Document, FootnoteKind, NodeId, NodeKind};
use crate::lexer::{Token, tokenize};
use crate::predicates::{
    concat, ends_word, is_bracket, kind_at, match_footnote_start, starts_word, text_at,
};
use crate::syntax::TokenKind;

/// Emphasis markers: delimiter token and the node it produces. Verbatim and code keep
/// their interior as literal text.
const EMPHASIS: &[(TokenKind, Markup)] = &[
    (TokenKind::Asterisk, Markup::Bold),
    (TokenKind::Equal, Markup::Verbatim),
    (TokenKind::ForwardSlash, Markup::Italic),
    (TokenKind::Plus, Markup::Strikethrough),
    (TokenKind::Underscore, Markup::Underline),
    (TokenKind::Tilde, Markup::Code),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markup {
    Bold,
    Verbatim,
    Italic,
    Strikethrough,
    Underline,
    Code,
}

impl Markup {
    fn node(self) -> NodeKind {
        match self {
            Markup::Bold => NodeKind::Bold,
            Markup::Verbatim => NodeKind::Verbatim,
            Markup::Italic => NodeKind::Italic,
            Markup::Strikethrough => NodeKind::Strikethrough,
            Markup::Underline => NodeKind::Underline,
            Markup::Code => NodeKind::Code,
        }
    }

    fn is_literal(self) -> bool {
        matches!(self, Markup::Verbatim | Markup::Code)
    }
}

/// A recognised inline construct covering `start..end`.
#[derive(Debug)]
enum Span {
    Link {
        end: usize,
        target: String,
        description: Option<(usize, usize)>,
    },
    Footnote {
        end: usize,
        label: String,
        kind: FootnoteKind,
        body: Option<(usize, usize)>,
    },
    Emphasis {
        markup: Markup,
        close: usize,
    },
    Dash {
        end: usize,
        node: NodeKind,
    },
}

/// Resolves emphasis, links and footnote references inside the token span of one
/// block, appending the resulting nodes under a parent. Anything that does not match
/// a construct stays literal text.
pub struct InlineParser<'p, 'a> {
    tokens: &'p [Token<'a>],
    doc: &'p mut Document,
}

impl<'p, 'a> InlineParser<'p, 'a> {
    pub fn new(tokens: &'p [Token<'a>], doc: &'p mut Document) -> Self {
        Self { tokens, doc }
    }

    pub fn parse_into(&mut self, parent: NodeId) {
        let end = self.tokens.len();
        self.parse_range(parent, 0, end);
    }

    fn parse_range(&mut self, parent: NodeId, start: usize, end: usize) {
        let mut text_start = start;
        let mut i = start;

        while i < end {
            match self.match_span(i, start, end) {
                Some(span) => {
                    self.flush_text(parent, text_start, i);
                    i = self.emit(parent, i, span);
                    text_start = i;
                }
                None => i += 1,
            }
        }

        self.flush_text(parent, text_start, end);
    }

    fn flush_text(&mut self, parent: NodeId, start: usize, end: usize) {
        if start < end {
            let text = concat(&self.tokens[start..end]);
            log::trace!("Inline text {text:?}");
            self.doc.append_text(parent, text);
        }
    }

    fn match_span(&self, i: usize, start: usize, end: usize) -> Option<Span> {
        match self.tokens[i].kind {
            TokenKind::Bracket => self
                .match_link(i, end)
                .or_else(|| self.match_footnote(i, end)),
            TokenKind::Dash => self.match_dash(i, start, end),
            kind => {
                let &(_, markup) = EMPHASIS.iter().find(|(delim, _)| *delim == kind)?;
                self.match_emphasis(i, start, end, markup)
            }
        }
    }

    /// Appends the node for `span` opened at `i` and returns the index just past it.
    fn emit(&mut self, parent: NodeId, i: usize, span: Span) -> usize {
        log::trace!("Inline span at {i}: {span:?}");
        match span {
            Span::Link {
                end,
                target,
                description,
            } => {
                let link = self.doc.append(parent, NodeKind::Link { target });
                if let Some((from, to)) = description {
                    self.parse_range(link, from, to);
                }
                end
            }
            Span::Footnote {
                end,
                label,
                kind,
                body,
            } => {
                let reference = self
                    .doc
                    .append(parent, NodeKind::FootnoteReference { label, kind });
                if let Some((from, to)) = body {
                    self.parse_range(reference, from, to);
                }
                end
            }
            Span::Emphasis { markup, close } => {
                let node = self.doc.append(parent, markup.node());
                if markup.is_literal() {
                    let text = concat(&self.tokens[i + 1..close]);
                    self.doc.append_text(node, text);
                } else {
                    self.parse_range(node, i + 1, close);
                }
                close + 1
            }
            Span::Dash { end, node } => {
                self.doc.append(parent, node);
                end
            }
        }
    }

    /// `[[target]]` or `[[target][description]]`.
    fn match_link(&self, i: usize, end: usize) -> Option<Span> {
        let tokens = &self.tokens[..end];
        if !is_bracket(tokens, i, "[") || !is_bracket(tokens, i + 1, "[") {
            return None;
        }

        let target_start = i + 2;
        let mut j = target_start;
        loop {
            match kind_at(tokens, j) {
                TokenKind::Bracket if text_at(tokens, j) == "]" => break,
                TokenKind::Bracket | TokenKind::Newline | TokenKind::Eof => return None,
                _ => j += 1,
            }
        }
        if j == target_start {
            return None;
        }
        let target = concat(&tokens[target_start..j]);

        if is_bracket(tokens, j + 1, "]") {
            return Some(Span::Link {
                end: j + 2,
                target,
                description: None,
            });
        }
        if !is_bracket(tokens, j + 1, "[") {
            return None;
        }

        let desc_start = j + 2;
        let mut depth = 0usize;
        let mut k = desc_start;
        loop {
            match kind_at(tokens, k) {
                TokenKind::Eof => return None,
                TokenKind::Bracket if text_at(tokens, k) == "[" => depth += 1,
                TokenKind::Bracket if depth > 0 => depth -= 1,
                TokenKind::Bracket => {
                    if !is_bracket(tokens, k + 1, "]") {
                        return None;
                    }
                    break;
                }
                _ => {}
            }
            k += 1;
        }

        Some(Span::Link {
            end: k + 2,
            target,
            description: (k > desc_start).then_some((desc_start, k)),
        })
    }

    /// `[fn:label]`, `[fn::inline text]` or `[fn:label:inline text]`.
    fn match_footnote(&self, i: usize, end: usize) -> Option<Span> {
        let tokens = &self.tokens[..end];
        let label_start = match_footnote_start(tokens, i)?;

        let mut j = label_start;
        loop {
            match kind_at(tokens, j) {
                TokenKind::Colon => break,
                TokenKind::Bracket if text_at(tokens, j) == "]" => break,
                TokenKind::Bracket
                | TokenKind::Space
                | TokenKind::Tab
                | TokenKind::Newline
                | TokenKind::Eof => return None,
                _ => j += 1,
            }
        }
        let label = concat(&tokens[label_start..j]);

        if kind_at(tokens, j) == TokenKind::Bracket {
            if label.is_empty() {
                return None;
            }
            return Some(Span::Footnote {
                end: j + 1,
                label,
                kind: FootnoteKind::Numbered,
                body: None,
            });
        }

        let body_start = j + 1;
        let mut depth = 0usize;
        let mut k = body_start;
        loop {
            match kind_at(tokens, k) {
                TokenKind::Eof => return None,
                TokenKind::Bracket if text_at(tokens, k) == "[" => depth += 1,
                TokenKind::Bracket if depth > 0 => depth -= 1,
                TokenKind::Bracket => break,
                _ => {}
            }
            k += 1;
        }

        let kind = if label.is_empty() {
            FootnoteKind::InlineAnonymous
        } else {
            FootnoteKind::InlineLabeled
        };
        Some(Span::Footnote {
            end: k + 1,
            label,
            kind,
            body: (k > body_start).then_some((body_start, k)),
        })
    }

    /// Delimited emphasis. The opener must follow the span start, whitespace or
    /// punctuation and precede a non-blank token other than itself. The closer must
    /// follow a non-blank token and precede the span end, whitespace or punctuation.
    fn match_emphasis(&self, i: usize, start: usize, end: usize, markup: Markup) -> Option<Span> {
        let delim = self.tokens[i].kind;

        if i > start && ends_word(&self.tokens[i - 1]) {
            return None;
        }
        let next = self.tokens.get(i + 1).filter(|_| i + 1 < end)?;
        if next.kind.is_whitespace() || next.kind == delim || next.kind == TokenKind::Eof {
            return None;
        }

        (i + 2..end)
            .find(|&j| {
                self.tokens[j].kind == delim
                    && !self.tokens[j - 1].kind.is_whitespace()
                    && (j + 1 >= end || !starts_word(&self.tokens[j + 1]))
            })
            .map(|close| Span::Emphasis { markup, close })
    }

    /// `--` and `---` runs; longer or shorter runs stay literal.
    fn match_dash(&self, i: usize, start: usize, end: usize) -> Option<Span> {
        if i > start && self.tokens[i - 1].kind == TokenKind::Dash {
            return None;
        }
        let run = self.tokens[i..end]
            .iter()
            .take_while(|t| t.kind == TokenKind::Dash)
            .count();
        let node = match run {
            2 => NodeKind::EnDash,
            3 => NodeKind::MDash,
            _ => return None,
        };
        Some(Span::Dash { end: i + run, node })
    }
}

/// Inline-parses `tokens` and appends the resulting nodes under `parent`.
pub fn parse_inline(doc: &mut Document, parent: NodeId, tokens: &[Token]) {
    InlineParser::new(tokens, doc).parse_into(parent);
}

/// Inline-parses a standalone string; the nodes become children of the root.
pub fn parse_inline_str(input: &str) -> Document {
    let tokens = tokenize(input);
    let span = &tokens[..tokens.len() - 1];
    let mut doc = Document::new();
    let root = doc.root_id();
    parse_inline(&mut doc, root, span);
    doc
}
