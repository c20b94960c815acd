use std::sync::LazyLock;

use regex::Regex;

use super::BlockParser;
use crate::ast::{Headline, NodeKind};
use crate::lexer::Token;
use crate::predicates::{concat, is_bracket, kind_at, line_end, next_line, text_at, trim_blanks};
use crate::syntax::TokenKind;

/// Keywords recognised at the start of a headline title.
pub const TODO_KEYWORDS: &[&str] = &["TODO", "DONE"];

/// Trailing `:tag1:tag2:` group of a headline.
static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:(?:[\w@#%]+:)+$").expect("tag pattern is valid"));

impl BlockParser<'_, '_> {
    /// Headline at `self.pos` with `depth` leading asterisks. The new headline becomes
    /// the parent of every following block until a headline of equal or lower depth.
    pub(super) fn parse_headline(&mut self, depth: usize) {
        let tokens = self.tokens;
        let end = line_end(tokens, self.pos);
        let mut i = self.pos + depth + 1;

        let mut attach = self.parent;
        if depth <= self.depth {
            loop {
                match self.doc.kind(attach) {
                    NodeKind::Headline(h) if h.depth >= depth => {
                        attach = self.doc.parent(attach).unwrap_or(self.doc.root_id());
                    }
                    _ => break,
                }
            }
        }
        log::debug!(
            "Headline depth {depth} at line {} (ambient depth {})",
            self.line(),
            self.depth
        );

        i = skip_blanks(tokens, i, end);

        let mut keyword = None;
        if kind_at(tokens, i) == TokenKind::Text
            && TODO_KEYWORDS.contains(&text_at(tokens, i))
            && (kind_at(tokens, i + 1).is_blank() || i + 1 == end)
        {
            keyword = Some(text_at(tokens, i).to_string());
            i = skip_blanks(tokens, i + 1, end);
        }

        let mut priority = None;
        if let Some(p) = match_priority(tokens, i, end) {
            priority = Some(p);
            i = skip_blanks(tokens, i + 4, end);
        }

        let (title_start, mut title_end) = trim_blanks(tokens, i, end);
        let mut tags = Vec::new();
        let tag_start = (title_start..title_end)
            .rev()
            .find(|&j| kind_at(tokens, j).is_blank())
            .map_or(title_start, |j| j + 1);
        if tag_start < title_end {
            let candidate = concat(&tokens[tag_start..title_end]);
            if TAGS.is_match(&candidate) {
                tags = candidate
                    .trim_matches(':')
                    .split(':')
                    .map(str::to_string)
                    .collect();
                title_end = tag_start;
            }
        }

        let headline = self.doc.append(
            attach,
            NodeKind::Headline(Headline {
                depth,
                keyword,
                priority,
                tags,
            }),
        );
        self.inline(headline, title_start, title_end);

        self.parent = headline;
        self.depth = depth;
        self.pos = next_line(tokens, end);
    }
}

fn skip_blanks(tokens: &[Token], mut i: usize, end: usize) -> usize {
    while i < end && kind_at(tokens, i).is_blank() {
        i += 1;
    }
    i
}

/// `[#A]` followed by a blank or the line end.
fn match_priority(tokens: &[Token], i: usize, end: usize) -> Option<char> {
    if !is_bracket(tokens, i, "[")
        || kind_at(tokens, i + 1) != TokenKind::Hash
        || kind_at(tokens, i + 2) != TokenKind::Text
        || !is_bracket(tokens, i + 3, "]")
        || !(i + 4 == end || kind_at(tokens, i + 4).is_blank())
    {
        return None;
    }
    let mut chars = text_at(tokens, i + 2).chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
