use super::BlockParser;
use crate::ast::{GreaterBlock, NodeId, NodeKind};
use crate::predicates::{
    at_eof, concat, kind_at, line_end, match_fixed_width, match_keyword_start, next_line,
    read_key, trim_blanks,
};
use crate::syntax::TokenKind;

/// A recognised `#+` line.
#[derive(Debug)]
pub(super) enum HashLine {
    /// `#+KEY: value`; `end` is the line terminator.
    Keyword {
        key: String,
        value: String,
        end: usize,
    },
    /// `#+BEGIN_NAME params` through `#+END_NAME`.
    Block {
        name: String,
        parameters: String,
        /// The BEGIN line's newline.
        body_start: usize,
        /// First token of the END line.
        body_end: usize,
        /// Terminator of the END line.
        end: usize,
    },
}

impl BlockParser<'_, '_> {
    /// Classifies a `#+` line at `i`. A BEGIN line only matches when its END line
    /// exists; a keyword needs a colon right after its name.
    pub(super) fn match_hash_line(&self, i: usize) -> Option<HashLine> {
        let tokens = self.tokens;
        let after = match_keyword_start(tokens, i)?;
        let (key, stop) = read_key(tokens, after);
        let eol = line_end(tokens, stop);

        if let Some(name) = key.to_ascii_uppercase().strip_prefix("BEGIN_") {
            if name.is_empty() {
                return None;
            }
            let (start, stop) = trim_blanks(tokens, stop, eol);
            let parameters = concat(&tokens[start..stop]);
            let opening = format!("BEGIN_{name}");
            let closing = format!("END_{name}");

            // Same-name blocks nest; the END that balances this BEGIN closes it.
            let mut depth = 0usize;
            let mut j = next_line(tokens, eol);
            while !at_eof(tokens, j) {
                if let Some(after_key) = match_keyword_start(tokens, j) {
                    let (line_key, key_stop) = read_key(tokens, after_key);
                    let line_key = line_key.to_ascii_uppercase();
                    if line_key == opening {
                        depth += 1;
                    } else if line_key == closing && depth > 0 {
                        depth -= 1;
                    } else if line_key == closing {
                        return Some(HashLine::Block {
                            name: name.to_string(),
                            parameters,
                            body_start: eol,
                            body_end: j,
                            end: line_end(tokens, key_stop),
                        });
                    }
                }
                j = next_line(tokens, j);
            }
            log::trace!("Unterminated #+BEGIN_{name}");
            return None;
        }

        if key.is_empty() || kind_at(tokens, stop) != TokenKind::Colon {
            return None;
        }
        let (start, stop) = trim_blanks(tokens, stop + 1, eol);
        Some(HashLine::Keyword {
            key,
            value: concat(&tokens[start..stop]),
            end: eol,
        })
    }

    pub(super) fn parse_hash_line(&mut self, container: NodeId, line: HashLine) {
        let tokens = self.tokens;
        match line {
            HashLine::Keyword { key, value, end } => {
                log::debug!("Keyword {key} at line {}", self.line());
                self.doc.append(container, NodeKind::Keyword { key, value });
                self.pos = next_line(tokens, end);
            }
            HashLine::Block {
                name,
                parameters,
                body_start,
                body_end,
                end,
            } => {
                log::debug!("Greater block {name} at line {}", self.line());
                let language = if name == "SRC" {
                    parameters.split_whitespace().next().map(str::to_string)
                } else {
                    None
                };
                let block = GreaterBlock {
                    value: concat(&tokens[body_start..body_end]),
                    name,
                    language,
                    parameters,
                };
                let verbatim = block.is_verbatim();
                let verse = block.name == "VERSE";
                let node = self.doc.append(container, NodeKind::GreaterBlock(block));

                // The body proper starts after the BEGIN line's newline.
                let inner = (body_start + 1).min(body_end);
                if verse {
                    let last = body_end.saturating_sub(1).max(inner);
                    let stop = if kind_at(tokens, last) == TokenKind::Newline {
                        last
                    } else {
                        body_end
                    };
                    self.inline(node, inner, stop);
                } else if !verbatim {
                    BlockParser::nested(&tokens[inner..body_end], &mut *self.doc, node).parse();
                }

                self.pos = next_line(tokens, end);
            }
        }
    }

    /// Consecutive fixed-width lines merged into one node, markers stripped.
    pub(super) fn parse_fixed_width(&mut self, container: NodeId) {
        let tokens = self.tokens;
        let mut lines = Vec::new();

        while let Some(content) = match_fixed_width(tokens, self.pos) {
            let end = line_end(tokens, content);
            lines.push(concat(&tokens[content..end]));
            self.pos = next_line(tokens, end);
        }

        log::debug!("Fixed-width block of {} lines", lines.len());
        self.doc.append(
            container,
            NodeKind::FixedWidth {
                value: lines.join("\n"),
            },
        );
    }
}
