use crate::syntax::TokenKind;

/// A lexical token. `text` borrows from the input; `offset..end` is its byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub end: usize,
}

/// Pull-based tokenizer. Yields every token of the input followed by exactly one
/// `Eof` token, then `None`.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    /// Line/column just past the most recent newline, before the line counter moved.
    after_newline: (usize, usize),
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            after_newline: (1, 1),
            finished: false,
        }
    }

    pub fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.after_newline = (self.line, self.column + 1);
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    pub fn advance_while<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(char) -> bool,
    {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if !predicate(ch) {
                break;
            }
            self.advance();
        }
        self.pos - start
    }

    fn eof_token(&self) -> Token<'a> {
        // A trailing newline does not open a new line for the end marker.
        let (line, column) = if self.input.ends_with('\n') {
            self.after_newline
        } else {
            (self.line, self.column)
        };
        Token {
            kind: TokenKind::Eof,
            text: "",
            line,
            column,
            offset: self.input.len(),
            end: self.input.len(),
        }
    }

    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }

        let start = self.pos;
        let (line, column) = (self.line, self.column);

        let Some(ch) = self.current_char() else {
            self.finished = true;
            return Some(self.eof_token());
        };

        let kind = match TokenKind::of(ch) {
            Some(kind) => {
                self.advance();
                kind
            }
            None => {
                self.advance_while(|c| TokenKind::of(c).is_none());
                TokenKind::Text
            }
        };

        Some(Token {
            kind,
            text: &self.input[start..self.pos],
            line,
            column,
            offset: start,
            end: self.pos,
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Splits `input` into tokens. Never fails; the empty string yields a single `Eof`.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();

    for token in Lexer::new(input) {
        log::trace!(
            "Token {}: {:?} {:?} at {}:{}",
            tokens.len(),
            token.kind,
            token.text,
            token.line,
            token.column
        );
        tokens.push(token);
    }

    log::debug!("Tokenization complete. {} tokens generated.", tokens.len());
    tokens
}
