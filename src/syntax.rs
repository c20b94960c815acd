/// Kinds of tokens produced by the lexer.
///
/// Every punctuation character the grammar cares about is a token of its own;
/// all other characters are grouped into maximal `Text` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Newline,
    Asterisk,     // *
    Tilde,        // ~
    ForwardSlash, // /
    Underscore,   // _
    Plus,         // +
    Colon,        // :
    Space,
    Tab,
    Bracket,     // [ or ]
    Backtick,    // `
    Parenthesis, // ( or )
    Equal,       // =
    Pipe,        // |
    Dash,        // -
    Hash,        // #
    Text,
    Eof,
}

impl TokenKind {
    /// Punctuation lookup table: the token kind a single character forms on its own,
    /// or `None` when the character belongs to a text run.
    pub const fn of(ch: char) -> Option<TokenKind> {
        match ch {
            '\n' => Some(TokenKind::Newline),
            '*' => Some(TokenKind::Asterisk),
            '~' => Some(TokenKind::Tilde),
            '/' => Some(TokenKind::ForwardSlash),
            '_' => Some(TokenKind::Underscore),
            '+' => Some(TokenKind::Plus),
            ':' => Some(TokenKind::Colon),
            ' ' => Some(TokenKind::Space),
            '\t' => Some(TokenKind::Tab),
            '[' | ']' => Some(TokenKind::Bracket),
            '`' => Some(TokenKind::Backtick),
            '(' | ')' => Some(TokenKind::Parenthesis),
            '=' => Some(TokenKind::Equal),
            '|' => Some(TokenKind::Pipe),
            '-' => Some(TokenKind::Dash),
            '#' => Some(TokenKind::Hash),
            _ => None,
        }
    }

    /// Space or tab. Newlines are not included.
    pub fn is_blank(self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Tab)
    }

    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Tab | TokenKind::Newline)
    }

    /// True for line terminators, including the end of input.
    pub fn ends_line(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Eof)
    }
}
