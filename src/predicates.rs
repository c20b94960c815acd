//! Token predicates shared by the block and inline parsers.
//!
//! All functions take a token slice and an index. Indices at or past the end of the
//! slice read as `Eof`, so a sub-slice behaves like a complete document.

use crate::ast::ListKind;
use crate::lexer::Token;
use crate::syntax::TokenKind;

pub const TAB_WIDTH: usize = 8;

pub fn kind_at(tokens: &[Token], i: usize) -> TokenKind {
    tokens.get(i).map_or(TokenKind::Eof, |t| t.kind)
}

pub fn text_at<'a>(tokens: &[Token<'a>], i: usize) -> &'a str {
    tokens.get(i).map_or("", |t| t.text)
}

pub fn is_bracket(tokens: &[Token], i: usize, text: &str) -> bool {
    kind_at(tokens, i) == TokenKind::Bracket && text_at(tokens, i) == text
}

pub fn at_eof(tokens: &[Token], i: usize) -> bool {
    kind_at(tokens, i) == TokenKind::Eof
}

pub fn is_line_start(tokens: &[Token], i: usize) -> bool {
    i == 0 || kind_at(tokens, i - 1) == TokenKind::Newline
}

/// Index of the Newline (or Eof) that terminates the line containing `i`.
pub fn line_end(tokens: &[Token], i: usize) -> usize {
    let mut j = i;
    while !kind_at(tokens, j).ends_line() {
        j += 1;
    }
    j
}

/// Index of the first token of the following line, or of the Eof.
pub fn next_line(tokens: &[Token], i: usize) -> usize {
    let end = line_end(tokens, i);
    if kind_at(tokens, end) == TokenKind::Newline {
        end + 1
    } else {
        end
    }
}

/// Width of the leading blanks at `i` (tabs count `TAB_WIDTH`) and the index of the
/// first token after them.
pub fn indentation(tokens: &[Token], i: usize) -> (usize, usize) {
    let mut width = 0;
    let mut j = i;
    loop {
        match kind_at(tokens, j) {
            TokenKind::Space => width += 1,
            TokenKind::Tab => width += TAB_WIDTH,
            _ => return (width, j),
        }
        j += 1;
    }
}

/// A line holding nothing but blanks and its newline.
pub fn is_blank_line(tokens: &[Token], i: usize) -> bool {
    let (_, j) = indentation(tokens, i);
    kind_at(tokens, j) == TokenKind::Newline
}

/// A line holding nothing but blanks before the end of input.
pub fn is_trailing_blank(tokens: &[Token], i: usize) -> bool {
    let (_, j) = indentation(tokens, i);
    at_eof(tokens, j)
}

pub fn concat(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text).collect()
}

/// Narrows `start..end` so it neither starts nor ends with a space or tab.
pub fn trim_blanks(tokens: &[Token], mut start: usize, mut end: usize) -> (usize, usize) {
    while start < end && kind_at(tokens, start).is_blank() {
        start += 1;
    }
    while end > start && kind_at(tokens, end - 1).is_blank() {
        end -= 1;
    }
    (start, end)
}

/// Text token that begins with a letter or digit.
pub fn starts_word(token: &Token) -> bool {
    token.kind == TokenKind::Text && token.text.chars().next().is_some_and(char::is_alphanumeric)
}

/// Text token that ends with a letter or digit.
pub fn ends_word(token: &Token) -> bool {
    token.kind == TokenKind::Text
        && token
            .text
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric)
}

/// Depth of a headline starting at `i`: one to six asterisks at column one followed by
/// a space.
pub fn match_headline_stars(tokens: &[Token], i: usize) -> Option<usize> {
    if !is_line_start(tokens, i) {
        return None;
    }
    let mut depth = 0;
    while kind_at(tokens, i + depth) == TokenKind::Asterisk {
        depth += 1;
    }
    if (1..=6).contains(&depth) && kind_at(tokens, i + depth) == TokenKind::Space {
        Some(depth)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet {
    pub kind: ListKind,
    /// Indentation width of the bullet.
    pub indent: usize,
    /// First token of the item's text.
    pub content: usize,
}

/// List item start on the line beginning at `i`: `-`, `+` or an indented `*`, or a
/// number followed by `.` or `)`; always followed by a space.
pub fn match_bullet(tokens: &[Token], i: usize) -> Option<Bullet> {
    if !is_line_start(tokens, i) {
        return None;
    }
    let (indent, j) = indentation(tokens, i);

    let (kind, after) = match kind_at(tokens, j) {
        TokenKind::Dash | TokenKind::Plus => (ListKind::Unordered, j + 1),
        TokenKind::Asterisk if indent > 0 => (ListKind::Unordered, j + 1),
        TokenKind::Text => {
            let text = text_at(tokens, j);
            if is_digits(text)
                && kind_at(tokens, j + 1) == TokenKind::Parenthesis
                && text_at(tokens, j + 1) == ")"
            {
                (ListKind::Ordered, j + 2)
            } else if text.strip_suffix('.').is_some_and(is_digits) {
                (ListKind::Ordered, j + 1)
            } else {
                return None;
            }
        }
        _ => return None,
    };

    if kind_at(tokens, after) != TokenKind::Space {
        return None;
    }
    let mut content = after;
    while kind_at(tokens, content).is_blank() {
        content += 1;
    }
    Some(Bullet {
        kind,
        indent,
        content,
    })
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Index of the first Pipe when the line at `i` is a table row.
pub fn match_table_row(tokens: &[Token], i: usize) -> Option<usize> {
    if !is_line_start(tokens, i) {
        return None;
    }
    let (_, j) = indentation(tokens, i);
    (kind_at(tokens, j) == TokenKind::Pipe).then_some(j)
}

/// A row made only of Dash, Plus and Pipe tokens (trailing blanks ignored). `pipe` is
/// the row's first Pipe.
pub fn match_rule_row(tokens: &[Token], pipe: usize) -> bool {
    let end = line_end(tokens, pipe);
    let (start, end) = trim_blanks(tokens, pipe, end);
    let row = &tokens[start.min(tokens.len())..end.min(tokens.len())];
    row.iter()
        .all(|t| matches!(t.kind, TokenKind::Dash | TokenKind::Plus | TokenKind::Pipe))
}

/// Index just past `#+` when the line at `i` starts with it.
pub fn match_keyword_start(tokens: &[Token], i: usize) -> Option<usize> {
    if !is_line_start(tokens, i) {
        return None;
    }
    let (_, j) = indentation(tokens, i);
    (kind_at(tokens, j) == TokenKind::Hash && kind_at(tokens, j + 1) == TokenKind::Plus)
        .then_some(j + 2)
}

/// Reads a keyword name starting at `i`, stopping at a colon, blank or line end.
/// Returns the name and the index of the token that stopped it.
pub fn read_key(tokens: &[Token], i: usize) -> (String, usize) {
    let mut j = i;
    while !matches!(
        kind_at(tokens, j),
        TokenKind::Colon | TokenKind::Space | TokenKind::Tab | TokenKind::Newline | TokenKind::Eof
    ) {
        j += 1;
    }
    (concat(&tokens[i.min(tokens.len())..j.min(tokens.len())]), j)
}

/// `[fn:` starting at `i`. Returns the index of the first label token.
pub fn match_footnote_start(tokens: &[Token], i: usize) -> Option<usize> {
    (is_bracket(tokens, i, "[")
        && kind_at(tokens, i + 1) == TokenKind::Text
        && text_at(tokens, i + 1) == "fn"
        && kind_at(tokens, i + 2) == TokenKind::Colon)
        .then_some(i + 3)
}

/// Footnote definition at column one: `[fn:label]`. Returns the label and the index
/// just past the closing bracket.
pub fn match_footnote_definition(tokens: &[Token], i: usize) -> Option<(String, usize)> {
    if i != 0 && kind_at(tokens, i - 1) != TokenKind::Newline {
        return None;
    }
    let start = match_footnote_start(tokens, i)?;
    let mut j = start;
    loop {
        match kind_at(tokens, j) {
            TokenKind::Bracket if text_at(tokens, j) == "]" => break,
            TokenKind::Bracket
            | TokenKind::Colon
            | TokenKind::Space
            | TokenKind::Tab
            | TokenKind::Newline
            | TokenKind::Eof => return None,
            _ => j += 1,
        }
    }
    if j == start {
        return None;
    }
    Some((concat(&tokens[start..j]), j + 1))
}

/// Exactly five dashes alone on the line (surrounding blanks allowed).
pub fn match_horizontal_rule(tokens: &[Token], i: usize) -> bool {
    if !is_line_start(tokens, i) {
        return false;
    }
    let (_, mut j) = indentation(tokens, i);
    let mut dashes = 0;
    while kind_at(tokens, j) == TokenKind::Dash {
        dashes += 1;
        j += 1;
    }
    let (_, j) = indentation(tokens, j);
    dashes == 5 && kind_at(tokens, j).ends_line()
}

/// Fixed-width line: `:` followed by a space or the line end. Returns the index of the
/// line's content.
pub fn match_fixed_width(tokens: &[Token], i: usize) -> Option<usize> {
    if !is_line_start(tokens, i) {
        return None;
    }
    let (_, j) = indentation(tokens, i);
    if kind_at(tokens, j) != TokenKind::Colon {
        return None;
    }
    match kind_at(tokens, j + 1) {
        TokenKind::Space => Some(j + 2),
        kind if kind.ends_line() => Some(j + 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn headline_stars_need_space_and_column_one() {
        assert_eq!(match_headline_stars(&tokenize("*** x"), 0), Some(3));
        assert_eq!(match_headline_stars(&tokenize("*bold*"), 0), None);
        assert_eq!(match_headline_stars(&tokenize("******* deep"), 0), None);
        let tokens = tokenize("a * b");
        assert_eq!(match_headline_stars(&tokens, 2), None);
    }

    #[test]
    fn bullets() {
        let dash = match_bullet(&tokenize("- a"), 0).unwrap();
        assert_eq!(dash.kind, ListKind::Unordered);
        assert_eq!(dash.indent, 0);
        assert_eq!(dash.content, 2);

        let numbered = match_bullet(&tokenize("  12. a"), 0).unwrap();
        assert_eq!(numbered.kind, ListKind::Ordered);
        assert_eq!(numbered.indent, 2);

        let paren = match_bullet(&tokenize("3) a"), 0).unwrap();
        assert_eq!(paren.kind, ListKind::Ordered);
        assert_eq!(paren.content, 3);

        assert!(match_bullet(&tokenize("  * a"), 0).is_some());
        assert!(match_bullet(&tokenize("* a"), 0).is_none());
        assert!(match_bullet(&tokenize("-a"), 0).is_none());
        assert!(match_bullet(&tokenize("1.5 a"), 0).is_none());
    }

    #[test]
    fn rule_rows() {
        let tokens = tokenize("|---+---|");
        assert!(match_rule_row(&tokens, 0));
        let tokens = tokenize("|---+---|  \n");
        assert!(match_rule_row(&tokens, 0));
        let tokens = tokenize("| a | b |");
        assert!(!match_rule_row(&tokens, 0));
        let tokens = tokenize("|+|");
        assert!(match_rule_row(&tokens, 0));
        let tokens = tokenize("|-- x|");
        assert!(!match_rule_row(&tokens, 0));
    }

    #[test]
    fn keyword_key() {
        let tokens = tokenize("#+BEGIN_SRC sh");
        let start = match_keyword_start(&tokens, 0).unwrap();
        let (key, stop) = read_key(&tokens, start);
        assert_eq!(key, "BEGIN_SRC");
        assert_eq!(kind_at(&tokens, stop), TokenKind::Space);
    }

    #[test]
    fn footnote_definitions() {
        let tokens = tokenize("[fn:my-note] text");
        let (label, after) = match_footnote_definition(&tokens, 0).unwrap();
        assert_eq!(label, "my-note");
        assert_eq!(kind_at(&tokens, after), TokenKind::Space);
        assert!(match_footnote_definition(&tokenize("[fn:a:inline]"), 0).is_none());
        assert!(match_footnote_definition(&tokenize("[fn:]"), 0).is_none());
    }

    #[test]
    fn horizontal_rules() {
        assert!(match_horizontal_rule(&tokenize("-----"), 0));
        assert!(match_horizontal_rule(&tokenize("  -----  \n"), 0));
        assert!(!match_horizontal_rule(&tokenize("------"), 0));
        assert!(!match_horizontal_rule(&tokenize("----- x"), 0));
    }

    #[test]
    fn fixed_width_lines() {
        assert_eq!(match_fixed_width(&tokenize(": code"), 0), Some(2));
        assert_eq!(match_fixed_width(&tokenize(":\n"), 0), Some(1));
        assert_eq!(match_fixed_width(&tokenize(":PROPERTIES:"), 0), None);
    }

    #[test]
    fn blank_lines_and_indentation() {
        let tokens = tokenize("  \t\nx");
        assert!(is_blank_line(&tokens, 0));
        assert_eq!(indentation(&tokens, 0), (2 + TAB_WIDTH, 3));
        assert_eq!(next_line(&tokens, 0), 4);
        assert!(!is_blank_line(&tokens, 4));
    }
}
