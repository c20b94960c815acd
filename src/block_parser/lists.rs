use super::BlockParser;
use crate::ast::{NodeId, NodeKind};
use crate::predicates::{
    Bullet, at_eof, indentation, is_blank_line, line_end, match_bullet, next_line,
};

impl BlockParser<'_, '_> {
    /// List whose first bullet starts the line at `self.pos`. Items continue while the
    /// next bullet has the same kind and indentation; a single blank line between
    /// items does not end the list.
    pub(super) fn parse_list(&mut self, container: NodeId, first: Bullet) {
        let list = self.doc.append(container, NodeKind::List(first.kind));
        log::trace!("List {:?} at indent {}", first.kind, first.indent);

        let mut bullet = first;
        loop {
            self.parse_list_item(list, bullet);
            match self.next_sibling(first) {
                Some(next) => bullet = next,
                None => break,
            }
        }
    }

    fn parse_list_item(&mut self, list: NodeId, bullet: Bullet) {
        let item = self.doc.append(list, NodeKind::ListItem);

        let end = self.item_text_end(bullet.content, bullet.indent);
        self.inline(item, bullet.content, end);
        self.pos = next_line(self.tokens, end);

        loop {
            let i = self.skip_one_blank(self.pos);
            if let Some(nested) = match_bullet(self.tokens, i)
                && nested.indent > bullet.indent
            {
                self.pos = i;
                self.parse_list(item, nested);
                continue;
            }

            if self.is_continuation(self.pos, bullet.indent) {
                let (_, start) = indentation(self.tokens, self.pos);
                let end = self.item_text_end(start, bullet.indent);
                self.inline(item, start, end);
                self.pos = next_line(self.tokens, end);
                continue;
            }

            break;
        }
    }

    /// Terminator of the last line of item text beginning at `start`: the first line
    /// plus every following line indented deeper than the bullet that is not itself
    /// a bullet.
    fn item_text_end(&self, start: usize, indent: usize) -> usize {
        let mut end = line_end(self.tokens, start);
        loop {
            let i = next_line(self.tokens, end);
            if !self.is_continuation(i, indent) {
                return end;
            }
            end = line_end(self.tokens, i);
        }
    }

    fn is_continuation(&self, i: usize, indent: usize) -> bool {
        let tokens = self.tokens;
        if at_eof(tokens, i) || is_blank_line(tokens, i) || match_bullet(tokens, i).is_some() {
            return false;
        }
        let (width, first) = indentation(tokens, i);
        width > indent && !at_eof(tokens, first)
    }

    /// Next item of the list opened by `first`, moving the cursor onto it.
    fn next_sibling(&mut self, first: Bullet) -> Option<Bullet> {
        let i = self.skip_one_blank(self.pos);
        let bullet = match_bullet(self.tokens, i)?;
        if bullet.indent == first.indent && bullet.kind == first.kind {
            self.pos = i;
            Some(bullet)
        } else {
            None
        }
    }

    fn skip_one_blank(&self, i: usize) -> usize {
        if is_blank_line(self.tokens, i) {
            next_line(self.tokens, i)
        } else {
            i
        }
    }
}
