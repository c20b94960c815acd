use super::BlockParser;
use crate::ast::{NodeId, NodeKind};
use crate::predicates::{kind_at, line_end, match_rule_row, match_table_row, next_line, trim_blanks};
use crate::syntax::TokenKind;

impl BlockParser<'_, '_> {
    /// Consecutive lines starting with `|`. Rows made of `-`, `+` and `|` only are
    /// rule rows and carry no cells.
    pub(super) fn parse_table(&mut self, container: NodeId) {
        let tokens = self.tokens;
        let table = self.doc.append(container, NodeKind::Table);

        while let Some(pipe) = match_table_row(tokens, self.pos) {
            let end = line_end(tokens, pipe);

            if match_rule_row(tokens, pipe) {
                log::trace!("Rule row at line {}", self.line());
                self.doc.append(table, NodeKind::TableRow { is_rule: true });
            } else {
                let row = self.doc.append(table, NodeKind::TableRow { is_rule: false });
                let mut cell_start = pipe + 1;
                for j in pipe + 1..end {
                    if kind_at(tokens, j) == TokenKind::Pipe {
                        self.parse_cell(row, cell_start, j);
                        cell_start = j + 1;
                    }
                }
                // A row may omit its closing pipe.
                let (start, stop) = trim_blanks(tokens, cell_start, end);
                if start < stop {
                    self.parse_cell(row, start, stop);
                }
            }

            self.pos = next_line(tokens, end);
        }
    }

    fn parse_cell(&mut self, row: NodeId, start: usize, end: usize) {
        let cell = self.doc.append(row, NodeKind::TableCell);
        self.inline(cell, start, end);
    }
}
