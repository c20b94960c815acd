use super::BlockParser;
use crate::ast::{NodeId, NodeKind};
use crate::predicates::{indentation, next_line};

impl BlockParser<'_, '_> {
    /// `[fn:label] text` at column one. The definition's text runs like a paragraph,
    /// so it also stops before the next definition.
    pub(super) fn parse_footnote_definition(
        &mut self,
        container: NodeId,
        label: String,
        after: usize,
    ) {
        log::debug!("Footnote definition {label:?} at line {}", self.line());
        let tokens = self.tokens;
        let (_, start) = indentation(tokens, after);
        let end = self.paragraph_end(start);

        let definition = self
            .doc
            .append(container, NodeKind::FootnoteDefinition { label });
        self.inline(definition, start, end);
        self.pos = next_line(tokens, end);
    }
}
