use std::collections::HashMap;

use textwrap::core::display_width;

use crate::ast::{Document, GreaterBlock, ListKind, NodeId, NodeKind, NodeRef};

#[derive(Debug, Clone)]
pub struct TextOptions {
    pub line_width: usize,
    pub footnotes_title: String,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            line_width: 80,
            footnotes_title: "Footnotes".to_string(),
        }
    }
}

pub struct TextRenderer<'d> {
    doc: &'d Document,
    options: &'d TextOptions,
    line_width: usize,
    output: String,
    definitions: HashMap<&'d str, NodeId>,
    footnotes: Vec<Option<NodeId>>,
    numbers: HashMap<&'d str, usize>,
}

impl<'d> TextRenderer<'d> {
    pub fn new(doc: &'d Document, options: &'d TextOptions) -> Self {
        let mut definitions = HashMap::new();
        for node in doc.root().descendants() {
            if let NodeKind::FootnoteDefinition { label } = node.kind() {
                definitions.insert(label.as_str(), node.id());
            }
        }
        Self {
            doc,
            options,
            line_width: options.line_width,
            output: String::new(),
            definitions,
            footnotes: Vec::new(),
            numbers: HashMap::new(),
        }
    }

    pub fn render(mut self) -> String {
        self.render_children(self.doc.root());
        self.render_footnotes();
        self.output
    }

    /// Separates the next block from the previous one by a blank line.
    fn start_block(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with("\n\n") {
            self.output.push('\n');
        }
    }

    fn push_lines(&mut self, lines: &[String]) {
        for line in lines {
            self.output.push_str(line.trim_end());
            self.output.push('\n');
        }
    }

    fn render_children(&mut self, node: NodeRef<'d>) {
        for child in node.children() {
            self.render_block(child);
        }
    }

    fn render_block(&mut self, node: NodeRef<'d>) {
        match node.kind() {
            NodeKind::Root | NodeKind::Section => self.render_children(node),

            NodeKind::Headline(headline) => {
                let mut title = String::new();
                if let Some(keyword) = &headline.keyword {
                    title.push_str(keyword);
                    title.push(' ');
                }
                if let Some(priority) = headline.priority {
                    title.push_str(&format!("[{priority}] "));
                }
                for child in node.title() {
                    title.push_str(&self.inline_text(child));
                }
                let mut title = title.trim_end().to_string();
                if !headline.tags.is_empty() {
                    title.push_str(&format!("  :{}:", headline.tags.join(":")));
                }

                let underline = if headline.depth == 1 { "=" } else { "-" };
                self.start_block();
                self.output.push_str(&title);
                self.output.push('\n');
                self.output
                    .push_str(&underline.repeat(display_width(&title).max(1)));
                self.output.push('\n');

                for child in node.body() {
                    self.render_block(child);
                }
            }

            NodeKind::Paragraph => {
                let text = self.inline_children(node);
                let lines = wrap(&text, self.line_width, "", "");
                if !lines.is_empty() {
                    self.start_block();
                    self.push_lines(&lines);
                }
            }

            NodeKind::List(_) => {
                self.start_block();
                self.render_list(node, 0);
            }

            NodeKind::Table => {
                self.start_block();
                self.render_table(node);
            }

            NodeKind::GreaterBlock(block) => self.render_greater_block(node, block),

            NodeKind::FixedWidth { value } => {
                self.start_block();
                self.push_verbatim(value);
            }

            NodeKind::HorizontalRule => {
                self.start_block();
                self.output.push_str(&"-".repeat(self.line_width.max(1)));
                self.output.push('\n');
            }

            NodeKind::Keyword { .. } | NodeKind::FootnoteDefinition { .. } => {}

            NodeKind::ListItem | NodeKind::TableRow { .. } | NodeKind::TableCell => {
                self.render_children(node)
            }

            NodeKind::Text(_)
            | NodeKind::Bold
            | NodeKind::Italic
            | NodeKind::Verbatim
            | NodeKind::Code
            | NodeKind::Underline
            | NodeKind::Strikethrough
            | NodeKind::EnDash
            | NodeKind::MDash
            | NodeKind::Link { .. }
            | NodeKind::FootnoteReference { .. } => {
                let text = self.inline_text(node);
                self.output.push_str(&text);
            }
        }
    }

    fn render_list(&mut self, list: NodeRef<'d>, indent: usize) {
        let ordered = matches!(list.kind(), NodeKind::List(ListKind::Ordered));
        for (n, item) in list.children().enumerate() {
            let marker = if ordered {
                format!("{}. ", n + 1)
            } else {
                "- ".to_string()
            };
            self.render_list_item(item, indent, &marker);
        }
    }

    /// Item text hangs under the marker; nested lists indent past it.
    fn render_list_item(&mut self, item: NodeRef<'d>, indent: usize, marker: &str) {
        let hanging = " ".repeat(indent + marker.len());
        let mut first = format!("{}{marker}", " ".repeat(indent));
        let mut text = String::new();
        let mut wrote_marker = false;

        for child in item.children() {
            if child.kind().is_inline() {
                text.push_str(&self.inline_text(child));
                continue;
            }
            if !text.trim().is_empty() || !wrote_marker {
                let lines = wrap(&text, self.line_width, &first, &hanging);
                self.push_marker_lines(lines, &first);
                wrote_marker = true;
                first = hanging.clone();
            }
            text.clear();
            if matches!(child.kind(), NodeKind::List(_)) {
                self.render_list(child, indent + marker.len());
            }
        }

        if !text.trim().is_empty() || !wrote_marker {
            let lines = wrap(&text, self.line_width, &first, &hanging);
            self.push_marker_lines(lines, &first);
        }
    }

    /// An item without text still shows its marker.
    fn push_marker_lines(&mut self, lines: Vec<String>, first: &str) {
        if lines.is_empty() {
            self.output.push_str(first.trim_end());
            self.output.push('\n');
        } else {
            self.push_lines(&lines);
        }
    }

    fn render_table(&mut self, table: NodeRef<'d>) {
        let mut rows: Vec<Option<Vec<String>>> = Vec::new();
        for row in table.children() {
            match row.kind() {
                NodeKind::TableRow { is_rule: true } => rows.push(None),
                _ => {
                    let cells = row
                        .children()
                        .map(|cell| collapse(&self.inline_children(cell)))
                        .collect();
                    rows.push(Some(cells));
                }
            }
        }

        let columns = rows.iter().flatten().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![1; columns];
        for cells in rows.iter().flatten() {
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(display_width(cell));
            }
        }

        for row in &rows {
            let line = match row {
                None => {
                    let dashes: Vec<_> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
                    format!("|{}|", dashes.join("+"))
                }
                Some(cells) => {
                    let padded: Vec<_> = widths
                        .iter()
                        .enumerate()
                        .map(|(i, w)| {
                            let cell = cells.get(i).map_or("", String::as_str);
                            format!(" {cell}{} ", " ".repeat(w - display_width(cell)))
                        })
                        .collect();
                    format!("|{}|", padded.join("|"))
                }
            };
            self.output.push_str(&line);
            self.output.push('\n');
        }
    }

    fn render_greater_block(&mut self, node: NodeRef<'d>, block: &GreaterBlock) {
        match block.name.as_str() {
            "SRC" | "EXAMPLE" => {
                self.start_block();
                self.push_verbatim(block_body(&block.value));
            }
            "EXPORT" => {
                let backend = block.parameters.split_whitespace().next().unwrap_or("");
                if backend.eq_ignore_ascii_case("text") || backend.eq_ignore_ascii_case("ascii")
                {
                    self.start_block();
                    self.output.push_str(block_body(&block.value));
                    self.output.push('\n');
                }
            }
            "COMMENT" => {}
            "QUOTE" => {
                self.start_block();
                let start = self.output.len();
                let width = self.line_width;
                self.line_width = width.saturating_sub(2).max(1);
                self.render_children(node);
                self.line_width = width;

                let quoted = self.output.split_off(start);
                for line in quoted.lines() {
                    if line.is_empty() {
                        self.output.push_str(">\n");
                    } else {
                        self.output.push_str("> ");
                        self.output.push_str(line);
                        self.output.push('\n');
                    }
                }
            }
            "VERSE" => {
                let text = self.inline_children(node);
                if !text.is_empty() {
                    self.start_block();
                    for line in text.lines() {
                        self.output.push_str(line.trim_end());
                        self.output.push('\n');
                    }
                }
            }
            "CENTER" => {
                self.start_block();
                let start = self.output.len();
                self.render_children(node);
                let centered = self.output.split_off(start);
                for line in centered.lines() {
                    let pad = self.line_width.saturating_sub(display_width(line)) / 2;
                    if !line.is_empty() {
                        self.output.push_str(&" ".repeat(pad));
                    }
                    self.output.push_str(line);
                    self.output.push('\n');
                }
            }
            _ => self.render_children(node),
        }
    }

    /// Verbatim text indented by four spaces.
    fn push_verbatim(&mut self, text: &str) {
        for line in text.lines() {
            if !line.is_empty() {
                self.output.push_str("    ");
            }
            self.output.push_str(line);
            self.output.push('\n');
        }
    }

    fn inline_children(&mut self, node: NodeRef<'d>) -> String {
        let mut text = String::new();
        for child in node.children() {
            text.push_str(&self.inline_text(child));
        }
        text
    }

    /// Plain text of an inline node. Emphasis keeps its delimiters.
    fn inline_text(&mut self, node: NodeRef<'d>) -> String {
        let delimiter = match node.kind() {
            NodeKind::Text(text) => return text.clone(),
            NodeKind::EnDash => return "--".to_string(),
            NodeKind::MDash => return "---".to_string(),
            NodeKind::Link { target } => {
                let target = target.strip_prefix("file:").unwrap_or(target);
                if node.first_child().is_none() {
                    return target.to_string();
                }
                let description = self.inline_children(node);
                return format!("{description} <{target}>");
            }
            NodeKind::FootnoteReference { label, .. } => {
                return format!("[{}]", self.footnote_number(node, label));
            }
            NodeKind::Bold => "*",
            NodeKind::Italic => "/",
            NodeKind::Underline => "_",
            NodeKind::Strikethrough => "+",
            NodeKind::Code => "~",
            NodeKind::Verbatim => "=",
            _ => return node.raw_text(),
        };
        format!("{delimiter}{}{delimiter}", self.inline_children(node))
    }

    fn footnote_number(&mut self, node: NodeRef<'d>, label: &'d str) -> usize {
        if !label.is_empty()
            && let Some(&number) = self.numbers.get(label)
        {
            return number;
        }
        let body = if node.first_child().is_some() {
            Some(node.id())
        } else {
            self.definitions.get(label).copied()
        };
        self.footnotes.push(body);
        let number = self.footnotes.len();
        if !label.is_empty() {
            self.numbers.insert(label, number);
        }
        number
    }

    fn render_footnotes(&mut self) {
        if self.footnotes.is_empty() {
            return;
        }
        self.start_block();
        let title = self.options.footnotes_title.clone();
        self.output.push_str(&title);
        self.output.push('\n');
        self.output
            .push_str(&"-".repeat(display_width(&title).max(1)));
        self.output.push_str("\n\n");

        // Footnote bodies may reference further footnotes, growing the list.
        let mut i = 0;
        while i < self.footnotes.len() {
            let marker = format!("[{}] ", i + 1);
            let text = match self.footnotes[i] {
                Some(body) => {
                    let body = self.doc.node(body);
                    self.inline_children(body)
                }
                None => String::new(),
            };
            let hanging = " ".repeat(marker.len());
            let lines = wrap(&text, self.line_width, &marker, &hanging);
            self.push_marker_lines(lines, &marker);
            i += 1;
        }
    }
}

/// Renders a document tree as wrapped plain text.
pub fn render_text(doc: &Document, options: &TextOptions) -> String {
    TextRenderer::new(doc, options).render()
}

/// Greedily fills `text` to `width` columns after collapsing its whitespace. Words are
/// never broken or hyphenated.
fn wrap(text: &str, width: usize, initial_indent: &str, subsequent_indent: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let normalized = collapse(text);
    let options = textwrap::Options::new(width.max(1))
        .initial_indent(initial_indent)
        .subsequent_indent(subsequent_indent)
        .break_words(false)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .word_splitter(textwrap::WordSplitter::NoHyphenation);
    textwrap::wrap(&normalized, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn block_body(value: &str) -> &str {
    let value = value.strip_prefix('\n').unwrap_or(value);
    value.strip_suffix('\n').unwrap_or(value)
}
