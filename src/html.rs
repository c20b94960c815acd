use std::collections::HashMap;

use crate::ast::{Document, GreaterBlock, ListKind, NodeId, NodeKind, NodeRef};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];

#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Wrap the fragment in a complete HTML page.
    pub standalone: bool,
    /// Page title used by `standalone`.
    pub title: Option<String>,
    /// Heading of the footnote appendix.
    pub footnotes_title: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            standalone: false,
            title: None,
            footnotes_title: "Footnotes".to_string(),
        }
    }
}

/// A footnote in order of first reference. `body` is the node whose children hold the
/// footnote text: the definition, or the reference itself for inline footnotes.
struct Footnote {
    number: usize,
    body: Option<NodeId>,
}

pub struct HtmlRenderer<'d> {
    doc: &'d Document,
    options: &'d HtmlOptions,
    output: String,
    definitions: HashMap<&'d str, NodeId>,
    footnotes: Vec<Footnote>,
    numbers: HashMap<&'d str, usize>,
}

impl<'d> HtmlRenderer<'d> {
    pub fn new(doc: &'d Document, options: &'d HtmlOptions) -> Self {
        let mut definitions = HashMap::new();
        for node in doc.root().descendants() {
            if let NodeKind::FootnoteDefinition { label } = node.kind() {
                definitions.insert(label.as_str(), node.id());
            }
        }
        Self {
            doc,
            options,
            output: String::new(),
            definitions,
            footnotes: Vec::new(),
            numbers: HashMap::new(),
        }
    }

    pub fn render(mut self) -> String {
        self.render_children(self.doc.root());
        self.render_footnotes();
        if self.options.standalone {
            self.wrap_page()
        } else {
            self.output
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
                let tag = format!("h{}", headline.depth);
                self.output.push_str(&format!("<{tag}>"));
                if let Some(keyword) = &headline.keyword {
                    self.output.push_str(&format!(
                        "<span class=\"{}\">{}</span> ",
                        keyword.to_ascii_lowercase(),
                        escape(keyword)
                    ));
                }
                if let Some(priority) = headline.priority {
                    self.output
                        .push_str(&format!("<span class=\"priority\">[{priority}]</span> "));
                }
                for child in node.title() {
                    self.render_inline(child);
                }
                if !headline.tags.is_empty() {
                    self.output.push_str(&format!(
                        " <span class=\"tags\">{}</span>",
                        escape(&headline.tags.join(":"))
                    ));
                }
                self.output.push_str(&format!("</{tag}>\n"));
                for child in node.body() {
                    self.render_block(child);
                }
            }

            NodeKind::Paragraph => {
                self.output.push_str("<p>");
                self.render_inlines(node);
                self.output.push_str("</p>\n");
            }

            NodeKind::List(kind) => {
                let tag = match kind {
                    ListKind::Ordered => "ol",
                    ListKind::Unordered => "ul",
                };
                self.output.push_str(&format!("<{tag}>\n"));
                self.render_children(node);
                self.output.push_str(&format!("</{tag}>\n"));
            }

            NodeKind::ListItem => {
                self.output.push_str("<li>");
                let mut nested = false;
                for child in node.children() {
                    if child.kind().is_inline() {
                        self.render_inline(child);
                    } else {
                        if !nested {
                            self.output.push('\n');
                            nested = true;
                        }
                        self.render_block(child);
                    }
                }
                self.output.push_str("</li>\n");
            }

            NodeKind::Table => self.render_table(node),

            NodeKind::GreaterBlock(block) => self.render_greater_block(node, block),

            NodeKind::FixedWidth { value } => {
                self.output.push_str("<pre class=\"example\">");
                self.output.push_str(&escape(value));
                self.output.push_str("</pre>\n");
            }

            NodeKind::Keyword { key, value } => {
                if key.eq_ignore_ascii_case("html") {
                    self.output.push_str(value);
                    self.output.push('\n');
                }
            }

            NodeKind::HorizontalRule => self.output.push_str("<hr>\n"),

            // Rendered in the appendix.
            NodeKind::FootnoteDefinition { .. } => {}

            NodeKind::TableRow { .. } | NodeKind::TableCell => self.render_children(node),

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
            | NodeKind::FootnoteReference { .. } => self.render_inline(node),
        }
    }

    /// The row right above the first rule row becomes the header. Every other plain
    /// row goes to the body in document order.
    fn render_table(&mut self, table: NodeRef<'d>) {
        let rows: Vec<_> = table.children().collect();
        let header = match rows.iter().position(|row| is_rule_row(*row)) {
            Some(first_rule) if first_rule > 0 => Some(first_rule - 1),
            _ => None,
        };

        self.output.push_str("<table>\n");
        if let Some(index) = header {
            self.output.push_str("<thead>\n");
            self.render_row(rows[index], "th");
            self.output.push_str("</thead>\n");
        }
        let body: Vec<_> = rows
            .iter()
            .enumerate()
            .filter(|&(i, row)| Some(i) != header && !is_rule_row(*row))
            .map(|(_, row)| *row)
            .collect();
        if !body.is_empty() {
            self.output.push_str("<tbody>\n");
            for row in body {
                self.render_row(row, "td");
            }
            self.output.push_str("</tbody>\n");
        }
        self.output.push_str("</table>\n");
    }

    fn render_row(&mut self, row: NodeRef<'d>, cell_tag: &str) {
        self.output.push_str("<tr>\n");
        for cell in row.children() {
            self.output.push_str(&format!("<{cell_tag}>"));
            self.render_inlines(cell);
            self.output.push_str(&format!("</{cell_tag}>\n"));
        }
        self.output.push_str("</tr>\n");
    }

    fn render_greater_block(&mut self, node: NodeRef<'d>, block: &GreaterBlock) {
        match block.name.as_str() {
            "SRC" => {
                match &block.language {
                    Some(language) => self
                        .output
                        .push_str(&format!("<pre class=\"src src-{}\">", escape(language))),
                    None => self.output.push_str("<pre class=\"src\">"),
                }
                self.output.push_str(&escape(block_body(&block.value)));
                self.output.push_str("</pre>\n");
            }
            "EXAMPLE" => {
                self.output.push_str("<pre class=\"example\">");
                self.output.push_str(&escape(block_body(&block.value)));
                self.output.push_str("</pre>\n");
            }
            "EXPORT" => {
                let backend = block.parameters.split_whitespace().next().unwrap_or("");
                if backend.eq_ignore_ascii_case("html") {
                    self.output.push_str(block_body(&block.value));
                    self.output.push('\n');
                }
            }
            "COMMENT" => {}
            "QUOTE" => {
                self.output.push_str("<blockquote>\n");
                self.render_children(node);
                self.output.push_str("</blockquote>\n");
            }
            "VERSE" => {
                let start = self.output.len();
                self.render_inlines(node);
                let verse = self.output.split_off(start).replace('\n', "<br />\n");
                self.output.push_str("<div class=\"verse\">\n");
                self.output.push_str(&verse);
                self.output.push_str("\n</div>\n");
            }
            name => {
                let class = name.to_ascii_lowercase();
                self.output
                    .push_str(&format!("<div class=\"{}\">\n", escape(&class)));
                self.render_children(node);
                self.output.push_str("</div>\n");
            }
        }
    }

    fn render_inlines(&mut self, node: NodeRef<'d>) {
        for child in node.children() {
            self.render_inline(child);
        }
    }

    fn render_inline(&mut self, node: NodeRef<'d>) {
        match node.kind() {
            NodeKind::Text(text) => self.output.push_str(&escape(text)),
            NodeKind::Bold => self.wrap_inline(node, "<strong>", "</strong>"),
            NodeKind::Italic => self.wrap_inline(node, "<em>", "</em>"),
            NodeKind::Underline => self.wrap_inline(
                node,
                "<span style=\"text-decoration: underline;\">",
                "</span>",
            ),
            NodeKind::Strikethrough => self.wrap_inline(node, "<del>", "</del>"),
            NodeKind::Code => self.wrap_inline(node, "<code>", "</code>"),
            NodeKind::Verbatim => self.wrap_inline(node, "<code class=\"verbatim\">", "</code>"),
            NodeKind::EnDash => self.output.push_str("&#8211;"),
            NodeKind::MDash => self.output.push_str("&#8212;"),
            NodeKind::Link { target } => self.render_link(node, target),
            NodeKind::FootnoteReference { label, .. } => self.render_reference(node, label),
            _ => self.render_block(node),
        }
    }

    fn wrap_inline(&mut self, node: NodeRef<'d>, open: &str, close: &str) {
        self.output.push_str(open);
        self.render_inlines(node);
        self.output.push_str(close);
    }

    fn render_link(&mut self, node: NodeRef<'d>, target: &str) {
        let href = target.strip_prefix("file:").unwrap_or(target);
        if node.first_child().is_none() && is_image(href) {
            let alt = href.rsplit('/').next().unwrap_or(href);
            self.output.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">",
                escape(href),
                escape(alt)
            ));
            return;
        }
        self.output
            .push_str(&format!("<a href=\"{}\">", escape(href)));
        if node.first_child().is_some() {
            self.render_inlines(node);
        } else {
            self.output.push_str(&escape(target));
        }
        self.output.push_str("</a>");
    }

    /// Numbers footnotes by first reference. Repeated references to a label reuse its
    /// number; anonymous inline footnotes always get a fresh one.
    fn render_reference(&mut self, node: NodeRef<'d>, label: &'d str) {
        let existing = (!label.is_empty())
            .then(|| self.numbers.get(label).copied())
            .flatten();

        let number = match existing {
            Some(number) => {
                self.output.push_str(&format!(
                    "<sup><a class=\"footref\" href=\"#fn.{number}\">{number}</a></sup>"
                ));
                return;
            }
            None => self.footnotes.len() + 1,
        };

        let body = if node.first_child().is_some() {
            Some(node.id())
        } else {
            self.definitions.get(label).copied()
        };
        if body.is_none() {
            log::debug!("Footnote {label:?} has no definition");
        }
        self.footnotes.push(Footnote { number, body });
        if !label.is_empty() {
            self.numbers.insert(label, number);
        }
        self.output.push_str(&format!(
            "<sup><a id=\"fnr.{number}\" class=\"footref\" href=\"#fn.{number}\">{number}</a></sup>"
        ));
    }

    fn render_footnotes(&mut self) {
        if self.footnotes.is_empty() {
            return;
        }
        self.output.push_str("<div id=\"footnotes\">\n");
        self.output.push_str(&format!(
            "<h2 class=\"footnotes\">{}</h2>\n",
            escape(&self.options.footnotes_title)
        ));

        // Footnote bodies may reference further footnotes, growing the list.
        let mut i = 0;
        while i < self.footnotes.len() {
            let number = self.footnotes[i].number;
            let body = self.footnotes[i].body;
            self.output.push_str(&format!(
                "<div class=\"footdef\"><sup><a id=\"fn.{number}\" class=\"footnum\" href=\"#fnr.{number}\">{number}</a></sup> <p class=\"footpara\">"
            ));
            if let Some(body) = body {
                self.render_inlines(self.doc.node(body));
            }
            self.output.push_str("</p></div>\n");
            i += 1;
        }
        self.output.push_str("</div>\n");
    }

    fn wrap_page(self) -> String {
        let title = self.options.title.as_deref().unwrap_or("");
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            escape(title),
            self.output
        )
    }
}

/// Renders a document tree as an HTML fragment, or a full page with `standalone`.
pub fn render_html(doc: &Document, options: &HtmlOptions) -> String {
    HtmlRenderer::new(doc, options).render()
}

/// Escapes text for element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Block value without the newline that follows the BEGIN line and the one that
/// precedes the END line.
fn block_body(value: &str) -> &str {
    let value = value.strip_prefix('\n').unwrap_or(value);
    value.strip_suffix('\n').unwrap_or(value)
}

fn is_rule_row(row: NodeRef<'_>) -> bool {
    matches!(row.kind(), NodeKind::TableRow { is_rule: true })
}

fn is_image(target: &str) -> bool {
    target
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
