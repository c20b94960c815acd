pub mod ast;
pub mod block_parser;
pub mod config;
pub mod header;
pub mod html;
pub mod inline_parser;
pub mod lexer;
pub mod parser;
pub mod predicates;
pub mod syntax;
pub mod text;

pub use ast::{Document, NodeId, NodeKind, NodeRef};
pub use config::{Config, OutputFormat};
pub use header::{MetaValue, Metadata};
pub use html::{HtmlOptions, render_html};
pub use parser::parse;
pub use text::{TextOptions, render_text};

/// Converts an Org document to an HTML fragment with default options.
///
/// # Examples
///
/// ```rust
/// let html = orgmark::to_html("* a h1 heading\n");
/// assert_eq!(html, "<h1>a h1 heading</h1>\n");
/// ```
pub fn to_html(input: &str) -> String {
    render_html(&parse(input), &HtmlOptions::default())
}

/// Converts an Org document according to `config`.
///
/// The header pre-pass supplies the page title for standalone HTML output.
///
/// # Arguments
///
/// * `input` - The Org document content
/// * `config` - Output format, line width and HTML options
pub fn convert(input: &str, config: &Config) -> String {
    let doc = parse(input);
    match config.format() {
        OutputFormat::Html => {
            let metadata = header::extract(input);
            let options = HtmlOptions {
                standalone: config.standalone(),
                title: metadata.title().map(str::to_string),
                footnotes_title: config.footnotes_title().to_string(),
            };
            render_html(&doc, &options)
        }
        OutputFormat::Text => {
            let options = TextOptions {
                line_width: config.line_width(),
                footnotes_title: config.footnotes_title().to_string(),
            };
            render_text(&doc, &options)
        }
    }
}
