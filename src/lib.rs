//! paperdown: single-pass renderer for a restricted Markdown dialect.
//!
//! The input is read line by line and turned straight into HTML, with
//! automatic chapter/section numbering, footnotes collected per section and
//! rendered at the next section boundary, and every piece of literal HTML
//! passed through a tag and attribute allowlist.
//!
//! # Design Principles
//! - No document tree: one forward pass over the lines
//! - At most one multi-line block open at a time, plus a list stack
//! - Inline markup resolved over a node sequence, never re-scanned
//! - Infallible: malformed input degrades to paragraphs
//!
//! # Example
//! ```
//! let html = paperdown::to_html("## Intro\n\nSee [^1].\n\n[^1]: A note.");
//! assert!(html.contains("<h2>1 Intro</h2>"));
//! assert!(html.contains("<div class=\"footnote\" id=\"footnote-1\"><sup>1</sup> A note.</div>"));
//! ```

pub mod block;
pub mod escape;
pub mod footnote;
pub mod inline;
pub mod render;
pub mod sanitize;
pub mod source;

// Re-export primary types
pub use block::{AlertKind, BlockParser, Heading, LineRule, ListKind};
pub use footnote::FootnoteTable;
pub use inline::InlineExpander;
pub use render::HtmlWriter;
pub use sanitize::sanitize;
pub use source::SourceError;

/// Label used in the footer when the caller does not name the source.
pub const DEFAULT_LABEL: &str = "unknown file";

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Prefix `h2` and `h3` headings with chapter and section numbers.
    pub number_headings: bool,
    /// Append the generated-by footer.
    pub footer: bool,
    /// Turn bare `http://`, `https://` and `ftp://` URLs into links.
    pub autolink_urls: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            number_headings: true,
            footer: true,
            autolink_urls: true,
        }
    }
}

/// Convert Markdown to HTML.
///
/// This is the primary API for simple use cases.
///
/// # Example
/// ```
/// let html = paperdown::to_html("# Hello\n\nWorld");
/// assert!(html.contains("<h1>Hello</h1>"));
/// assert!(html.contains("<p>World</p>"));
/// ```
pub fn to_html(input: &str) -> String {
    to_html_with_options(input, DEFAULT_LABEL, &Options::default())
}

/// Convert Markdown to HTML, naming the source in the footer.
pub fn to_html_with_label(input: &str, label: &str) -> String {
    to_html_with_options(input, label, &Options::default())
}

/// Convert Markdown to HTML with options.
pub fn to_html_with_options(input: &str, label: &str, options: &Options) -> String {
    Parser::with_options(*options).parse(input, label)
}

/// Reusable renderer.
///
/// Every [`Parser::parse`] call starts from a clean state, so one instance
/// can render many documents. After a parse, the heading outline and the
/// footnote definitions of that document remain available.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: Options,
    footnotes: FootnoteTable,
    outline: Vec<Heading>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Drop everything left over from the previous document.
    pub fn reset(&mut self) {
        self.footnotes.clear();
        self.outline.clear();
    }

    /// Render `input` to HTML. `label` names the source in the footer.
    pub fn parse(&mut self, input: &str, label: &str) -> String {
        self.reset();
        let lines = footnote::preprocess(input, &mut self.footnotes);
        log::debug!(
            "parsing {:?}: {} lines, {} footnote definitions",
            label,
            lines.len(),
            self.footnotes.len()
        );

        let (html, outline) =
            BlockParser::new(lines, &self.footnotes, self.options, input.len()).render(label);
        self.outline = outline;
        html
    }

    /// Headings rendered by the last parse, in document order.
    pub fn outline(&self) -> &[Heading] {
        &self.outline
    }

    /// Footnote definitions collected by the last parse.
    pub fn footnotes(&self) -> &FootnoteTable {
        &self.footnotes
    }
}
