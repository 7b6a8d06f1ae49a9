//! HTML output writer.
//!
//! An append-only `String` buffer with helpers for every element the block
//! handlers emit. Helpers never escape on their own unless the name says so;
//! callers pass either literal text through `write_escaped_*` or markup that
//! the inline expander has already made safe.

use crate::block::{AlertKind, ListKind};
use crate::escape;

/// HTML output writer with a pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use paperdown::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.paragraph_start();
/// writer.write_escaped_text("Hello <World>");
/// writer.paragraph_end();
///
/// assert_eq!(writer.into_string(), "<p>Hello &lt;World&gt;</p>\n");
/// ```
#[derive(Debug, Clone)]
pub struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(1024),
        }
    }

    /// Create with pre-allocated capacity based on expected input size.
    ///
    /// Rendered documents run to roughly 1.5x their source.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: String::with_capacity(input_len + input_len / 2 + 256),
        }
    }

    /// Write a string without escaping.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    #[inline]
    pub fn write_char(&mut self, c: char) {
        self.out.push(c);
    }

    /// Write literal text, escaping `& < > " '`.
    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        escape::escape_html_into(&mut self.out, text);
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push('\n');
    }

    /// Current output length.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Check if output is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Clear output for reuse (keeps capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.out.clear();
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }

    /// Get mutable reference to internal buffer.
    ///
    /// Use with caution - allows bypassing escaping.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.out
    }

    // --- HTML Tag Helpers ---

    /// Write opening tag: `<tagname>`
    #[inline]
    pub fn open_tag(&mut self, tag: &'static str) {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
    }

    /// Write closing tag: `</tagname>`
    #[inline]
    pub fn close_tag(&mut self, tag: &'static str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    /// Write opening tag with newline: `<tagname>\n`
    #[inline]
    pub fn open_tag_nl(&mut self, tag: &'static str) {
        self.open_tag(tag);
        self.newline();
    }

    /// Write closing tag with newline: `</tagname>\n`
    #[inline]
    pub fn close_tag_nl(&mut self, tag: &'static str) {
        self.close_tag(tag);
        self.newline();
    }

    // --- Common HTML Elements ---

    #[inline]
    pub fn paragraph_start(&mut self) {
        self.write_str("<p>");
    }

    #[inline]
    pub fn paragraph_end(&mut self) {
        self.write_str("</p>\n");
    }

    /// Write heading start: `<hN>`
    #[inline]
    pub fn heading_start(&mut self, level: u8) {
        debug_assert!((1..=6).contains(&level));
        self.write_str("<h");
        self.write_u32(u32::from(level));
        self.out.push('>');
    }

    /// Write heading end: `</hN>\n`
    #[inline]
    pub fn heading_end(&mut self, level: u8) {
        debug_assert!((1..=6).contains(&level));
        self.write_str("</h");
        self.write_u32(u32::from(level));
        self.write_str(">\n");
    }

    /// Write thematic break: `<hr>\n`
    #[inline]
    pub fn thematic_break(&mut self) {
        self.write_str("<hr>\n");
    }

    /// Write the code container up to the start of the content.
    pub fn code_block_start(&mut self, lang: Option<&str>) {
        self.write_str(
            "<div class=\"code-block-container\"><button class=\"copy-btn\">Copy</button><pre>",
        );
        match lang {
            Some(l) if !l.is_empty() => {
                self.write_str("<code class=\"language-");
                self.write_escaped_text(l);
                self.write_str("\">");
            }
            _ => self.write_str("<code>"),
        }
    }

    #[inline]
    pub fn code_block_end(&mut self) {
        self.write_str("</code></pre></div>\n");
    }

    /// Write a complete code container around `lines` joined by `\n`.
    pub fn code_block<'l>(&mut self, lang: Option<&str>, lines: impl IntoIterator<Item = &'l str>) {
        self.code_block_start(lang);
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.write_escaped_text(line);
        }
        self.code_block_end();
    }

    #[inline]
    pub fn blockquote_start(&mut self) {
        self.write_str("<blockquote>");
    }

    #[inline]
    pub fn blockquote_end(&mut self) {
        self.write_str("</blockquote>\n");
    }

    /// Write the alert header and open its content container.
    pub fn alert_start(&mut self, kind: AlertKind) {
        self.write_str("<div class=\"alert alert-");
        self.write_str(kind.css_suffix());
        self.write_str("\"><div class=\"alert-header\"><span class=\"alert-title\">");
        self.write_str(kind.title());
        self.write_str("</span></div><div class=\"alert-content\">");
    }

    #[inline]
    pub fn alert_end(&mut self) {
        self.write_str("</div></div>\n");
    }

    /// Write list start: `<ul>\n` or `<ol>\n`
    #[inline]
    pub fn list_start(&mut self, kind: ListKind) {
        self.open_tag_nl(kind.tag());
    }

    /// Write list end: `</ul>\n` or `</ol>\n`
    #[inline]
    pub fn list_end(&mut self, kind: ListKind) {
        self.close_tag_nl(kind.tag());
    }

    #[inline]
    pub fn li_start(&mut self) {
        self.write_str("<li>");
    }

    /// Write a task item start including its disabled checkbox.
    pub fn task_li_start(&mut self, checked: bool) {
        self.write_str("<li class=\"task-list-item\"><input type=\"checkbox\" disabled");
        if checked {
            self.write_str(" checked");
        }
        self.write_str("> ");
    }

    #[inline]
    pub fn li_end(&mut self) {
        self.write_str("</li>\n");
    }

    /// Write a cell opener: `<th>` or `<td>`
    #[inline]
    pub fn cell_start(&mut self, header: bool) {
        self.open_tag(if header { "th" } else { "td" });
    }

    /// Write a cell closer with newline.
    #[inline]
    pub fn cell_end(&mut self, header: bool) {
        self.close_tag_nl(if header { "th" } else { "td" });
    }

    /// Write a standalone figure.
    ///
    /// `src` must already be attribute-safe; `alt` and `width` are escaped.
    /// The caption is written only when `figure` carries a number.
    pub fn figure(&mut self, src: &str, alt: &str, width: Option<&str>, figure: Option<u32>) {
        self.write_str("<figure class=\"image-figure\"><img src=\"");
        self.write_str(src);
        self.write_str("\" alt=\"");
        self.write_escaped_text(alt);
        self.out.push('"');
        if let Some(width) = width {
            self.write_str(" style=\"width: ");
            self.write_escaped_text(width);
            self.write_str(";\"");
        }
        self.write_str(" />");
        if let Some(n) = figure {
            self.write_str("<figcaption>Fig ");
            self.write_u32(n);
            self.out.push(' ');
            self.write_escaped_text(alt);
            self.write_str("</figcaption>");
        }
        self.write_str("</figure>\n");
    }

    /// Write a `<div class="NAME">` line holding escaped text.
    pub fn meta_line(&mut self, class: &'static str, prefix: &'static str, value: &str) {
        self.write_str("<div class=\"");
        self.write_str(class);
        self.write_str("\">");
        self.write_str(prefix);
        self.write_escaped_text(value);
        self.write_str("</div>\n");
    }

    /// Write the generated-by footer.
    pub fn footer(&mut self, label: &str) {
        self.write_str("\n<footer class=\"paperdown-footer\">\n  <p>This HTML page was automatically generated from \"");
        self.write_escaped_text(label);
        self.write_str("\" by paperdown.</p>\n</footer>");
    }

    /// Write a u32 as decimal.
    pub fn write_u32(&mut self, mut n: u32) {
        if n == 0 {
            self.out.push('0');
            return;
        }

        let mut buf = [0u8; 10];
        let mut i = buf.len();

        while n > 0 {
            i -= 1;
            buf[i] = b'0' + (n % 10) as u8;
            n /= 10;
        }

        for &b in &buf[i..] {
            self.out.push(char::from(b));
        }
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Write for HtmlWriter {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.out.push_str(s);
        Ok(())
    }
}
