//! Line dispatcher and block state machine.
//!
//! Each line is offered to the handlers in [`RULES`] order; the first one
//! that accepts it wins. Handlers close whatever the incoming line ends
//! (via [`closes`]) before emitting or buffering their own content.

use log::{debug, trace};

use super::kind::{Heading, LineRule, TaskState};
use super::scan;
use super::state::{closes, closes_list, CodeBlock, ListFrame, ListStack, OpenBlock, TableBlock};
use crate::escape::escape_html_into;
use crate::footnote::{FootnoteQueue, FootnoteTable};
use crate::inline::InlineExpander;
use crate::render::HtmlWriter;
use crate::sanitize::is_safe_url;
use crate::Options;

type Handler = for<'a> fn(&mut BlockParser<'a>, &'a str) -> bool;

/// Dispatch table in priority order.
const RULES: [(LineRule, Handler); 10] = [
    (LineRule::Fence, fence_rule),
    (LineRule::Blank, blank_rule),
    (LineRule::IndentedCode, indented_code_rule),
    (LineRule::Heading, heading_rule),
    (LineRule::HorizontalRule, horizontal_rule),
    (LineRule::ListItem, list_item_rule),
    (LineRule::TableRow, table_row_rule),
    (LineRule::Quote, quote_rule),
    (LineRule::Image, image_rule),
    (LineRule::Paragraph, paragraph_rule),
];

/// Line rules in the order they are tried.
pub fn dispatch_order() -> [LineRule; 10] {
    RULES.map(|(rule, _)| rule)
}

fn fence_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.fence(line)
}

fn blank_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.blank(line)
}

fn indented_code_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.indented_code(line)
}

fn heading_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.heading(line)
}

fn horizontal_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.horizontal_rule(line)
}

fn list_item_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.list_item(line)
}

fn table_row_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.table_row(line)
}

fn quote_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.quote(line)
}

fn image_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.image(line)
}

fn paragraph_rule<'a>(p: &mut BlockParser<'a>, line: &'a str) -> bool {
    p.paragraph(line)
}

/// Metadata lines collected after the document title.
#[derive(Debug, Default)]
struct Metadata<'a> {
    author: Option<&'a str>,
    date: Option<&'a str>,
    institution: Option<&'a str>,
    editor: Option<&'a str>,
}

impl<'a> Metadata<'a> {
    /// Store a value under a known key. Returns false for unknown keys.
    fn set(&mut self, key: &str, value: &'a str) -> bool {
        let slot = match key.to_ascii_lowercase().as_str() {
            "author" => &mut self.author,
            "date" => &mut self.date,
            "institution" => &mut self.institution,
            "editor" => &mut self.editor,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// `(class, prefix, value)` for each present key, in render order.
    fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str, &'a str)> {
        [
            ("author", "", self.author),
            ("date", "", self.date),
            ("institution", "", self.institution),
            ("editor", "Edited by ", self.editor),
        ]
        .into_iter()
        .filter_map(|(class, prefix, value)| value.map(|v| (class, prefix, v)))
    }
}

/// Block parser state for one document.
pub struct BlockParser<'a> {
    lines: Vec<&'a str>,
    /// Index of the next line to dispatch.
    pos: usize,
    footnotes: &'a FootnoteTable,
    options: Options,
    inline: InlineExpander,
    out: HtmlWriter,
    queue: FootnoteQueue,
    block: OpenBlock<'a>,
    lists: ListStack,
    outline: Vec<Heading>,
    level: u8,
    chapter: u32,
    section: u32,
    figures: u32,
}

impl<'a> BlockParser<'a> {
    /// Create a parser over preprocessed lines.
    pub fn new(
        lines: Vec<&'a str>,
        footnotes: &'a FootnoteTable,
        options: Options,
        input_len: usize,
    ) -> Self {
        Self {
            lines,
            pos: 0,
            footnotes,
            options,
            inline: InlineExpander::new(&options),
            out: HtmlWriter::with_capacity_for(input_len),
            queue: FootnoteQueue::new(),
            block: OpenBlock::None,
            lists: ListStack::new(),
            outline: Vec::new(),
            level: 0,
            chapter: 0,
            section: 0,
            figures: 0,
        }
    }

    /// Render every line, close what is open, flush footnotes and append
    /// the footer. Returns the HTML and the heading outline.
    pub fn render(mut self, label: &str) -> (String, Vec<Heading>) {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos].trim_end();
            self.pos += 1;
            self.dispatch(line);
        }

        self.close_all();
        self.flush_footnotes();
        if self.options.footer {
            self.out.footer(label);
        }

        debug!(
            "rendered {} lines: {} headings, {} figures, {} bytes",
            self.lines.len(),
            self.outline.len(),
            self.figures,
            self.out.len()
        );
        (self.out.into_string(), self.outline)
    }

    fn dispatch(&mut self, line: &'a str) {
        for (rule, handler) in RULES {
            if handler(self, line) {
                trace!("line {}: {:?}", self.pos, rule);
                return;
            }
        }
    }

    // --- Handlers ---

    fn fence(&mut self, line: &'a str) -> bool {
        let fence = scan::fence(line);
        if let OpenBlock::Code(code) = &mut self.block {
            if !fence.is_some_and(|f| f.token == code.fence) {
                code.lines.push(line);
                return true;
            }
            self.close_block();
            return true;
        }

        let Some(fence) = fence else {
            return false;
        };
        self.close_for(LineRule::Fence);
        debug!("open code block {:?} (lang {:?})", fence.token, fence.lang);
        self.block = OpenBlock::Code(CodeBlock {
            fence: fence.token,
            lang: fence.lang,
            lines: Vec::new(),
        });
        true
    }

    fn blank(&mut self, line: &'a str) -> bool {
        if !scan::is_blank(line) {
            return false;
        }
        match self.block {
            OpenBlock::Quote(ref mut lines) | OpenBlock::Alert { ref mut lines, .. } => {
                lines.push("")
            }
            _ => self.close_for(LineRule::Blank),
        }
        true
    }

    fn indented_code(&mut self, line: &'a str) -> bool {
        let Some(code) = scan::indented_code(line) else {
            return false;
        };
        self.close_for(LineRule::IndentedCode);
        self.out.code_block(None, [code]);
        true
    }

    fn heading(&mut self, line: &'a str) -> bool {
        let Some(heading) = scan::heading(line) else {
            return false;
        };
        self.close_for(LineRule::Heading);
        if heading.level == 1 {
            self.title(heading.text);
        } else {
            self.section_heading(heading.level, heading.text);
        }
        true
    }

    fn title(&mut self, text: &'a str) {
        self.flush_footnotes();
        self.level = 1;
        let meta = self.read_metadata();

        self.out.write_str("<header class=\"document-header\">\n");
        self.out.heading_start(1);
        self.expand(text);
        self.out.heading_end(1);
        for (class, prefix, value) in meta.entries() {
            self.out.meta_line(class, prefix, value);
        }
        self.out.write_str("</header>\n");

        self.outline.push(Heading {
            level: 1,
            number: None,
            text: text.to_owned(),
        });
    }

    /// Consume `key: value` lines (and blank lines) after the title.
    fn read_metadata(&mut self) -> Metadata<'a> {
        let mut meta = Metadata::default();
        while let Some(&next) = self.lines.get(self.pos) {
            let next = next.trim();
            if next.is_empty() {
                self.pos += 1;
                continue;
            }
            let Some((key, value)) = scan::metadata(next) else {
                break;
            };
            if !meta.set(key, value) {
                debug!("dropping metadata key {key:?}");
            }
            self.pos += 1;
        }
        meta
    }

    fn section_heading(&mut self, level: u8, text: &'a str) {
        if level <= self.level || self.level >= 3 {
            self.flush_footnotes();
        }
        self.level = level;

        let number = match level {
            2 => {
                self.chapter += 1;
                self.section = 0;
                Some(self.chapter.to_string())
            }
            3 => {
                self.section += 1;
                Some(format!("{}.{}", self.chapter, self.section))
            }
            _ => None,
        }
        .filter(|_| self.options.number_headings);

        self.out.heading_start(level);
        match &number {
            Some(number) => self.expand(&format!("{number} {text}")),
            None => self.expand(text),
        }
        self.out.heading_end(level);

        self.outline.push(Heading {
            level,
            number,
            text: text.to_owned(),
        });
    }

    fn horizontal_rule(&mut self, line: &'a str) -> bool {
        if !scan::is_horizontal_rule(line) {
            return false;
        }
        self.close_for(LineRule::HorizontalRule);
        self.out.thematic_break();
        true
    }

    fn list_item(&mut self, line: &'a str) -> bool {
        let Some(item) = scan::list_item(line) else {
            return false;
        };
        self.close_for(LineRule::ListItem);

        let depth = item.indent / 2;
        while self.lists.last().is_some_and(|top| top.depth > depth) {
            self.pop_list();
        }
        if self
            .lists
            .last()
            .is_some_and(|top| top.depth == depth && top.kind != item.kind)
        {
            self.pop_list();
        }
        if !self.lists.last().is_some_and(|top| top.depth == depth) {
            debug!("open {:?} list at depth {depth}", item.kind);
            self.out.list_start(item.kind);
            self.lists.push(ListFrame {
                kind: item.kind,
                depth,
            });
        }

        match scan::task(item.content) {
            (TaskState::None, text) => {
                self.out.li_start();
                self.expand(text);
            }
            (state, text) => {
                self.out.task_li_start(state == TaskState::Checked);
                self.expand(text);
            }
        }
        self.out.li_end();
        true
    }

    fn table_row(&mut self, line: &'a str) -> bool {
        let Some(cells) = scan::table_cells(line) else {
            return false;
        };
        if scan::is_separator_row(&cells) {
            return true;
        }
        self.close_for(LineRule::TableRow);

        if let OpenBlock::Table(table) = &mut self.block {
            table.rows.push(cells);
            return true;
        }

        let header = self
            .lines
            .get(self.pos)
            .is_some_and(|next| scan::announces_header(next));
        debug!("open table (header: {header})");
        let mut table = TableBlock::default();
        if header {
            table.header = Some(cells);
        } else {
            table.rows.push(cells);
        }
        self.block = OpenBlock::Table(table);
        true
    }

    fn quote(&mut self, line: &'a str) -> bool {
        let content = match scan::quote_content(line) {
            Some(content) => {
                if let Some(kind) = scan::alert_marker(content) {
                    self.close_all();
                    debug!("open {kind:?} alert");
                    self.block = OpenBlock::Alert {
                        kind,
                        lines: Vec::new(),
                    };
                    return true;
                }
                content
            }
            // Lazy continuation.
            None if self.block.is_quote_like() => line,
            None => return false,
        };

        match self.block {
            OpenBlock::Quote(ref mut lines) | OpenBlock::Alert { ref mut lines, .. } => {
                lines.push(content)
            }
            _ => {
                self.close_for(LineRule::Quote);
                debug!("open blockquote");
                self.block = OpenBlock::Quote(vec![content]);
            }
        }
        true
    }

    fn image(&mut self, line: &'a str) -> bool {
        let Some(image) = scan::standalone_image(line) else {
            return false;
        };
        self.close_for(LineRule::Image);

        let mut src = String::with_capacity(image.src.len());
        if is_safe_url(image.src) {
            escape_html_into(&mut src, image.src);
        } else {
            debug!("dropping image source with blocked scheme");
        }

        let figure = if image.alt.trim().is_empty() {
            None
        } else {
            self.figures += 1;
            Some(self.figures)
        };
        self.out.figure(&src, image.alt, image.width, figure);
        true
    }

    fn paragraph(&mut self, line: &'a str) -> bool {
        self.close_for(LineRule::Paragraph);
        self.out.paragraph_start();
        self.expand(line);
        self.out.paragraph_end();
        true
    }

    // --- Closing ---

    /// Close what a line handled by `rule` ends.
    fn close_for(&mut self, rule: LineRule) {
        if closes_list(rule) {
            self.close_list();
        }
        if self.block.kind().is_some_and(|kind| closes(kind, rule)) {
            self.close_block();
        }
    }

    fn close_all(&mut self) {
        self.close_list();
        self.close_block();
    }

    fn pop_list(&mut self) {
        if let Some(frame) = self.lists.pop() {
            self.out.list_end(frame.kind);
        }
    }

    fn close_list(&mut self) {
        if !self.lists.is_empty() {
            debug!("close {} list level(s)", self.lists.len());
        }
        while let Some(frame) = self.lists.pop() {
            self.out.list_end(frame.kind);
        }
    }

    /// Flush the open block, if any.
    fn close_block(&mut self) {
        match std::mem::take(&mut self.block) {
            OpenBlock::None => {}
            OpenBlock::Code(code) => {
                debug!("close code block ({} lines)", code.lines.len());
                let lang = (!code.lang.is_empty()).then_some(code.lang);
                self.out.code_block(lang, code.lines.iter().copied());
            }
            OpenBlock::Table(table) => {
                debug!("close table ({} body rows)", table.rows.len());
                self.render_table(&table);
            }
            OpenBlock::Quote(lines) => {
                debug!("close blockquote");
                self.out.blockquote_start();
                self.render_paragraphs(&lines);
                self.out.blockquote_end();
            }
            OpenBlock::Alert { kind, lines } => {
                debug!("close {kind:?} alert");
                self.out.alert_start(kind);
                self.render_paragraphs(&lines);
                self.out.alert_end();
            }
        }
    }

    fn render_table(&mut self, table: &TableBlock<'a>) {
        self.out.open_tag_nl("table");
        if let Some(header) = &table.header {
            self.out.open_tag_nl("thead");
            self.render_row(header, true);
            self.out.close_tag_nl("thead");
        }
        if !table.rows.is_empty() {
            self.out.open_tag_nl("tbody");
            for row in &table.rows {
                self.render_row(row, false);
            }
            self.out.close_tag_nl("tbody");
        }
        self.out.close_tag_nl("table");
    }

    fn render_row(&mut self, cells: &[&str], header: bool) {
        self.out.open_tag_nl("tr");
        for cell in cells {
            self.out.cell_start(header);
            self.expand(cell);
            self.out.cell_end(header);
        }
        self.out.close_tag_nl("tr");
    }

    /// Group buffered quote lines into paragraphs; empty lines separate them.
    fn render_paragraphs(&mut self, lines: &[&str]) {
        let mut open = false;
        for line in lines {
            if line.is_empty() {
                if open {
                    self.out.close_tag("p");
                    open = false;
                }
                continue;
            }
            if open {
                self.out.write_char(' ');
            } else {
                self.out.paragraph_start();
                open = true;
            }
            self.expand(line);
        }
        if open {
            self.out.close_tag("p");
        }
    }

    // --- Footnotes and inline ---

    /// Render the section's referenced footnotes and clear the queue.
    fn flush_footnotes(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let pending = self.queue.take();
        debug!("flushing {} footnote(s)", pending.len());

        let footnotes = self.footnotes;
        self.out.write_str("<div class=\"footnotes\">\n");
        for id in &pending {
            let Some(text) = footnotes.get(id) else {
                debug!("no definition for footnote {id:?}");
                continue;
            };
            self.out.write_str("<div class=\"footnote\" id=\"footnote-");
            self.out.write_escaped_text(id);
            self.out.write_str("\"><sup>");
            self.out.write_escaped_text(id);
            self.out.write_str("</sup> ");
            self.expand(text);
            self.out.write_str("</div>\n");
        }
        self.out.write_str("</div>\n");

        // References made inside footnote bodies are not carried over.
        self.queue.clear();
    }

    fn expand(&mut self, text: &str) {
        self.inline
            .expand_into(self.out.buffer_mut(), text, &mut self.queue);
    }
}
