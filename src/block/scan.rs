//! Line recognizers.
//!
//! Pure functions over a single line; they never look at parser state.
//! Lines arrive with trailing whitespace already trimmed.

use smallvec::SmallVec;

use super::kind::{AlertKind, ListKind, TaskState};

/// Table cells of one row.
pub type Cells<'a> = SmallVec<[&'a str; 8]>;

/// An opening or closing code fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence<'a> {
    /// The full leading backtick run.
    pub token: &'a str,
    /// Word characters directly after the token; may be empty.
    pub lang: &'a str,
}

/// Recognize a line starting with three or more backticks.
pub fn fence(line: &str) -> Option<Fence<'_>> {
    let run = line.bytes().take_while(|&b| b == b'`').count();
    if run < 3 {
        return None;
    }
    let lang_len = line[run..].bytes().take_while(|&b| is_word_byte(b)).count();
    Some(Fence {
        token: &line[..run],
        lang: &line[run..run + lang_len],
    })
}

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Content of an indented code line (four spaces or a tab), unless the
/// line is a list item.
pub fn indented_code(line: &str) -> Option<&str> {
    let content = line.strip_prefix("    ").or_else(|| line.strip_prefix('\t'))?;
    if list_item(line).is_some() {
        return None;
    }
    Some(content)
}

/// A heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLine<'a> {
    pub level: u8,
    pub text: &'a str,
}

/// Recognize `# text` through `###### text`.
pub fn heading(line: &str) -> Option<HeadingLine<'_>> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(HeadingLine {
        level: hashes as u8,
        text: rest.trim_start(),
    })
}

/// Recognize a `key: value` metadata line (already trimmed).
pub fn metadata(line: &str) -> Option<(&str, &str)> {
    let key_len = line.bytes().take_while(|&b| is_word_byte(b)).count();
    if key_len == 0 {
        return None;
    }
    let value = line[key_len..].strip_prefix(':')?.trim_start();
    if value.is_empty() {
        return None;
    }
    Some((&line[..key_len], value))
}

/// Three or more of one of `*`, `-`, `_` and nothing else.
pub fn is_horizontal_rule(line: &str) -> bool {
    let line = line.trim();
    let Some(first) = line.bytes().next() else {
        return false;
    };
    matches!(first, b'*' | b'-' | b'_') && line.len() >= 3 && line.bytes().all(|b| b == first)
}

/// A list item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItem<'a> {
    pub kind: ListKind,
    /// Number of leading whitespace characters.
    pub indent: usize,
    pub content: &'a str,
}

/// Recognize `* item`, `- item` or `12. item`, optionally indented.
pub fn list_item(line: &str) -> Option<ListItem<'_>> {
    let body = line.trim_start();
    let indent = line[..line.len() - body.len()].chars().count();

    let (kind, rest) = match body.as_bytes().first()? {
        b'*' => (ListKind::Unordered, &body[1..]),
        b'-' => (ListKind::Ordered, &body[1..]),
        b'0'..=b'9' => {
            let digits = body.bytes().take_while(u8::is_ascii_digit).count();
            (ListKind::Ordered, body[digits..].strip_prefix('.')?)
        }
        _ => return None,
    };

    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(ListItem {
        kind,
        indent,
        content: rest.trim_start(),
    })
}

/// Split `[x] text`, `[ ] text` or `[] text` into its state and text.
pub fn task(content: &str) -> (TaskState, &str) {
    let parsed = content.strip_prefix('[').and_then(|rest| {
        let (state, rest) = match rest.as_bytes().first()? {
            b'x' | b'X' => (TaskState::Checked, &rest[1..]),
            b' ' => (TaskState::Unchecked, &rest[1..]),
            _ => (TaskState::Unchecked, rest),
        };
        let rest = rest.strip_prefix(']')?;
        rest.starts_with(char::is_whitespace)
            .then(|| (state, rest.trim_start()))
    });
    parsed.unwrap_or((TaskState::None, content))
}

/// Split a table row into trimmed cells.
///
/// The line must contain `|` and yield at least one non-empty cell. One
/// leading and one trailing pipe are dropped, as is every empty cell.
pub fn table_cells(line: &str) -> Option<Cells<'_>> {
    if !line.contains('|') {
        return None;
    }
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);

    let cells: Cells<'_> = trimmed
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    (!cells.is_empty()).then_some(cells)
}

/// Whether every cell is made of dashes, colons and whitespace.
pub fn is_separator_row(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|c| c.bytes().all(|b| matches!(b, b'-' | b':') || b.is_ascii_whitespace()))
}

/// Lookahead test for a header row: the next line has both `|` and `-`.
pub fn announces_header(next: &str) -> bool {
    next.contains('|') && next.contains('-')
}

/// Strip `>` and one following space.
pub fn quote_content(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Recognize `[!NOTE]` and friends as the whole quote content.
pub fn alert_marker(content: &str) -> Option<AlertKind> {
    let name = content.trim().strip_prefix("[!")?.strip_suffix(']')?;
    AlertKind::from_name(name)
}

/// A standalone image line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image<'a> {
    pub alt: &'a str,
    pub src: &'a str,
    pub width: Option<&'a str>,
}

/// Recognize `![alt](src)` optionally followed by `{attrs}` as a whole line.
pub fn standalone_image(line: &str) -> Option<Image<'_>> {
    let rest = line.strip_prefix("![")?;
    let alt_end = rest.find(']')?;
    let alt = &rest[..alt_end];
    let rest = rest[alt_end + 1..].strip_prefix('(')?;
    let src_end = rest.find(')')?;
    if src_end == 0 {
        return None;
    }
    let src = &rest[..src_end];
    let rest = rest[src_end + 1..].trim_start();

    let width = if rest.is_empty() {
        None
    } else {
        let attrs = rest.strip_prefix('{')?.strip_suffix('}')?;
        if attrs.is_empty() || attrs.contains('}') {
            return None;
        }
        width_attr(attrs)
    };

    Some(Image { alt, src, width })
}

/// Extract `width=VALUE` or `width="VALUE"` from an attribute block.
fn width_attr(attrs: &str) -> Option<&str> {
    let at = attrs.find("width")?;
    let rest = attrs[at + "width".len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let rest = rest.strip_prefix('"').unwrap_or(rest);
    let len = rest
        .find(|c: char| c == '"' || c == ',' || c.is_whitespace())
        .unwrap_or(rest.len());
    (len > 0).then(|| &rest[..len])
}
