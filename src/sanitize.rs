//! Whitelist sanitizer for HTML tags written literally in Markdown text.
//!
//! Anything shaped like `<name …>` or `</name>` is inspected. Tags on the
//! allowlist are re-emitted with only allowlisted attributes. Everything
//! else has its angle brackets escaped so it renders as text.

use memchr::memchr;
use smallvec::SmallVec;

/// Tags that may appear in rendered output when written literally.
pub const ALLOWED_TAGS: &[&str] = &[
    "strong", "b", "em", "i", "u", "s", "del", "ins", "mark", "span", "div", "p", "br", "hr",
    "code", "pre", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "dl", "dt", "dd",
    "blockquote", "q", "cite", "table", "thead", "tbody", "tr", "th", "td", "a", "img", "sub",
    "sup", "small", "abbr", "time", "figure", "figcaption",
];

/// Attributes kept on allowed tags.
pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "class", "id", "style", "title", "lang", "dir", "href", "target", "rel", "src", "alt", "width",
    "height", "colspan", "rowspan", "datetime", "cite", "type", "disabled", "checked",
];

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:", "about:"];

/// A tag-shaped span found in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpan<'a> {
    /// Byte offset just past the closing `>`.
    pub end: usize,
    pub closing: bool,
    pub name: &'a str,
    /// Raw text between the name and `>`.
    pub attrs: &'a str,
}

/// A parsed attribute. `value` is empty for bare attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attribute<'a> {
    name: &'a str,
    value: &'a str,
}

/// Recognize `<name…>` or `</name…>` starting at `pos`.
///
/// `name` is one or more word characters or hyphens; the tag extends to the
/// first `>`.
pub fn scan_tag(text: &str, pos: usize) -> Option<TagSpan<'_>> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'<') {
        return None;
    }

    let mut i = pos + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && is_name_byte(bytes[i]) {
        i += 1;
    }
    if i == name_start {
        return None;
    }

    let gt = i + memchr(b'>', &bytes[i..])?;
    Some(TagSpan {
        end: gt + 1,
        closing,
        name: &text[name_start..i],
        attrs: &text[i..gt],
    })
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Check a tag name against the allowlist (case-insensitive).
#[inline]
pub fn is_allowed_tag(name: &str) -> bool {
    ALLOWED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// Check an attribute name against the allowlist. `name` must be lower-case.
#[inline]
pub fn is_allowed_attribute(name: &str) -> bool {
    ALLOWED_ATTRIBUTES.contains(&name)
}

/// Whether a URL may be emitted in `href`/`src`.
///
/// Entity references are decoded and whitespace or control characters are
/// ignored before the scheme is compared, since browsers do the same.
pub fn is_safe_url(value: &str) -> bool {
    let decoded = html_escape::decode_html_entities(value);
    let compact: String = decoded
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect();
    !BLOCKED_SCHEMES.iter().any(|scheme| {
        compact
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

/// Write a tag that passed [`is_allowed_tag`], keeping only safe attributes.
pub fn write_allowed_tag(out: &mut String, tag: &TagSpan<'_>) {
    if tag.closing {
        out.push_str("</");
        out.push_str(tag.name);
        out.push('>');
        return;
    }

    out.push('<');
    out.push_str(tag.name);
    for attr in parse_attributes(tag.attrs) {
        let name = attr.name.to_ascii_lowercase();
        if !is_allowed_attribute(&name) {
            continue;
        }
        if (name == "href" || name == "src") && !is_safe_url(attr.value) {
            continue;
        }
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        write_attribute_value(out, attr.value);
        out.push('"');
    }
    out.push('>');
}

#[inline]
fn write_attribute_value(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Split the raw attribute text into `name[=value]` pairs.
///
/// Each pair must be preceded by whitespace. Values may be double-quoted,
/// single-quoted, or bare (running to the next whitespace).
fn parse_attributes(raw: &str) -> SmallVec<[Attribute<'_>; 4]> {
    let bytes = raw.as_bytes();
    let mut attrs = SmallVec::new();
    let mut i = 0;

    while i < bytes.len() {
        let ws_start = i;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == ws_start {
            i += 1;
            continue;
        }

        let name_start = i;
        while i < bytes.len() && bytes[i] != b'=' && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == name_start {
            continue;
        }
        let name = &raw[name_start..i];

        let (value, next) = parse_value(raw, i).unwrap_or(("", i));
        attrs.push(Attribute { name, value });
        i = next;
    }

    attrs
}

/// Parse `\s*=\s*value` at `pos`, returning the value and the offset after it.
fn parse_value(raw: &str, pos: usize) -> Option<(&str, usize)> {
    let bytes = raw.as_bytes();
    let mut i = pos;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'=') {
        return None;
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    let quote = *bytes.get(i)?;
    if quote == b'"' || quote == b'\'' {
        if let Some(len) = memchr(quote, &bytes[i + 1..]) {
            let start = i + 1;
            return Some((&raw[start..start + len], start + len + 1));
        }
    }

    let start = i;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    (i > start).then(|| (&raw[start..i], i))
}

/// Sanitize every tag-shaped span in `text`, leaving other text untouched.
///
/// # Example
/// ```
/// use paperdown::sanitize::sanitize;
///
/// assert_eq!(
///     sanitize("<b onclick=\"x()\">hi</b><script>"),
///     "<b>hi</b>&lt;script&gt;"
/// );
/// ```
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    sanitize_into(&mut out, text);
    out
}

/// Buffer-reusing form of [`sanitize`].
pub fn sanitize_into(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut last = 0;
    let mut pos = 0;

    while let Some(offset) = memchr(b'<', &bytes[pos..]) {
        let at = pos + offset;
        let Some(tag) = scan_tag(text, at) else {
            pos = at + 1;
            continue;
        };

        out.push_str(&text[last..at]);
        if is_allowed_tag(tag.name) {
            write_allowed_tag(out, &tag);
        } else {
            write_escaped_tag(out, &text[at..tag.end]);
        }
        pos = tag.end;
        last = pos;
    }

    out.push_str(&text[last..]);
}

/// Neutralize a rejected tag by escaping its angle brackets.
pub fn write_escaped_tag(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_tag_shapes() {
        let tag = scan_tag("<span class=\"x\">", 0).unwrap();
        assert_eq!(tag.name, "span");
        assert!(!tag.closing);
        assert_eq!(tag.attrs, " class=\"x\"");
        assert_eq!(tag.end, 16);

        let tag = scan_tag("a </em> b", 2).unwrap();
        assert!(tag.closing);
        assert_eq!(tag.name, "em");
        assert_eq!(tag.end, 7);
    }

    #[test]
    fn test_scan_tag_rejects() {
        assert!(scan_tag("< b>", 0).is_none());
        assert!(scan_tag("<b", 0).is_none());
        assert!(scan_tag("</>", 0).is_none());
        assert!(scan_tag("x<b>", 0).is_none());
    }

    #[test]
    fn test_allowed_tag_case_insensitive() {
        assert!(is_allowed_tag("STRONG"));
        assert!(is_allowed_tag("figcaption"));
        assert!(!is_allowed_tag("script"));
        assert!(!is_allowed_tag("iframe"));
    }

    #[test]
    fn test_drops_event_handlers() {
        assert_eq!(
            sanitize("<span class=\"note\" onclick=\"evil()\">x</span>"),
            "<span class=\"note\">x</span>"
        );
    }

    #[test]
    fn test_lowercases_attribute_names() {
        assert_eq!(sanitize("<abbr TITLE='World Health'>"), "<abbr title=\"World Health\">");
    }

    #[test]
    fn test_bare_and_unquoted_values() {
        assert_eq!(
            sanitize("<td colspan=2 disabled>"),
            "<td colspan=\"2\" disabled=\"\">"
        );
    }

    #[test]
    fn test_blocks_script_urls() {
        assert_eq!(sanitize("<a href=\"javascript:alert(1)\">x</a>"), "<a>x</a>");
        assert_eq!(sanitize("<a href=\"  JaVaScRiPt:x\">"), "<a>");
        assert_eq!(sanitize("<img src=\"data:text/html,hi\">"), "<img>");
        assert_eq!(sanitize("<a href='vbscript:x'>"), "<a>");
        assert_eq!(sanitize("<a href=\"about:blank\">"), "<a>");
    }

    #[test]
    fn test_blocks_obfuscated_script_urls() {
        assert!(!is_safe_url("&#106;avascript:alert(1)"));
        assert!(!is_safe_url("java\tscript:alert(1)"));
        assert!(is_safe_url("https://example.com/?q=javascript:"));
        assert!(is_safe_url("/relative/path"));
    }

    #[test]
    fn test_keeps_safe_urls() {
        assert_eq!(
            sanitize("<a href=\"https://example.com\" target=\"_blank\">"),
            "<a href=\"https://example.com\" target=\"_blank\">"
        );
    }

    #[test]
    fn test_escapes_quotes_in_values() {
        assert_eq!(
            sanitize("<span title='say \"hi\"'>"),
            "<span title=\"say &quot;hi&quot;\">"
        );
    }

    #[test]
    fn test_disallowed_tags_escaped() {
        assert_eq!(
            sanitize("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(
            sanitize("<iframe src=\"x\">"),
            "&lt;iframe src=\"x\"&gt;"
        );
    }

    #[test]
    fn test_closing_tag_drops_attributes() {
        assert_eq!(sanitize("</div class=\"x\">"), "</div>");
    }

    #[test]
    fn test_non_tag_text_untouched() {
        assert_eq!(sanitize("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
        assert_eq!(sanitize("a <- b"), "a <- b");
    }
}
