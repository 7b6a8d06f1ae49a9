//! HTML escaping utilities.
//!
//! Fast-path optimized: scans for the first escapable character with
//! `memchr`, then bulk-copies the segments between escapes.
//!
//! Three flavours are used by the renderer:
//!
//! - [`escape_html_into`] escapes all five special characters and is used
//!   for literal content (code, metadata, captions, labels).
//! - [`escape_loose_into`] escapes `<`, `>` and bare `&`, leaving
//!   well-formed entity references alone. Inline prose goes through it.
//! - [`escape_quotes_into`] only neutralizes quotes, for values that were
//!   already escaped as text and are now placed inside an attribute.

use memchr::{memchr, memchr2, memchr3};

/// Lookup table for characters escaped in literal content.
const HTML_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table[b'\'' as usize] = true;
    table
};

#[inline]
fn replacement(b: u8) -> &'static str {
    match b {
        b'<' => "&lt;",
        b'>' => "&gt;",
        b'&' => "&amp;",
        b'"' => "&quot;",
        b'\'' => "&#39;",
        _ => unreachable!(),
    }
}

/// Escape `& < > " '` into the output buffer.
///
/// # Example
/// ```
/// use paperdown::escape::escape_html_into;
///
/// let mut out = String::new();
/// escape_html_into(&mut out, "<b class=\"x\">");
/// assert_eq!(out, "&lt;b class=&quot;x&quot;&gt;");
/// ```
#[inline]
pub fn escape_html_into(out: &mut String, input: &str) {
    let bytes = input.as_bytes();
    let mut pos = match first_html_escape(bytes) {
        Some(p) => p,
        None => {
            out.push_str(input);
            return;
        }
    };

    out.push_str(&input[..pos]);

    while pos < bytes.len() {
        let scan_start = pos;
        while pos < bytes.len() && !HTML_ESCAPE_TABLE[bytes[pos] as usize] {
            pos += 1;
        }
        out.push_str(&input[scan_start..pos]);

        if pos < bytes.len() {
            out.push_str(replacement(bytes[pos]));
            pos += 1;
        }
    }
}

/// Escape `<`, `>` and any `&` that does not start an entity reference.
///
/// An entity reference is `&` followed by one or more ASCII alphanumerics
/// or `#`, terminated by `;`.
#[inline]
pub fn escape_loose_into(out: &mut String, input: &str) {
    let bytes = input.as_bytes();
    let mut last = 0;
    let mut pos = 0;

    while let Some(offset) = memchr3(b'<', b'>', b'&', &bytes[pos..]) {
        let at = pos + offset;
        out.push_str(&input[last..at]);
        match bytes[at] {
            b'<' => out.push_str("&lt;"),
            b'>' => out.push_str("&gt;"),
            _ if starts_with_entity(&bytes[at..]) => out.push('&'),
            _ => out.push_str("&amp;"),
        }
        pos = at + 1;
        last = pos;
    }

    out.push_str(&input[last..]);
}

/// Replace `"` and `'` with their entity forms.
#[inline]
pub fn escape_quotes_into(out: &mut String, input: &str) {
    let bytes = input.as_bytes();
    let mut last = 0;
    let mut pos = 0;

    while let Some(offset) = memchr2(b'"', b'\'', &bytes[pos..]) {
        let at = pos + offset;
        out.push_str(&input[last..at]);
        out.push_str(replacement(bytes[at]));
        pos = at + 1;
        last = pos;
    }

    out.push_str(&input[last..]);
}

/// Whether `bytes` begins with `&name;`, `&#123;` or `&#x1F;`.
#[inline]
pub fn starts_with_entity(bytes: &[u8]) -> bool {
    if bytes.first() != Some(&b'&') {
        return false;
    }
    let body = &bytes[1..];
    let Some(semi) = memchr(b';', body) else {
        return false;
    };
    semi > 0
        && body[..semi]
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b == b'#')
}

/// Check if a string needs any escaping as literal content.
#[inline]
pub fn needs_html_escape(input: &str) -> bool {
    first_html_escape(input.as_bytes()).is_some()
}

#[inline]
fn first_html_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr2(b'"', b'\'', input);
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Escape and return as a new String.
///
/// Prefer `escape_html_into` to reuse buffers.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    escape_html_into(&mut out, input);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(input: &str) -> String {
        escape_html(input)
    }

    fn loose(input: &str) -> String {
        let mut out = String::new();
        escape_loose_into(&mut out, input);
        out
    }

    #[test]
    fn test_escape_html_plain() {
        assert_eq!(html("Hello, World!"), "Hello, World!");
        assert_eq!(html(""), "");
    }

    #[test]
    fn test_escape_html_all() {
        assert_eq!(html("<>&\"'"), "&lt;&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn test_escape_html_boundaries() {
        assert_eq!(html("<"), "&lt;");
        assert_eq!(html("hello<"), "hello&lt;");
        assert_eq!(html("<hello"), "&lt;hello");
        assert_eq!(html("<<<"), "&lt;&lt;&lt;");
    }

    #[test]
    fn test_escape_html_unicode() {
        assert_eq!(html("Grüße <tag> – ok"), "Grüße &lt;tag&gt; – ok");
    }

    #[test]
    fn test_loose_keeps_entities() {
        assert_eq!(loose("a &amp; b"), "a &amp; b");
        assert_eq!(loose("&#169; 2024"), "&#169; 2024");
        assert_eq!(loose("&copy;"), "&copy;");
    }

    #[test]
    fn test_loose_escapes_bare_ampersand() {
        assert_eq!(loose("fish & chips"), "fish &amp; chips");
        assert_eq!(loose("&;"), "&amp;;");
        assert_eq!(loose("& ;"), "&amp; ;");
        assert_eq!(loose("&"), "&amp;");
    }

    #[test]
    fn test_loose_leaves_quotes() {
        assert_eq!(loose("say \"hi\" <now>"), "say \"hi\" &lt;now&gt;");
    }

    #[test]
    fn test_escape_quotes() {
        let mut out = String::new();
        escape_quotes_into(&mut out, "it's \"x\" &amp;");
        assert_eq!(out, "it&#39;s &quot;x&quot; &amp;");
    }

    #[test]
    fn test_needs_escape() {
        assert!(!needs_html_escape("hello"));
        assert!(needs_html_escape("<hello>"));
        assert!(needs_html_escape("it's"));
        assert!(!needs_html_escape(""));
    }

    #[test]
    fn test_starts_with_entity() {
        assert!(starts_with_entity(b"&lt;"));
        assert!(starts_with_entity(b"&#x27;rest"));
        assert!(!starts_with_entity(b"&"));
        assert!(!starts_with_entity(b"&a b;"));
        assert!(!starts_with_entity(b"x&lt;"));
    }
}
