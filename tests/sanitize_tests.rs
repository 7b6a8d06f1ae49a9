use paperdown::{sanitize, to_html_with_options, Options, DEFAULT_LABEL};
use pretty_assertions::assert_eq;

fn html(input: &str) -> String {
    to_html_with_options(
        input,
        DEFAULT_LABEL,
        &Options {
            footer: false,
            ..Options::default()
        },
    )
}

#[test]
fn test_script_escaped() {
    assert_eq!(
        html("<script>alert(1)</script>"),
        "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>\n"
    );
}

#[test]
fn test_uppercase_script_escaped() {
    assert_eq!(html("<SCRIPT>x</SCRIPT>"), "<p>&lt;SCRIPT&gt;x&lt;/SCRIPT&gt;</p>\n");
}

#[test]
fn test_allowed_tag_keeps_safe_attributes() {
    assert_eq!(
        html("<span class=\"x\" onmouseover=\"evil()\">hi</span>"),
        "<p><span class=\"x\">hi</span></p>\n"
    );
}

#[test]
fn test_allowed_tag_case_preserved() {
    assert_eq!(html("<STRONG>x</STRONG>"), "<p><STRONG>x</STRONG></p>\n");
}

#[test]
fn test_script_href_dropped() {
    assert_eq!(html("<a href=\"javascript:alert(1)\">x</a>"), "<p><a>x</a></p>\n");
}

#[test]
fn test_img_event_handler_dropped() {
    assert_eq!(
        html("<img src=\"a.png\" onerror=\"steal()\">"),
        "<p><img src=\"a.png\"></p>\n"
    );
}

#[test]
fn test_data_src_dropped() {
    assert_eq!(html("<img src=\"data:image/png;base64,AAAA\">"), "<p><img></p>\n");
}

#[test]
fn test_unknown_tags_escaped() {
    let out = html("<iframe src=\"https://x\"></iframe> <style>p{}</style>");
    assert!(!out.contains("<iframe"));
    assert!(!out.contains("<style"));
    assert!(out.contains("&lt;iframe"));
}

#[test]
fn test_markdown_link_with_script_url() {
    let out = html("[click](javascript:alert(1))");
    assert!(!out.contains("href"));
    assert!(out.contains("click"));
}

#[test]
fn test_entity_obfuscated_link() {
    let out = html("[x](&#106;avascript:alert(1))");
    assert!(!out.contains("href"));
}

#[test]
fn test_inline_image_script_src_dropped() {
    let out = html("see ![pic](javascript:x) here");
    assert!(out.contains("<img alt=\"pic\">"));
    assert!(!out.contains("javascript"));
}

#[test]
fn test_figure_script_src_emptied() {
    let out = html("![pic](vbscript:x)");
    assert!(out.contains("<img src=\"\" alt=\"pic\" />"));
}

#[test]
fn test_attribute_value_cannot_open_tag() {
    let out = html("<b title=\"<script>\">x</b>");
    assert!(!out.to_ascii_lowercase().contains("<script"));
}

#[test]
fn test_tag_inside_code_span_literal() {
    assert_eq!(html("`<b>`"), "<p><code>&lt;b&gt;</code></p>\n");
}

#[test]
fn test_sanitize_function() {
    assert_eq!(
        sanitize("<em style=\"color:red\" onclick=\"x\">a</em><object>"),
        "<em style=\"color:red\">a</em>&lt;object&gt;"
    );
}
