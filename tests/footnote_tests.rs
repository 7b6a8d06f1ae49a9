use paperdown::{to_html_with_options, Options, DEFAULT_LABEL};
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

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in {haystack:?}"))
}

#[test]
fn test_forward_reference() {
    assert_eq!(
        html("Text[^1].\n\n[^1]: Note one."),
        "<p>Text<sup><a href=\"#footnote-1\" class=\"footnote-ref\">1</a></sup>.</p>\n\
         <div class=\"footnotes\">\n\
         <div class=\"footnote\" id=\"footnote-1\"><sup>1</sup> Note one.</div>\n\
         </div>\n"
    );
}

#[test]
fn test_definition_lines_not_rendered() {
    let out = html("a[^n]\n[^n]: body");
    assert!(!out.contains("[^n]:"));
    assert_eq!(out.matches("<p>").count(), 1);
}

#[test]
fn test_dangling_reference() {
    let out = html("x[^missing]");
    assert!(out.contains("<a href=\"#footnote-missing\" class=\"footnote-ref\">missing</a>"));
    assert!(!out.contains("id=\"footnote-missing\""));
    assert!(out.ends_with("<div class=\"footnotes\">\n</div>\n"));
}

#[test]
fn test_repeated_reference_rendered_once() {
    let out = html("a[^1] b[^1]\n[^1]: n");
    assert_eq!(out.matches("class=\"footnote-ref\"").count(), 2);
    assert_eq!(out.matches("id=\"footnote-1\"").count(), 1);
}

#[test]
fn test_order_of_first_reference() {
    let out = html("a[^b] c[^a]\n[^a]: A\n[^b]: B");
    assert!(position(&out, "id=\"footnote-b\"") < position(&out, "id=\"footnote-a\""));
}

#[test]
fn test_flushed_at_next_chapter() {
    let out = html("## One\nx[^1]\n## Two\ny[^2]\n[^1]: first\n[^2]: second");
    let two = position(&out, "<h2>2 Two</h2>");
    assert!(position(&out, "id=\"footnote-1\"") < two);
    assert!(position(&out, "id=\"footnote-2\"") > two);
}

#[test]
fn test_not_flushed_when_descending() {
    let out = html("## A\nx[^1]\n### B\ny[^2]\n[^1]: one\n[^2]: two");
    let notes = position(&out, "class=\"footnotes\"");
    assert!(notes > position(&out, "<h3>1.1 B</h3>"));
    assert_eq!(out.matches("class=\"footnotes\"").count(), 1);
}

#[test]
fn test_flushed_below_sections() {
    let out = html("### A\nx[^1]\n#### B\n[^1]: one");
    assert!(position(&out, "class=\"footnotes\"") < position(&out, "<h4>B</h4>"));
}

#[test]
fn test_flushed_before_title() {
    let out = html("x[^1]\n# Title\n[^1]: n");
    assert!(position(&out, "class=\"footnotes\"") < position(&out, "<header"));
}

#[test]
fn test_last_definition_wins() {
    let out = html("x[^1]\n[^1]: old\n[^1]: new");
    assert!(out.contains("<sup>1</sup> new</div>"));
    assert!(!out.contains("old"));
}

#[test]
fn test_body_inline_expanded() {
    let out = html("x[^1]\n[^1]: see **this**");
    assert!(out.contains("<sup>1</sup> see <strong>this</strong></div>"));
}

#[test]
fn test_references_in_bodies_not_carried_over() {
    let out = html("x[^1]\n[^1]: see [^2]\n[^2]: two");
    assert!(out.contains("<a href=\"#footnote-2\" class=\"footnote-ref\">2</a>"));
    assert!(!out.contains("id=\"footnote-2\""));
}

#[test]
fn test_references_in_blocks() {
    let out = html("- item[^a]\n\n| cell[^b] |\n\n> quote[^c]\n\n[^a]: A\n[^b]: B\n[^c]: C");
    assert!(out.contains("<li>item<sup>"));
    assert!(out.contains("<td>cell<sup>"));
    assert!(out.contains("<p>quote<sup>"));
    for id in ["a", "b", "c"] {
        assert!(out.contains(&format!("id=\"footnote-{id}\"")));
    }
}

#[test]
fn test_no_references_no_container() {
    assert!(!html("## A\nplain\n[^1]: unused").contains("footnotes"));
}
