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

#[test]
fn test_star_marker_unordered() {
    assert_eq!(html("* a\n* b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
}

#[test]
fn test_dash_marker_ordered() {
    assert_eq!(html("- a\n- b"), "<ol>\n<li>a</li>\n<li>b</li>\n</ol>\n");
}

#[test]
fn test_dash_and_number_share_a_list() {
    assert_eq!(html("- a\n1. b"), "<ol>\n<li>a</li>\n<li>b</li>\n</ol>\n");
}

#[test]
fn test_ordered_list() {
    assert_eq!(html("1. a\n2. b\n10. c"), "<ol>\n<li>a</li>\n<li>b</li>\n<li>c</li>\n</ol>\n");
}

#[test]
fn test_nested_list() {
    assert_eq!(
        html("* a\n  * b\n  * c\n* d"),
        "<ul>\n<li>a</li>\n<ul>\n<li>b</li>\n<li>c</li>\n</ul>\n<li>d</li>\n</ul>\n"
    );
}

#[test]
fn test_ordered_inside_unordered() {
    assert_eq!(
        html("* a\n  1. one\n  2. two\n* b"),
        "<ul>\n<li>a</li>\n<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n<li>b</li>\n</ul>\n"
    );
}

#[test]
fn test_kind_switch_at_same_depth() {
    assert_eq!(
        html("* a\n- b"),
        "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>\n"
    );
}

#[test]
fn test_depth_jump_opens_one_list() {
    assert_eq!(
        html("* a\n      * deep\n* b"),
        "<ul>\n<li>a</li>\n<ul>\n<li>deep</li>\n</ul>\n<li>b</li>\n</ul>\n"
    );
}

#[test]
fn test_end_of_input_closes_all_levels() {
    assert_eq!(
        html("* a\n  * b\n    * c"),
        "<ul>\n<li>a</li>\n<ul>\n<li>b</li>\n<ul>\n<li>c</li>\n</ul>\n</ul>\n</ul>\n"
    );
}

#[test]
fn test_blank_line_closes_list() {
    assert_eq!(
        html("* a\n\n* b"),
        "<ul>\n<li>a</li>\n</ul>\n<ul>\n<li>b</li>\n</ul>\n"
    );
}

#[test]
fn test_paragraph_closes_list() {
    assert_eq!(html("* a\ntext"), "<ul>\n<li>a</li>\n</ul>\n<p>text</p>\n");
}

#[test]
fn test_list_closes_quote() {
    assert_eq!(
        html("> q\n* a"),
        "<blockquote><p>q</p></blockquote>\n<ul>\n<li>a</li>\n</ul>\n"
    );
}

#[test]
fn test_task_items() {
    let out = html("- [x] done\n- [ ] pending\n- [X] also done\n- [] empty");
    assert_eq!(
        out,
        "<ol>\n\
         <li class=\"task-list-item\"><input type=\"checkbox\" disabled checked> done</li>\n\
         <li class=\"task-list-item\"><input type=\"checkbox\" disabled> pending</li>\n\
         <li class=\"task-list-item\"><input type=\"checkbox\" disabled checked> also done</li>\n\
         <li class=\"task-list-item\"><input type=\"checkbox\" disabled> empty</li>\n\
         </ol>\n"
    );
}

#[test]
fn test_task_text_expanded() {
    let out = html("- [x] **bold** move");
    assert!(out.contains("disabled checked> <strong>bold</strong> move</li>"));
}

#[test]
fn test_item_inline_markup() {
    assert_eq!(
        html("* see `code` and [docs](https://docs.rs)"),
        "<ul>\n<li>see <code>code</code> and <a href=\"https://docs.rs\" target=\"_blank\" \
         rel=\"noopener noreferrer\">docs</a></li>\n</ul>\n"
    );
}

#[test]
fn test_marker_needs_space() {
    assert_eq!(html("-nope"), "<p>-nope</p>\n");
    assert_eq!(html("1.nope"), "<p>1.nope</p>\n");
}

#[test]
fn test_horizontal_rule_not_a_list() {
    assert_eq!(html("* a\n***"), "<ul>\n<li>a</li>\n</ul>\n<hr>\n");
    assert_eq!(html("- a\n---"), "<ol>\n<li>a</li>\n</ol>\n<hr>\n");
}
