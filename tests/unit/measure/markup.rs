use super::*;

#[test]
fn wraps_with_floored_width() {
    assert_eq!(
        wrap_fragment("<p>x</p>", 320.7),
        "<div class=\"cell-measure\" style=\"width:320px\"><p>x</p></div>"
    );
}

#[test]
fn strips_inline_tags() {
    assert_eq!(plain_text("<p>Hello <b>bold</b> world</p>"), "Hello bold world");
}

#[test]
fn block_closers_break_lines() {
    assert_eq!(plain_text("<p>one</p><p>two</p>"), "one\ntwo");
    assert_eq!(plain_text("a<br>b<br/>c"), "a\nb\nc");
}

#[test]
fn decodes_entities_once() {
    assert_eq!(plain_text("fish &amp; chips &amp;lt;"), "fish & chips &lt;");
    assert_eq!(plain_text("a&nbsp;&nbsp;b"), "a b");
}

#[test]
fn whitespace_only_is_empty() {
    assert_eq!(plain_text("  <div> </div>\n "), "");
    assert_eq!(plain_text(""), "");
}

#[test]
fn unterminated_tag_is_kept() {
    assert_eq!(plain_text("a < b"), "a < b");
}

#[test]
fn comments_are_dropped_whole() {
    assert_eq!(plain_text("<!-- a > b -->hello"), "hello");
    assert_eq!(plain_text("<p>x<!-- <p>y</p> --></p>"), "x");
}

#[test]
fn numeric_and_named_entities_decode() {
    assert_eq!(plain_text("it&#8217;s &eacute;t&eacute;"), "it\u{2019}s \u{e9}t\u{e9}");
    assert_eq!(plain_text("&#x41;&#66;"), "AB");
}

#[test]
fn bare_angle_brackets_stay_text() {
    assert_eq!(
        plain_text("<p>1 &lt; 2 and x < y and y > z</p>"),
        "1 < 2 and x < y and y > z"
    );
}

#[test]
fn script_and_style_content_is_hidden() {
    assert_eq!(plain_text("<p>ok<script>var x = 1;</script></p>"), "ok");
    assert_eq!(plain_text("<style>p { color: red }</style><p>shown</p>"), "shown");
}

#[test]
fn source_newlines_collapse_but_breaks_stack() {
    assert_eq!(plain_text("one\n   two"), "one two");
    assert_eq!(plain_text("a<br><br>b"), "a\n\nb");
}
