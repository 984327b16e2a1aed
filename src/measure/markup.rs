use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Elements whose content is never shown.
const HIDDEN: &[&str] = &["script", "style", "template", "head", "title"];

/// Elements that start and end on their own line.
const BLOCKS: &[&str] = &[
    "address",
    "article",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// Wrap a body fragment in a fixed-width container so a surface lays it out at `width`.
pub fn wrap_fragment(body: &str, width: f64) -> String {
    let w = if width.is_finite() && width > 0.0 {
        width.floor()
    } else {
        0.0
    };
    format!("<div class=\"cell-measure\" style=\"width:{w}px\">{body}</div>")
}

/// Reduce a markup fragment to the text a reader would see.
///
/// The fragment is parsed as HTML5, so entities are decoded and stray `<` stay text. Comments and
/// non-rendered elements (`script`, `style`, ...) are dropped. Block elements and `<br>` become
/// line breaks and every other run of whitespace collapses to one space. Repeated `<br>` keeps its
/// empty lines so they still contribute height.
pub fn plain_text(markup: &str) -> String {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };
    let dom = parse_document(RcDom::default(), opts).one(markup);

    let mut raw = String::with_capacity(markup.len());
    collect_text(&dom.document, &mut raw);

    let lines: Vec<&str> = raw.split('\n').map(str::trim).collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(a), Some(b)) => lines[a..=b].join("\n"),
        _ => String::new(),
    }
}

fn collect_text(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => push_collapsed(&contents.borrow(), out),
        NodeData::Element { name, .. } => {
            let tag: &str = &name.local;
            if HIDDEN.contains(&tag) {
                return;
            }
            if tag == "br" {
                out.push('\n');
                return;
            }
            let block = BLOCKS.contains(&tag);
            if block {
                break_line(out);
            }
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
            if block {
                break_line(out);
            }
        }
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        // Comments, doctypes and processing instructions carry no visible text.
        _ => {}
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn push_collapsed(text: &str, out: &mut String) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.is_empty() && !out.ends_with([' ', '\n']) {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/measure/markup.rs"]
mod tests;
