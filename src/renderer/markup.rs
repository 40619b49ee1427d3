//! Value substitution for HTML output
//!
//! Newlines become `<br/>` and footnote references such as `[2]` become
//! links to the matching footnote item. Titles, units and footnote text are
//! always escaped; data cells may carry their own inline markup.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::{HtmlElement, HtmlNode, parse_fragment};

// ============================================================================
// Static Patterns (compiled once at first use)
// ============================================================================

static FOOTNOTE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+)\]").expect("BUG: hardcoded footnote regex is statically valid")
});

/// How a value's own text is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Text is literal and escaped on output
    Escaped,
    /// Text may contain inline HTML
    Embedded,
}

/// Per-table inputs to substitution
#[derive(Debug, Clone, Copy)]
pub struct ValueContext<'a> {
    pub filename: &'a str,
    pub footnote_count: usize,
}

impl<'a> ValueContext<'a> {
    #[must_use]
    pub fn new(filename: &'a str, footnote_count: usize) -> Self {
        Self {
            filename,
            footnote_count,
        }
    }

    /// Footnote number referenced by a `[n]` match, if it exists
    fn footnote(&self, digits: &str) -> Option<usize> {
        digits
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=self.footnote_count).contains(n))
    }

    /// Element id of footnote `number`
    #[must_use]
    pub fn footnote_id(&self, number: usize) -> String {
        format!("table-{}-note-{}", self.filename, number)
    }

    /// `<a>` linking to footnote `number`
    #[must_use]
    pub fn footnote_link(&self, number: usize) -> HtmlElement {
        HtmlElement::new("a")
            .with_attribute("href", format!("#{}", self.footnote_id(number)))
            .with_class("footnote__link")
            .with_child(
                HtmlElement::new("span")
                    .with_class("visuallyhidden")
                    .with_text("Footnote "),
            )
            .with_text(number.to_string())
    }
}

/// Convert a value into nodes, applying newline and footnote substitution
#[must_use]
pub fn render_value(value: &str, context: &ValueContext<'_>, markup: Markup) -> Vec<HtmlNode> {
    match markup {
        Markup::Escaped => escaped_nodes(value, context),
        Markup::Embedded => embedded_nodes(value, context),
    }
}

fn escaped_nodes(value: &str, context: &ValueContext<'_>) -> Vec<HtmlNode> {
    let mut nodes = Vec::new();
    for (index, line) in value.split('\n').enumerate() {
        if index > 0 {
            nodes.push(HtmlElement::new("br").into());
        }
        nodes.extend(footnote_nodes(line, context));
    }
    nodes
}

/// Footnote references are linked after parsing, so they only ever match
/// text content and every link is built the same way.
fn embedded_nodes(value: &str, context: &ValueContext<'_>) -> Vec<HtmlNode> {
    let nodes = parse_fragment(&value.replace('\n', "<br/>"));
    link_footnotes(nodes, context)
}

fn link_footnotes(nodes: Vec<HtmlNode>, context: &ValueContext<'_>) -> Vec<HtmlNode> {
    nodes
        .into_iter()
        .flat_map(|node| match node {
            HtmlNode::Text(text) => footnote_nodes(&text, context),
            // no links inside links or scripts
            HtmlNode::Element(element) if element.name() == "a" || element.is_raw_text() => {
                vec![element.into()]
            }
            HtmlNode::Element(element) => vec![
                element
                    .map_children(|children| link_footnotes(children, context))
                    .into(),
            ],
            other => vec![other],
        })
        .collect()
}

/// Split text around `[n]` references to existing footnotes
fn footnote_nodes(text: &str, context: &ValueContext<'_>) -> Vec<HtmlNode> {
    let mut nodes = Vec::new();
    let mut last = 0;
    for captures in FOOTNOTE_REFERENCE.captures_iter(text) {
        let (Some(whole), Some(digits)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let Some(number) = context.footnote(digits.as_str()) else {
            continue;
        };
        if whole.start() > last {
            nodes.push(HtmlNode::Text(text[last..whole.start()].to_string()));
        }
        nodes.push(context.footnote_link(number).into());
        last = whole.end();
    }
    if last < text.len() {
        nodes.push(HtmlNode::Text(text[last..].to_string()));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::write_nodes;

    fn render(value: &str, footnotes: usize, markup: Markup) -> String {
        let context = ValueContext::new("f", footnotes);
        let mut out = String::new();
        write_nodes(&render_value(value, &context, markup), &mut out);
        out
    }

    #[test]
    fn test_newline_becomes_break() {
        assert_eq!(render("line1\nline2", 0, Markup::Escaped), "line1<br/>line2");
        assert_eq!(render("line1\nline2", 0, Markup::Embedded), "line1<br/>line2");
    }

    #[test]
    fn test_each_reference_is_linked() {
        let link = r##"<a href="#table-f-note-1" class="footnote__link"><span class="visuallyhidden">Footnote </span>1</a>"##;
        let html = render("Note[1] and again[1]", 1, Markup::Escaped);
        assert_eq!(html, format!("Note{link} and again{link}"));
        assert_eq!(render("Note[1] and again[1]", 1, Markup::Embedded), html);
    }

    #[test]
    fn test_unknown_reference_stays_literal() {
        assert_eq!(render("See [3]", 2, Markup::Escaped), "See [3]");
        assert_eq!(render("See [0]", 2, Markup::Embedded), "See [0]");
    }

    #[test]
    fn test_escaped_values_do_not_carry_markup() {
        assert_eq!(render("<b>x</b>", 0, Markup::Escaped), "&lt;b&gt;x&lt;/b&gt;");
        assert_eq!(render("<b>x</b>", 0, Markup::Embedded), "<b>x</b>");
    }

    #[test]
    fn test_reference_inside_embedded_tag() {
        let link = r##"<a href="#table-f-note-2" class="footnote__link"><span class="visuallyhidden">Footnote </span>2</a>"##;
        assert_eq!(
            render("<b>see[2]</b>", 2, Markup::Embedded),
            format!("<b>see{link}</b>")
        );
    }

    #[test]
    fn test_reference_in_attribute_is_untouched() {
        assert_eq!(
            render(r#"<span title="[1]">x</span>"#, 1, Markup::Embedded),
            r#"<span title="[1]">x</span>"#
        );
    }

    #[test]
    fn test_newline_inside_embedded_tag() {
        assert_eq!(render("<b>a\nb</b>", 0, Markup::Embedded), "<b>a<br/>b</b>");
    }
}
