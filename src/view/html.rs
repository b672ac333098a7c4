//! HTML materialization of the component tree.

use super::node::{Element, Node};

/// Elements that never take children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Escape text content (`&`, `<`, `>`).
fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value (text escapes plus both quote styles).
fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn open_tag(element: &Element) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');
    out
}

enum Step {
    Node(Node),
    Close(String),
}

/// Owning iterator that walks a tree depth-first, yielding one markup
/// chunk per element boundary or text run. Dropping the iterator stops
/// production, which is how client disconnects cancel document output.
pub struct HtmlChunks {
    stack: Vec<Step>,
}

impl HtmlChunks {
    pub fn new(node: Node) -> Self {
        Self {
            stack: vec![Step::Node(node)],
        }
    }
}

impl Iterator for HtmlChunks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(step) = self.stack.pop() {
            match step {
                Step::Close(tag) => return Some(format!("</{tag}>")),
                Step::Node(Node::Text(content)) => return Some(escape_text(&content)),
                Step::Node(Node::Raw(markup)) => return Some(markup),
                Step::Node(Node::Fragment(children)) => {
                    for child in children.into_iter().rev() {
                        self.stack.push(Step::Node(child));
                    }
                }
                Step::Node(Node::Element(element)) => {
                    let open = open_tag(&element);
                    if !is_void(&element.tag) {
                        self.stack.push(Step::Close(element.tag));
                        for child in element.children.into_iter().rev() {
                            self.stack.push(Step::Node(child));
                        }
                    }
                    return Some(open);
                }
            }
        }
        None
    }
}

/// Materialize a tree into a single HTML string.
pub fn render_html(node: Node) -> String {
    HtmlChunks::new(node).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{el, text};

    #[test]
    fn test_render_nested_elements() {
        let node = el("div")
            .class("outer")
            .child(el("p").child(text("hello")))
            .into();
        assert_eq!(render_html(node), "<div class=\"outer\"><p>hello</p></div>");
    }

    #[test]
    fn test_text_is_escaped() {
        let node = el("p").child(text("a < b & c > d")).into();
        assert_eq!(render_html(node), "<p>a &lt; b &amp; c &gt; d</p>");
    }

    #[test]
    fn test_attr_quotes_are_escaped() {
        let node = el("a").attr("title", "say \"hi\"").into();
        assert_eq!(render_html(node), "<a title=\"say &quot;hi&quot;\"></a>");
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let node = el("div").child(el("hr").class("my-8")).into();
        assert_eq!(render_html(node), "<div><hr class=\"my-8\"></div>");
    }

    #[test]
    fn test_fragment_emits_no_wrapper() {
        let node = Node::Fragment(vec![el("p").child("a").into(), el("p").child("b").into()]);
        assert_eq!(render_html(node), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_raw_markup_is_verbatim() {
        let node = el("div").child(Node::raw("<b>bold</b>")).into();
        assert_eq!(render_html(node), "<div><b>bold</b></div>");
    }
}
