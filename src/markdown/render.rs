//! Markdown rendering into the component tree.
//!
//! The body is parsed with pulldown-cmark (GitHub-flavored tables and
//! strikethrough enabled) and each semantic tag receives a fixed
//! styling wrapper.

use pulldown_cmark::{BlockQuoteKind, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::view::{Element, Node, el};

const H1_CLASS: &str = "mb-6 font-bold text-4xl";
const H2_CLASS: &str = "mt-10 mb-4 border-b pb-2 font-semibold text-2xl";
const H3_CLASS: &str = "mt-8 mb-3 font-semibold text-xl";
const P_CLASS: &str = "mt-4 leading-7";
const A_CLASS: &str = "underline hover:no-underline";
const UL_CLASS: &str = "mt-4 list-disc space-y-1 pl-6";
const OL_CLASS: &str = "mt-4 list-decimal space-y-1 pl-6";
const LI_CLASS: &str = "leading-7";
const CODE_CLASS: &str = "rounded bg-gray-100 px-1.5 py-0.5 text-sm";
const PRE_CLASS: &str =
    "mt-4 overflow-x-auto rounded border bg-gray-50 p-4 [&>code]:bg-transparent [&>code]:p-0";
const BLOCKQUOTE_CLASS: &str = "mt-4 border-l-4 pl-4 text-gray-600 italic";
const HR_CLASS: &str = "my-8";

/// Sentinel tag for stack frames that unwrap into fragments.
const FRAGMENT_TAG: &str = "#fragment";

/// Render a markdown body into a component tree.
///
/// The underlying parser is infallible, so rendering is too; failures
/// around markdown-backed routes come from loaders, not from here.
pub fn render_markdown(body: &str) -> Node {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(body, options);

    let mut builder = TreeBuilder::default();
    for event in parser {
        builder.push_event(event);
    }
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    stack: Vec<Element>,
    in_table_head: bool,
}

impl TreeBuilder {
    fn push_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(end) => self.end(end),
            Event::Text(content) => self.append(Node::Text(content.to_string())),
            Event::Code(content) => {
                self.append(el("code").class(CODE_CLASS).child(content.to_string()).into());
            }
            Event::Html(markup) | Event::InlineHtml(markup) => {
                self.append(Node::raw(markup.to_string()));
            }
            Event::SoftBreak => self.append(Node::Text("\n".to_string())),
            Event::HardBreak => self.append(el("br").into()),
            Event::Rule => self.append(el("hr").class(HR_CLASS).into()),
            // Extensions that are not enabled here.
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.stack.push(el("p").class(P_CLASS)),
            Tag::Heading { level, .. } => self.stack.push(heading(level)),
            Tag::BlockQuote(kind) => {
                let mut element = el("blockquote").class(BLOCKQUOTE_CLASS);
                if let Some(kind) = kind {
                    element = element.attr("data-callout", callout_name(kind));
                }
                self.stack.push(element);
            }
            Tag::CodeBlock(kind) => {
                // A fenced block becomes pre > code, so two frames.
                self.stack.push(el("pre").class(PRE_CLASS));
                let code = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => el("code")
                        .class(format!("{CODE_CLASS} language-{lang}")),
                    _ => el("code").class(CODE_CLASS),
                };
                self.stack.push(code);
            }
            Tag::HtmlBlock => self.stack.push(el(FRAGMENT_TAG)),
            Tag::List(Some(start)) => {
                let mut element = el("ol").class(OL_CLASS);
                if start != 1 {
                    element = element.attr("start", start.to_string());
                }
                self.stack.push(element);
            }
            Tag::List(None) => self.stack.push(el("ul").class(UL_CLASS)),
            Tag::Item => self.stack.push(el("li").class(LI_CLASS)),
            Tag::Table(_) => self.stack.push(el("table")),
            Tag::TableHead => {
                self.in_table_head = true;
                self.stack.push(el("thead"));
                self.stack.push(el("tr"));
            }
            Tag::TableRow => self.stack.push(el("tr")),
            Tag::TableCell => {
                let tag = if self.in_table_head { "th" } else { "td" };
                self.stack.push(el(tag));
            }
            Tag::Emphasis => self.stack.push(el("em")),
            Tag::Strong => self.stack.push(el("strong")),
            Tag::Strikethrough => self.stack.push(el("del")),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut element = el("a").class(A_CLASS).attr("href", dest_url.to_string());
                if !title.is_empty() {
                    element = element.attr("title", title.to_string());
                }
                self.stack.push(element);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut element = el("img").attr("src", dest_url.to_string());
                if !title.is_empty() {
                    element = element.attr("title", title.to_string());
                }
                self.stack.push(element);
            }
            // Extensions that are not enabled here.
            _ => self.stack.push(el(FRAGMENT_TAG)),
        }
    }

    fn end(&mut self, end: TagEnd) {
        match end {
            TagEnd::CodeBlock => {
                // code into pre, then pre into its parent
                self.pop();
                self.pop();
            }
            TagEnd::TableHead => {
                self.pop();
                self.pop();
                self.in_table_head = false;
                self.stack.push(el("tbody"));
            }
            TagEnd::Table => {
                // tbody into table, then table into its parent
                self.pop();
                self.pop();
            }
            TagEnd::Image => self.pop_image(),
            _ => self.pop(),
        }
    }

    /// Close the top element and append it to its parent.
    fn pop(&mut self) {
        if let Some(element) = self.stack.pop() {
            let node = if element.tag == FRAGMENT_TAG {
                Node::Fragment(element.children)
            } else {
                Node::Element(element)
            };
            self.append(node);
        }
    }

    /// Images are void elements: the captured children collapse into
    /// the alt attribute.
    fn pop_image(&mut self) {
        if let Some(mut element) = self.stack.pop() {
            let mut alt = String::new();
            collect_text(&element.children, &mut alt);
            element.children.clear();
            element.attrs.push(("alt".to_string(), alt));
            self.append(Node::Element(element));
        }
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn finish(mut self) -> Node {
        // The parser always balances start and end events; draining
        // here keeps any leftover frame from being silently lost.
        while !self.stack.is_empty() {
            self.pop();
        }
        Node::Fragment(self.roots)
    }
}

fn heading(level: HeadingLevel) -> Element {
    match level {
        HeadingLevel::H1 => el("h1").class(H1_CLASS),
        HeadingLevel::H2 => el("h2").class(H2_CLASS),
        HeadingLevel::H3 => el("h3").class(H3_CLASS),
        HeadingLevel::H4 => el("h4"),
        HeadingLevel::H5 => el("h5"),
        HeadingLevel::H6 => el("h6"),
    }
}

fn callout_name(kind: BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "note",
        BlockQuoteKind::Tip => "tip",
        BlockQuoteKind::Important => "important",
        BlockQuoteKind::Warning => "warning",
        BlockQuoteKind::Caution => "caution",
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(content) => out.push_str(content),
            Node::Element(element) => collect_text(&element.children, out),
            Node::Fragment(children) => collect_text(children, out),
            Node::Raw(_) => {}
        }
    }
}
