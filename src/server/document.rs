//! Document assembly: wraps a page's composed tree in a full HTML
//! document with head metadata, canonical link, Open Graph tags, and
//! structured data.

use crate::config::SiteConfig;
use crate::view::{Node, el, text};

/// Language tag applied when the site config leaves it unspecified.
pub const DEFAULT_LANG: &str = "en";

pub struct DocumentOptions {
    pub title: String,
    pub description: Option<String>,
    /// Canonical pathname, joined onto the site base URL.
    pub pathname: String,
    /// Emitted as a `keywords` meta when non-empty.
    pub tags: Vec<String>,
    pub json_ld: Vec<serde_json::Value>,
    pub og_image: Option<String>,
    pub body: Node,
}

/// Assemble the full document tree around a rendered body.
pub fn assemble_document(site: &SiteConfig, options: DocumentOptions) -> Node {
    let lang = site.lang.as_deref().unwrap_or(DEFAULT_LANG);
    let canonical = format!("{}{}", site.base_url, options.pathname);

    let mut head = el("head")
        .child(el("meta").attr("charset", "utf-8"))
        .child(
            el("meta")
                .attr("content", "width=device-width, initial-scale=1")
                .attr("name", "viewport"),
        )
        .child(el("title").child(text(&options.title)));

    if let Some(description) = &options.description {
        head = head.child(el("meta").attr("content", description).attr("name", "description"));
    }
    if !options.tags.is_empty() {
        head = head.child(
            el("meta")
                .attr("content", options.tags.join(", "))
                .attr("name", "keywords"),
        );
    }
    head = head.child(el("link").attr("href", &canonical).attr("rel", "canonical"));

    // Open Graph
    head = head.child(og_meta("og:title", &options.title));
    if let Some(description) = &options.description {
        head = head.child(og_meta("og:description", description));
    }
    head = head
        .child(og_meta("og:url", &canonical))
        .child(og_meta("og:type", "website"))
        .child(og_meta("og:site_name", &site.name));
    if let Some(image) = &options.og_image {
        head = head.child(og_meta("og:image", image));
    }

    for item in &options.json_ld {
        head = head.child(
            el("script")
                .attr("type", "application/ld+json")
                .child(Node::raw(item.to_string())),
        );
    }

    el("html")
        .attr("lang", lang)
        .child(head)
        .child(el("body").class("min-h-screen antialiased").child(options.body))
        .into()
}

fn og_meta(property: &str, content: &str) -> crate::view::Element {
    el("meta").attr("content", content).attr("property", property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::render_html;

    fn site() -> SiteConfig {
        SiteConfig {
            name: "Example".to_string(),
            base_url: "https://example.com".to_string(),
            lang: None,
        }
    }

    fn options(body: Node) -> DocumentOptions {
        DocumentOptions {
            title: "About".to_string(),
            description: Some("About the site".to_string()),
            pathname: "/about".to_string(),
            tags: Vec::new(),
            json_ld: Vec::new(),
            og_image: None,
            body,
        }
    }

    #[test]
    fn test_document_head_carries_title_and_canonical() {
        let html = render_html(assemble_document(&site(), options(text("hi"))));
        assert!(html.starts_with("<html lang=\"en\">"));
        assert!(html.contains("<title>About</title>"));
        assert!(html.contains("<link href=\"https://example.com/about\" rel=\"canonical\">"));
        assert!(html.contains("<meta content=\"About the site\" name=\"description\">"));
    }

    #[test]
    fn test_open_graph_tags() {
        let html = render_html(assemble_document(&site(), options(text("hi"))));
        assert!(html.contains("<meta content=\"About\" property=\"og:title\">"));
        assert!(html.contains("<meta content=\"https://example.com/about\" property=\"og:url\">"));
        assert!(html.contains("<meta content=\"Example\" property=\"og:site_name\">"));
    }

    #[test]
    fn test_configured_lang_overrides_default() {
        let mut site = site();
        site.lang = Some("de".to_string());
        let html = render_html(assemble_document(&site, options(text("hi"))));
        assert!(html.starts_with("<html lang=\"de\">"));
    }

    #[test]
    fn test_tags_become_keywords_meta() {
        let mut options = options(text("hi"));
        options.tags = vec!["rust".to_string(), "web".to_string()];
        let html = render_html(assemble_document(&site(), options));
        assert!(html.contains("<meta content=\"rust, web\" name=\"keywords\">"));

        let without = render_html(assemble_document(&site(), self::options(text("hi"))));
        assert!(!without.contains("name=\"keywords\""));
    }

    #[test]
    fn test_json_ld_blocks_are_inlined() {
        let mut options = options(text("hi"));
        options.json_ld = vec![serde_json::json!({"@type": "WebSite"})];
        let html = render_html(assemble_document(&site(), options));
        assert!(html.contains("<script type=\"application/ld+json\">{\"@type\":\"WebSite\"}</script>"));
    }

    #[test]
    fn test_body_wraps_page_content() {
        let html = render_html(assemble_document(&site(), options(text("page body"))));
        assert!(html.contains("<body class=\"min-h-screen antialiased\">page body</body>"));
    }
}
