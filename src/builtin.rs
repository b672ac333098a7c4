//! Built-in registrations for the bundled binary: a site shell layout,
//! an index page listing the discovered content, and a health check
//! handler. Content directories get a browsable site with no page
//! modules of their own.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::SiteConfig;
use crate::markdown::parse_frontmatter;
use crate::route::{
    LayoutModule, PageModule, RouteGlobs, RouteMeta, content_file_to_path, layout_loader,
    page_loader, page_render,
};
use crate::view::{Node, el, text};

/// One entry in the site navigation, derived from a content file.
#[derive(Debug, Clone, PartialEq)]
struct NavEntry {
    path: String,
    title: String,
}

/// Build the built-in registrations for a content directory.
pub fn globs(site: &SiteConfig, contents: &BTreeMap<String, String>) -> RouteGlobs {
    let nav = Arc::new(nav_entries(contents));
    let site_name = site.name.clone();

    let mut globs = RouteGlobs::default();

    let layout_name = site_name.clone();
    let layout_nav = Arc::clone(&nav);
    globs.layouts.insert(
        "routes/layout.rs".to_string(),
        layout_loader(move || {
            let name = layout_name.clone();
            let nav = Arc::clone(&layout_nav);
            async move {
                Ok(LayoutModule {
                    wrap: Arc::new(move |child| shell(&name, &nav, child)),
                })
            }
        }),
    );

    let index_name = site_name.clone();
    let index_nav = Arc::clone(&nav);
    globs.pages.insert(
        "routes/index.rs".to_string(),
        page_loader(move || {
            let name = index_name.clone();
            let nav = Arc::clone(&index_nav);
            async move {
                Ok(PageModule {
                    render: {
                        let nav = Arc::clone(&nav);
                        page_render(move || {
                            let nav = Arc::clone(&nav);
                            async move { Ok(index_body(&nav)) }
                        })
                    },
                    meta: Some(RouteMeta {
                        title: name,
                        pathname: Some("/".to_string()),
                        ..RouteMeta::default()
                    }),
                })
            }
        }),
    );

    globs.handlers.insert(
        "routes/healthz.rs".to_string(),
        Router::new().route("/", get(|| async { "ok" })),
    );

    globs
}

fn nav_entries(contents: &BTreeMap<String, String>) -> Vec<NavEntry> {
    contents
        .iter()
        .map(|(file, raw)| {
            let path = content_file_to_path(file);
            let frontmatter = parse_frontmatter(raw);
            let title = if frontmatter.title.is_empty() {
                title_case(last_segment(&path))
            } else {
                frontmatter.title
            };
            NavEntry { path, title }
        })
        .collect()
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(path)
}

fn title_case(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell(site_name: &str, nav: &[NavEntry], child: Node) -> Node {
    let mut nav_el = el("nav").class("flex gap-4 text-sm");
    for entry in nav {
        nav_el = nav_el.child(
            el("a")
                .attr("href", &entry.path)
                .class("hover:underline")
                .child(text(&entry.title)),
        );
    }

    el("div")
        .class("mx-auto max-w-3xl px-4")
        .child(
            el("header")
                .class("flex items-center justify-between py-6")
                .child(
                    el("a")
                        .attr("href", "/")
                        .class("font-bold")
                        .child(text(site_name)),
                )
                .child(nav_el),
        )
        .child(el("main").class("pb-16").child(child))
        .into()
}

fn index_body(nav: &[NavEntry]) -> Node {
    let mut list = el("ul").class("space-y-2");
    for entry in nav {
        list = list.child(
            el("li").child(
                el("a")
                    .attr("href", &entry.path)
                    .class("hover:underline")
                    .child(text(&entry.title)),
            ),
        );
    }
    el("section").child(list).into()
}
