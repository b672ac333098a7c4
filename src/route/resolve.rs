//! Path normalization and route table construction.
//!
//! Module keys are normalized by stripping the `routes/` prefix (any
//! leading `./` or `../` runs are tolerated), stripping the module
//! extension, and (for page and handler keys) collapsing a trailing
//! `index` segment into the parent directory. Content keys keep their
//! full segment path.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::markdown::{parse_frontmatter, render_markdown};
use crate::route::types::{
    LayoutEntry, LayoutLoader, ManifestEntry, PageLoader, PageModule, PageRender, ResolvedRoute,
    RouteGlobs, RouteMeta, RouteTable,
};
use crate::view::el;

/// Extension for page, layout, and handler module keys.
pub const MODULE_EXT: &str = ".rs";
/// Extension for content file keys.
pub const CONTENT_EXT: &str = ".md";
/// Layout file name within a routes directory.
const LAYOUT_FILE: &str = "layout.rs";

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("duplicate route \"{path}\": {first} and {second}")]
    DuplicateRoute {
        path: String,
        first: String,
        second: String,
    },

    #[error("duplicate handler route \"{path}\": {first} and {second}")]
    DuplicateHandler {
        path: String,
        first: String,
        second: String,
    },
}

fn strip_routes_prefix(file: &str) -> &str {
    let mut rest = file;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else {
            break;
        }
    }
    rest.strip_prefix("routes/").unwrap_or(rest)
}

fn strip_ext<'a>(file: &'a str, ext: &str) -> &'a str {
    file.strip_suffix(ext).unwrap_or(file)
}

/// Collapse a trailing `index` segment into its parent directory.
fn collapse_index(path: &str) -> &str {
    if path == "index" {
        ""
    } else {
        path.strip_suffix("/index").unwrap_or(path)
    }
}

fn to_absolute(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{path}")
    }
}

/// Derive the route path for a page module key.
///
/// `routes/about/index.rs` maps to `/about`, `routes/about/career.rs`
/// maps to `/about/career`, and `routes/index.rs` maps to `/`.
pub fn page_file_to_path(file: &str) -> String {
    to_absolute(collapse_index(strip_ext(strip_routes_prefix(file), MODULE_EXT)))
}

/// Derive the mount path for a handler module key. Same rule as pages.
pub fn handler_file_to_path(file: &str) -> String {
    page_file_to_path(file)
}

/// Derive the route path for a content file key. No index collapsing:
/// `routes/index.md` maps to `/index`.
pub fn content_file_to_path(file: &str) -> String {
    to_absolute(strip_ext(strip_routes_prefix(file), CONTENT_EXT))
}

/// The companion markdown-export path for a route.
pub fn markdown_export_path(path: &str) -> String {
    if path == "/" {
        "/index.md".to_string()
    } else {
        format!("{path}.md")
    }
}

fn is_layout_file(file: &str) -> bool {
    file == LAYOUT_FILE || file.ends_with("/layout.rs")
}

/// Resolve the layout chain for a route path, outer-to-inner.
///
/// The chain covers the root and every ancestor directory of the path,
/// excluding the leaf's own segment; directories without a layout file
/// are simply omitted.
pub fn resolve_layout_chain(
    path: &str,
    layouts: &BTreeMap<String, LayoutLoader>,
) -> Vec<LayoutEntry> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut directories = vec![String::new()];
    for depth in 1..segments.len() {
        directories.push(segments[..depth].join("/"));
    }

    let mut chain = Vec::new();
    for directory in directories {
        let file = if directory.is_empty() {
            format!("routes/{LAYOUT_FILE}")
        } else {
            format!("routes/{directory}/{LAYOUT_FILE}")
        };
        if let Some(loader) = layouts.get(&file) {
            chain.push(LayoutEntry {
                file,
                loader: Arc::clone(loader),
            });
        }
    }
    chain
}

/// Build the route table and manifest from the input registrations.
///
/// Page modules are processed before content files, so a content file
/// whose path collides with a page route is skipped silently; two page
/// modules claiming the same path are a fatal error.
pub fn build_route_table(globs: &RouteGlobs) -> Result<RouteTable, ResolveError> {
    let mut routes: BTreeMap<String, ResolvedRoute> = BTreeMap::new();
    let mut manifest: Vec<ManifestEntry> = Vec::new();
    let mut seen: BTreeMap<String, String> = BTreeMap::new();

    for (file, loader) in &globs.pages {
        if is_layout_file(file) {
            continue;
        }

        let path = page_file_to_path(file);
        if let Some(first) = seen.get(&path) {
            return Err(ResolveError::DuplicateRoute {
                path,
                first: first.clone(),
                second: file.clone(),
            });
        }

        // The chain derives from the uncollapsed module path, so a
        // directory-index page picks up its own directory's layout.
        let uncollapsed = to_absolute(strip_ext(strip_routes_prefix(file), MODULE_EXT));

        seen.insert(path.clone(), file.clone());
        routes.insert(
            path.clone(),
            ResolvedRoute {
                page: Arc::clone(loader),
                layouts: resolve_layout_chain(&uncollapsed, &globs.layouts),
            },
        );
        manifest.push(ManifestEntry {
            title: path.clone(),
            path,
            description: None,
            date: None,
            has_markdown: false,
        });
    }

    for (file, raw) in &globs.contents {
        let path = content_file_to_path(file);
        if seen.contains_key(&path) {
            continue;
        }
        seen.insert(path.clone(), file.clone());

        // Frontmatter is parsed eagerly for the manifest; the loader
        // below captures only the raw text and re-parses per request.
        let frontmatter = parse_frontmatter(raw);
        let title = if frontmatter.title.is_empty() {
            path.clone()
        } else {
            frontmatter.title.clone()
        };

        routes.insert(
            path.clone(),
            ResolvedRoute {
                page: content_page_loader(path.clone(), raw.clone()),
                layouts: resolve_layout_chain(&path, &globs.layouts),
            },
        );
        manifest.push(ManifestEntry {
            path,
            title,
            description: frontmatter.description,
            date: frontmatter.date,
            has_markdown: true,
        });
    }

    Ok(RouteTable { routes, manifest })
}

/// Tags are a comma-separated frontmatter value.
fn parse_tags(raw: Option<&String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Synthesize a page loader for a raw content file.
fn content_page_loader(path: String, raw: String) -> PageLoader {
    let raw: Arc<str> = Arc::from(raw);
    Arc::new(move || {
        let raw = Arc::clone(&raw);
        let path = path.clone();
        Box::pin(async move {
            let frontmatter = parse_frontmatter(&raw);

            let render_raw = Arc::clone(&raw);
            let render: PageRender = Arc::new(move || {
                let raw = Arc::clone(&render_raw);
                Box::pin(async move {
                    let frontmatter = parse_frontmatter(&raw);
                    let body = render_markdown(&frontmatter.body);
                    Ok(el("article").child(body).into())
                })
            });

            let source_raw = Arc::clone(&raw);
            let meta = RouteMeta {
                title: if frontmatter.title.is_empty() {
                    path.clone()
                } else {
                    frontmatter.title
                },
                description: frontmatter.description,
                date: frontmatter.date,
                tags: parse_tags(frontmatter.extra.get("tags")),
                pathname: Some(path),
                markdown: Some(Arc::new(move || {
                    let raw = Arc::clone(&source_raw);
                    Box::pin(async move { Ok(raw.to_string()) })
                })),
                ..RouteMeta::default()
            };

            Ok(PageModule {
                render,
                meta: Some(meta),
            })
        })
    })
}
