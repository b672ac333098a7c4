//! Route table types and the loader capability model.
//!
//! Loaders are opaque async capabilities: functions returning a boxed
//! future. Resolution never invokes them; they run fresh on every
//! request, so tests can swap in in-memory stand-ins.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use axum::Router;
use futures_util::future::BoxFuture;
use serde::Serialize;

use crate::view::Node;

/// Renders a page body into a component tree.
pub type PageRender = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<Node>> + Send + Sync>;

/// Loads a page module.
pub type PageLoader = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<PageModule>> + Send + Sync>;

/// Loads a layout module.
pub type LayoutLoader =
    Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<LayoutModule>> + Send + Sync>;

/// Yields the raw text behind a markdown-export endpoint.
pub type MarkdownSource =
    Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<String>> + Send + Sync>;

/// A loaded page: its render function and optional metadata.
#[derive(Clone)]
pub struct PageModule {
    pub render: PageRender,
    pub meta: Option<RouteMeta>,
}

/// A loaded layout: wraps child content in an outer element.
#[derive(Clone)]
pub struct LayoutModule {
    pub wrap: Arc<dyn Fn(Node) -> Node + Send + Sync>,
}

/// Page metadata used for document head assembly and headers.
#[derive(Clone, Default)]
pub struct RouteMeta {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    /// Canonical pathname; the route path when absent.
    pub pathname: Option<String>,
    /// Structured data blocks emitted as `application/ld+json`.
    pub json_ld: Vec<serde_json::Value>,
    pub og_image: Option<String>,
    /// Overrides the response `Cache-Control` header.
    pub cache_control: Option<String>,
    /// Raw-text accessor for the companion markdown-export endpoint.
    pub markdown: Option<MarkdownSource>,
}

/// A layout in a route's chain, ordered outer-to-inner.
#[derive(Clone)]
pub struct LayoutEntry {
    /// The layout glob key this entry came from.
    pub file: String,
    pub loader: LayoutLoader,
}

/// A resolved route: the page loader and its layout chain.
#[derive(Clone)]
pub struct ResolvedRoute {
    pub page: PageLoader,
    pub layouts: Vec<LayoutEntry>,
}

/// Request-independent route summary, built once at resolution time so
/// collaborators can enumerate routes without invoking loaders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub path: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub has_markdown: bool,
}

/// The four input registrations the framework consumes, keyed by
/// path-like module keys (`routes/about/index.rs`, `routes/post.md`).
#[derive(Default)]
pub struct RouteGlobs {
    pub pages: BTreeMap<String, PageLoader>,
    pub layouts: BTreeMap<String, LayoutLoader>,
    /// Raw content files, markdown with optional frontmatter.
    pub contents: BTreeMap<String, String>,
    /// Mountable sub-applications, consumed by the handler mount
    /// without resolution logic.
    pub handlers: BTreeMap<String, Router>,
}

/// The resolved route table. Built once before serving begins and
/// read-only afterwards.
pub struct RouteTable {
    pub routes: BTreeMap<String, ResolvedRoute>,
    pub manifest: Vec<ManifestEntry>,
}

/// Wrap an async closure as a [`PageLoader`].
pub fn page_loader<F, Fut>(f: F) -> PageLoader
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<PageModule>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

/// Wrap an async closure as a [`LayoutLoader`].
pub fn layout_loader<F, Fut>(f: F) -> LayoutLoader
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<LayoutModule>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

/// Wrap an async closure as a [`PageRender`].
pub fn page_render<F, Fut>(f: F) -> PageRender
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Node>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

/// Wrap an async closure as a [`MarkdownSource`].
pub fn markdown_source<F, Fut>(f: F) -> MarkdownSource
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}
