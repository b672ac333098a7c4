//! Router construction: one GET route per resolved path, a companion
//! markdown-export route, and handler sub-application mounts.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderMap;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::route::{ResolveError, RouteTable, handler_file_to_path, markdown_export_path};
use crate::server::page::{PageContext, serve_markdown_export, serve_page};

/// Build the axum application for a resolved route table.
///
/// Handler sub-applications mount after page routes; two handlers
/// claiming the same mount path are a fatal error, mirroring the
/// duplicate-route rule for pages.
pub fn create_app(
    table: &RouteTable,
    handlers: BTreeMap<String, Router>,
    site: &SiteConfig,
) -> Result<Router, ResolveError> {
    let mut app = Router::new();
    let mut export_paths: BTreeSet<String> = BTreeSet::new();

    for (path, route) in &table.routes {
        let context = Arc::new(PageContext {
            route_path: path.clone(),
            route: route.clone(),
            site: site.clone(),
        });

        let page_context = Arc::clone(&context);
        app = app.route(
            path,
            get(move |headers: HeaderMap| {
                let context = Arc::clone(&page_context);
                async move { serve_page(context, headers).await }
            }),
        );

        // A page at `/` and a content route at `/index` both export to
        // `/index.md`; the first registration wins. A resolved route
        // claiming the export path outranks the export entirely.
        let export = markdown_export_path(path);
        if !table.routes.contains_key(&export) && export_paths.insert(export.clone()) {
            let export_context = Arc::clone(&context);
            app = app.route(
                &export,
                get(move || {
                    let context = Arc::clone(&export_context);
                    async move { serve_markdown_export(context).await }
                }),
            );
        }
    }

    let mut mounted: BTreeMap<String, String> = BTreeMap::new();
    for (file, handler) in handlers {
        let path = handler_file_to_path(&file);
        if let Some(first) = mounted.get(&path) {
            return Err(ResolveError::DuplicateHandler {
                path,
                first: first.clone(),
                second: file,
            });
        }
        mounted.insert(path.clone(), file);
        // Root-mounted handlers merge; nesting at `/` is not allowed.
        app = if path == "/" {
            app.merge(handler)
        } else {
            app.nest(&path, handler)
        };
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::route::{
        PageModule, RouteGlobs, RouteMeta, build_route_table, markdown_source, page_loader,
        page_render,
    };
    use crate::server::negotiate::NegotiateLayer;
    use crate::view::{el, text};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tower::{Layer, Service, ServiceExt};

    fn site() -> SiteConfig {
        SiteConfig {
            name: "Example".to_string(),
            base_url: "https://example.com".to_string(),
            lang: None,
        }
    }

    fn about_page() -> crate::route::PageLoader {
        page_loader(|| async {
            Ok(PageModule {
                render: page_render(|| async { Ok(el("h1").child(text("About")).into()) }),
                meta: Some(RouteMeta {
                    title: "About".to_string(),
                    markdown: Some(markdown_source(|| async { Ok("# About".to_string()) })),
                    ..RouteMeta::default()
                }),
            })
        })
    }

    fn test_app() -> Router {
        let mut globs = RouteGlobs::default();
        globs.pages.insert("routes/about.rs".to_string(), about_page());
        globs.pages.insert(
            "routes/plain.rs".to_string(),
            page_loader(|| async {
                Ok(PageModule {
                    render: page_render(|| async { Ok(text("plain")) }),
                    meta: None,
                })
            }),
        );
        let table = build_route_table(&globs).unwrap();
        create_app(&table, BTreeMap::new(), &site()).unwrap()
    }

    async fn fetch(uri: &str) -> axum::http::Response<Body> {
        let app = test_app();
        let mut service = NegotiateLayer.layer(app);
        // The negotiation service is generic over the body type, so the
        // readiness call names the request type explicitly.
        ServiceExt::<Request<Body>>::ready(&mut service)
            .await
            .unwrap()
            .call(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: axum::http::Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_document_mode_returns_full_html() {
        let response = fetch("/about").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(response.headers()[header::VARY], "x-pageloom-render");

        let html = body_string(response).await;
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>About</title>"));
        assert!(html.contains("<h1>About</h1>"));
    }

    #[tokio::test]
    async fn test_stream_mode_returns_component_frames() {
        let response = fetch("/__stream/about").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/x-component; charset=utf-8"
        );
        assert_eq!(response.headers()[header::VARY], "x-pageloom-render");

        let body = body_string(response).await;
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("{\"v\":1}"));
        assert!(lines.next().is_some());
    }

    #[tokio::test]
    async fn test_spoofed_header_still_gets_document() {
        let app = test_app();
        let mut service = NegotiateLayer.layer(app);
        let request = Request::builder()
            .uri("/about")
            .header("x-pageloom-render", "stream")
            .body(Body::empty())
            .unwrap();
        let response = ServiceExt::<Request<Body>>::ready(&mut service)
            .await
            .unwrap()
            .call(request)
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_title_falls_back_to_route_path() {
        let html = body_string(fetch("/plain").await).await;
        assert!(html.contains("<title>/plain</title>"));
    }

    #[tokio::test]
    async fn test_markdown_export_serves_raw_source() {
        let response = fetch("/about.md").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["x-markdown-tokens"],
            "2"
        );
        assert_eq!(body_string(response).await, "# About");
    }

    #[tokio::test]
    async fn test_markdown_export_without_source_is_404() {
        let response = fetch("/plain.md").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_route_claiming_an_export_path_shadows_the_export() {
        let mut globs = RouteGlobs::default();
        globs
            .contents
            .insert("routes/notes.md".to_string(), "# Notes".to_string());
        globs
            .contents
            .insert("routes/notes.md.md".to_string(), "# Raw notes".to_string());
        let table = build_route_table(&globs).unwrap();
        // Routes /notes and /notes.md; the latter claims the former's
        // export path.
        let app = create_app(&table, BTreeMap::new(), &site()).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notes.md")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let html = body_string(response).await;
        assert!(html.contains("Raw notes"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = fetch("/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handler_mounts_alongside_pages() {
        let mut globs = RouteGlobs::default();
        globs.pages.insert("routes/about.rs".to_string(), about_page());
        let table = build_route_table(&globs).unwrap();

        let mut handlers = BTreeMap::new();
        handlers.insert(
            "routes/api.rs".to_string(),
            Router::new().route("/status", get(|| async { "ok" })),
        );
        let app = create_app(&table, handlers, &site()).unwrap();

        let response = app
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn test_duplicate_handler_mounts_are_fatal() {
        let table = build_route_table(&RouteGlobs::default()).unwrap();

        let mut handlers = BTreeMap::new();
        handlers.insert("routes/api.rs".to_string(), Router::new());
        handlers.insert("routes/api/index.rs".to_string(), Router::new());

        let err = create_app(&table, handlers, &site()).unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateHandler { .. }));
    }

    #[tokio::test]
    async fn test_failing_loader_yields_500() {
        let mut globs = RouteGlobs::default();
        globs.pages.insert(
            "routes/broken.rs".to_string(),
            page_loader(|| async { anyhow::bail!("backing store offline") }),
        );
        let table = build_route_table(&globs).unwrap();
        let app = create_app(&table, BTreeMap::new(), &site()).unwrap();

        let response = app
            .oneshot(Request::builder().uri("/broken").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Internal Server Error");
    }
}
