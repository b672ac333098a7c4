//! Per-route page handlers: the dual-mode render pipeline and the
//! companion markdown-export endpoint.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures_util::future::try_join_all;
use futures_util::stream;

use crate::config::SiteConfig;
use crate::markdown::markdown_response;
use crate::route::{ResolvedRoute, RouteMeta};
use crate::server::document::{DocumentOptions, assemble_document};
use crate::server::negotiate::{RENDER_MODE_HEADER, RenderMode, render_mode};
use crate::view::stream::{decode, encode};
use crate::view::{HtmlChunks, Node};

const STREAM_CONTENT_TYPE: &str = "text/x-component; charset=utf-8";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const DOCTYPE: &str = "<!doctype html>";

/// Everything one route's handlers need, captured at router build time.
pub(crate) struct PageContext {
    pub route_path: String,
    pub route: ResolvedRoute,
    pub site: SiteConfig,
}

/// GET handler for a resolved route.
pub(crate) async fn serve_page(context: Arc<PageContext>, headers: HeaderMap) -> Response {
    let mode = render_mode(&headers);
    match render_page(&context, mode).await {
        Ok(response) => response,
        Err(error) => internal_error(&context.route_path, &error),
    }
}

/// GET handler for a route's `<path>.md` companion.
pub(crate) async fn serve_markdown_export(context: Arc<PageContext>) -> Response {
    match markdown_export(&context).await {
        Ok(response) => response,
        Err(error) => internal_error(&context.route_path, &error),
    }
}

fn internal_error(path: &str, error: &anyhow::Error) -> Response {
    tracing::error!(path, error = format!("{error:#}"), "page render failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

async fn render_page(context: &PageContext, mode: RenderMode) -> anyhow::Result<Response> {
    let module = (context.route.page)().await?;

    // Layouts load concurrently; composition below is strictly
    // leaf-to-root so the outermost layout wraps last.
    let layouts = try_join_all(context.route.layouts.iter().map(|entry| (entry.loader)())).await?;
    let mut body = (module.render)().await?;
    for layout in layouts.iter().rev() {
        body = (layout.wrap)(body);
    }

    // Both modes go through the stream encoding: document output is
    // assembled from a decoded stream, never from a second renderer.
    let frames = encode(&body)?;

    let mut response = match mode {
        RenderMode::Stream => stream_response(frames),
        RenderMode::Document => {
            let tree = decode(&frames)?;
            let meta = module.meta.as_ref();
            let document = assemble_document(
                &context.site,
                DocumentOptions {
                    title: page_title(meta, &context.route_path),
                    description: meta.and_then(|m| m.description.clone()),
                    pathname: meta
                        .and_then(|m| m.pathname.clone())
                        .unwrap_or_else(|| context.route_path.clone()),
                    tags: meta.map(|m| m.tags.clone()).unwrap_or_default(),
                    json_ld: meta.map(|m| m.json_ld.clone()).unwrap_or_default(),
                    og_image: meta.and_then(|m| m.og_image.clone()),
                    body: tree,
                },
            );
            document_response(document)
        }
    };

    // Intermediary caches must not conflate the two modes.
    response
        .headers_mut()
        .insert(header::VARY, HeaderValue::from_static(RENDER_MODE_HEADER));

    if let Some(cache_control) = module.meta.as_ref().and_then(|m| m.cache_control.as_deref()) {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_str(cache_control)?);
    }

    Ok(response)
}

fn page_title(meta: Option<&RouteMeta>, route_path: &str) -> String {
    match meta {
        Some(meta) if !meta.title.is_empty() => meta.title.clone(),
        _ => route_path.to_string(),
    }
}

fn stream_response(frames: Vec<Bytes>) -> Response {
    let body = Body::from_stream(stream::iter(frames.into_iter().map(Ok::<_, Infallible>)));
    (
        [(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)],
        body,
    )
        .into_response()
}

/// The document body streams chunk by chunk; a client disconnect drops
/// the stream and halts production.
fn document_response(document: Node) -> Response {
    let chunks = std::iter::once(Bytes::from_static(DOCTYPE.as_bytes()))
        .chain(HtmlChunks::new(document).map(Bytes::from));
    let body = Body::from_stream(stream::iter(chunks.map(Ok::<_, Infallible>)));
    ([(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], body).into_response()
}

async fn markdown_export(context: &PageContext) -> anyhow::Result<Response> {
    let module = (context.route.page)().await?;
    let Some(source) = module.meta.as_ref().and_then(|meta| meta.markdown.clone()) else {
        return Ok((StatusCode::NOT_FOUND, "Not Found").into_response());
    };
    let content = source().await?;
    Ok(markdown_response(content))
}
