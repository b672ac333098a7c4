//! Stream/document negotiation.
//!
//! A single reserved header is the canonical internal signal for the
//! response mode. It is server-set only: any externally supplied
//! instance is stripped before anything else runs, so spoofing it has
//! no effect. The only external way to request stream mode is the
//! `/__stream` path prefix, which this layer translates into the
//! header before routing, so the path marker has precedence by
//! construction. Without either, requests default to document mode.

use std::task::{Context, Poll};

use axum::http::uri::Uri;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use tower::{Layer, Service};

/// The reserved negotiation header. Responses that differ by mode name
/// it in `Vary`.
pub const RENDER_MODE_HEADER: &str = "x-pageloom-render";
const RENDER_MODE_NAME: HeaderName = HeaderName::from_static(RENDER_MODE_HEADER);
const STREAM_VALUE: HeaderValue = HeaderValue::from_static("stream");

/// Path prefix that requests the component-stream encoding.
pub const STREAM_PREFIX: &str = "/__stream";

/// The negotiated response mode for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Stream,
    Document,
}

/// Read the negotiated mode off a request's headers. Only the exact
/// internal header value selects stream mode.
pub fn render_mode(headers: &HeaderMap) -> RenderMode {
    if headers.get(&RENDER_MODE_NAME) == Some(&STREAM_VALUE) {
        RenderMode::Stream
    } else {
        RenderMode::Document
    }
}

/// Split the stream marker off a path, returning the remainder.
/// `/__stream/about` becomes `/about`; `/__stream` alone is the root.
/// A path that merely starts with the marker text (`/__streamer`) is
/// not a marker.
pub fn split_stream_prefix(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(STREAM_PREFIX)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Normalize one request: strip any inbound negotiation header, then
/// translate the path marker into the internal header.
pub fn negotiate<B>(mut request: Request<B>) -> Request<B> {
    while request.headers_mut().remove(&RENDER_MODE_NAME).is_some() {}

    if let Some(rest) = split_stream_prefix(request.uri().path()) {
        let path_and_query = match request.uri().query() {
            Some(query) => format!("{rest}?{query}"),
            None => rest.to_string(),
        };
        let mut parts = request.uri().clone().into_parts();
        parts.path_and_query = path_and_query.parse().ok();
        if let Ok(uri) = Uri::from_parts(parts) {
            *request.uri_mut() = uri;
            request.headers_mut().insert(RENDER_MODE_NAME, STREAM_VALUE);
        }
    }

    request
}

/// Tower layer applying [`negotiate`] to every request. It must wrap
/// the whole router (applied with `axum::ServiceExt`, not
/// `Router::layer`) so the rewritten URI is what gets routed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegotiateLayer;

impl<S> Layer<S> for NegotiateLayer {
    type Service = NegotiateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        NegotiateService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct NegotiateService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for NegotiateService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        self.inner.call(negotiate(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    #[test]
    fn test_split_stream_prefix() {
        assert_eq!(split_stream_prefix("/__stream/about"), Some("/about"));
        assert_eq!(split_stream_prefix("/__stream/"), Some("/"));
        assert_eq!(split_stream_prefix("/__stream"), Some("/"));
        assert_eq!(split_stream_prefix("/__streamer"), None);
        assert_eq!(split_stream_prefix("/about"), None);
    }

    #[test]
    fn test_spoofed_header_is_stripped() {
        let mut spoofed = request("/about");
        spoofed
            .headers_mut()
            .insert(RENDER_MODE_NAME, STREAM_VALUE);

        let normalized = negotiate(spoofed);
        assert_eq!(render_mode(normalized.headers()), RenderMode::Document);
        // Same outcome as the request with no header at all.
        let plain = negotiate(request("/about"));
        assert_eq!(
            render_mode(normalized.headers()),
            render_mode(plain.headers())
        );
    }

    #[test]
    fn test_path_marker_sets_header_and_rewrites_uri() {
        let normalized = negotiate(request("/__stream/about/career"));
        assert_eq!(normalized.uri().path(), "/about/career");
        assert_eq!(render_mode(normalized.headers()), RenderMode::Stream);
    }

    #[test]
    fn test_bare_marker_maps_to_root() {
        let normalized = negotiate(request("/__stream"));
        assert_eq!(normalized.uri().path(), "/");
        assert_eq!(render_mode(normalized.headers()), RenderMode::Stream);
    }

    #[test]
    fn test_query_survives_the_rewrite() {
        let normalized = negotiate(request("/__stream/search?q=rust"));
        assert_eq!(normalized.uri().path(), "/search");
        assert_eq!(normalized.uri().query(), Some("q=rust"));
    }

    #[test]
    fn test_spoofed_header_does_not_block_marker() {
        let mut spoofed = request("/__stream/about");
        spoofed
            .headers_mut()
            .insert(RENDER_MODE_NAME, HeaderValue::from_static("document"));

        let normalized = negotiate(spoofed);
        assert_eq!(render_mode(normalized.headers()), RenderMode::Stream);
    }

    #[test]
    fn test_plain_request_defaults_to_document() {
        let normalized = negotiate(request("/"));
        assert_eq!(render_mode(normalized.headers()), RenderMode::Document);
    }
}
