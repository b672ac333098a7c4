//! Response construction for markdown-export endpoints.

use axum::http::{HeaderName, header};
use axum::response::{IntoResponse, Response};

pub const MARKDOWN_CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate=86400";
const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Token-count estimate header, `ceil(len / 4)` with a floor of 1.
pub const X_MARKDOWN_TOKENS: HeaderName = HeaderName::from_static("x-markdown-tokens");

pub fn estimate_tokens(content: &str) -> String {
    content.len().div_ceil(4).max(1).to_string()
}

/// Build the markdown-export response: raw text with fixed caching
/// headers and the token estimate.
pub fn markdown_response(content: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE.to_string()),
            (header::CACHE_CONTROL, MARKDOWN_CACHE_CONTROL.to_string()),
            (X_MARKDOWN_TOKENS, estimate_tokens(&content)),
        ],
        content,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_has_floor_of_one() {
        assert_eq!(estimate_tokens(""), "1");
        assert_eq!(estimate_tokens("abc"), "1");
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(&"x".repeat(400)), "100");
        assert_eq!(estimate_tokens(&"x".repeat(401)), "101");
    }

    #[test]
    fn test_response_headers() {
        let response = markdown_response("# Hi".to_string());
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/markdown; charset=utf-8"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            MARKDOWN_CACHE_CONTROL
        );
        assert_eq!(response.headers().get(&X_MARKDOWN_TOKENS).unwrap(), "1");
    }
}
