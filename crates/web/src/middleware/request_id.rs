//! Request ID middleware for request tracing and correlation.
//!
//! Generates a UUID v4 for each request unless an upstream proxy already set
//! `x-request-id`. The ID is recorded in the current tracing span, tagged on
//! the Sentry scope and echoed in the response headers.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upper bound on accepted upstream IDs; longer values are replaced.
const MAX_REQUEST_ID_LENGTH: usize = 128;

/// An upstream request ID worth keeping: present, printable and bounded.
fn upstream_request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LENGTH)
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_request_id(request.headers())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(id).unwrap());
        headers
    }

    #[test]
    fn test_upstream_id_is_kept() {
        let headers = headers_with("cf-1234");
        assert_eq!(upstream_request_id(&headers), Some("cf-1234"));
    }

    #[test]
    fn test_missing_blank_or_oversized_ids_are_replaced() {
        assert_eq!(upstream_request_id(&HeaderMap::new()), None);
        assert_eq!(upstream_request_id(&headers_with("   ")), None);

        let long = "a".repeat(MAX_REQUEST_ID_LENGTH + 1);
        assert_eq!(upstream_request_id(&headers_with(&long)), None);

        let exact = "a".repeat(MAX_REQUEST_ID_LENGTH);
        assert_eq!(upstream_request_id(&headers_with(&exact)), Some(exact.as_str()));
    }
}
