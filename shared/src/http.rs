//! HTTP helpers for the heatmap Lambda.

use lambda_http::{Body, Response};

use crate::render::fallback_document;
use crate::Error;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Shared-cache lifetime for successful heatmaps.
pub const CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";

/// Create an SVG response. Only successful responses are cacheable.
pub fn svg_response(status: u16, document: String) -> Result<Response<Body>, lambda_http::Error> {
    let mut builder = Response::builder()
        .status(status)
        .header("content-type", SVG_CONTENT_TYPE);
    if status == 200 {
        builder = builder.header("cache-control", CACHE_CONTROL);
    }
    Ok(builder.body(Body::from(document))?)
}

/// Create the fallback image response for an error.
pub fn error_response(error: &Error) -> Result<Response<Body>, lambda_http::Error> {
    svg_response(error.status_code(), fallback_document(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_headers() {
        let response = svg_response(200, "<svg/>".to_string()).unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], SVG_CONTENT_TYPE);
        assert_eq!(response.headers()["cache-control"], CACHE_CONTROL);
    }

    #[test]
    fn test_error_response_is_uncached_svg() {
        let response = error_response(&Error::Source("boom".into())).unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(response.headers()["content-type"], SVG_CONTENT_TYPE);
        assert!(response.headers().get("cache-control").is_none());
        match response.body() {
            Body::Text(text) => assert!(text.contains("Heatmap Error")),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_status() {
        let response = error_response(&Error::Validation("year".into())).unwrap();
        assert_eq!(response.status(), 400);
    }
}
