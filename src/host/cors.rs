//! Permissive CORS handling for routes registered with `Route::cors(true)`.
//!
//! Any origin is allowed. The origin of the request is echoed back so that
//! the response can be cached per origin.

use http::header::{self, HeaderMap, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use hyper::Body;

const ALLOW_METHODS: &str = "GET,POST,OPTIONS";
const DEFAULT_ALLOW_HEADERS: &str = "accept,content-type,authorization";
const MAX_AGE: &str = "86400";

/// Returns `true` if the request is a CORS preflight request.
pub(super) fn is_preflight<B>(request: &Request<B>) -> bool {
    request.method() == Method::OPTIONS
        && request.headers().contains_key(header::ORIGIN)
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Builds the response to a preflight request.
pub(super) fn preflight_response<B>(request: &Request<B>) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;

    {
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        let allow_headers = request
            .headers()
            .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOW_HEADERS));
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
    }

    apply_allow_origin(request.headers().get(header::ORIGIN), response.headers_mut());
    response
}

/// Appends the `Access-Control-Allow-Origin` header if the request carries an origin.
pub(super) fn apply_allow_origin(origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.append(header::VARY, HeaderValue::from_static("origin"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_preflight() {
        let request = Request::options("/graphql")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(())
            .unwrap();
        assert!(is_preflight(&request));

        let request = Request::options("/graphql")
            .header(header::ORIGIN, "http://example.com")
            .body(())
            .unwrap();
        assert!(!is_preflight(&request));
    }

    #[test]
    fn preflight_echoes_origin_and_headers() {
        let request = Request::options("/graphql")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-token")
            .body(())
            .unwrap();
        let response = preflight_response(&request);

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://example.com");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type,x-token");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
    }

    #[test]
    fn no_allow_origin_without_origin() {
        let mut headers = HeaderMap::new();
        apply_allow_origin(None, &mut headers);
        assert!(headers.is_empty());
    }
}
