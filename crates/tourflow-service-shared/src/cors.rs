//! Permissive CORS for the public website.
//!
//! Every response carries `Access-Control-Allow-Origin: *`; OPTIONS
//! requests get a 200 with an empty body and the allowed methods echoed
//! back, cached by browsers for a day.

use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tower_http::cors::{Any, CorsLayer};

/// Preflight cache lifetime in seconds.
pub const MAX_AGE_SECS: u64 = 86_400;

/// CORS layer applied to every service router.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(MAX_AGE_SECS))
}

/// Explicit OPTIONS reply for non-preflight OPTIONS requests.
///
/// `allow_methods` names the methods the endpoint supports, e.g.
/// `"GET, OPTIONS"`. The body is always empty.
pub fn preflight(allow_methods: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(allow_methods),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type, X-User-Id"),
            ),
            (
                header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static("86400"),
            ),
        ],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_is_an_empty_200_with_cors_headers() {
        let response = preflight("GET, OPTIONS");
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    }
}
