// File: src/assets.rs
// Purpose: Embedded client runtime adapter, served with long-lived caching

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// The jQuery Validation adapter, embedded at compile time. Registers
/// the `regex` method (delimiter-wrapped literal, empty value passes)
/// and the POSTing remote method the endpoint expects.
pub const RUNTIME_JS: &str = include_str!("../public/formbridge.runtime.js");

/// Axum handler that serves the embedded runtime adapter.
pub async fn serve_runtime_js() -> Response {
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/javascript; charset=utf-8",
            ),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        RUNTIME_JS,
    )
        .into_response()
}

/// A raw `<script>` tag pointing at the runtime adapter under the
/// configured route prefix.
pub fn script_tag(route_prefix: &str) -> String {
    format!(
        "<script src=\"{}/runtime.js\" defer></script>",
        route_prefix.trim_end_matches('/')
    )
}
