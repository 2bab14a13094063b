//! Cross-origin headers for the browser-facing endpoints
//!
//! Provides the header set announced on every response plus the preflight
//! handler wired to `OPTIONS /mcp`.

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS, DELETE"),
    (
        "access-control-allow-headers",
        "Content-Type, Authorization, mcp-session-id, mcp-protocol-version",
    ),
];

pub async fn apply_cors_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }

    response
}

pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
