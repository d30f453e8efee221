//! CORS middleware for the storefront widget endpoint.
//!
//! The widget posts from arbitrary storefront origins (the shop's own domain
//! or `*.myshopify.com`), so the allowed origin reflects the request's
//! `Origin` header rather than naming a fixed list. `Vary: Origin` keeps
//! shared caches from replaying one shop's preflight response to another.

use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
    },
    middleware::Next,
    response::Response,
};

/// Add widget CORS headers to every response, including errors and the
/// preflight 204.
pub async fn widget_cors_middleware(request: Request, next: Next) -> Response {
    let origin = request.headers().get(ORIGIN).cloned();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        origin.unwrap_or_else(|| HeaderValue::from_static("*")),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    headers.insert(VARY, HeaderValue::from_static("Origin"));

    response
}
