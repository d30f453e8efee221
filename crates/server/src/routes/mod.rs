//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (verifies database)
//!
//! # Storefront widget (CORS-enabled, session token optional)
//! POST    /api/draft-orders - Convert the posted cart into draft order(s)
//! OPTIONS /api/draft-orders - CORS preflight (always 204)
//!
//! # Embedded admin (session token required)
//! GET  /app/settings        - Shop settings (created with defaults on first read)
//! PUT  /app/settings        - Replace shop settings
//! GET  /app/stats           - App-created draft order count
//! ```

pub mod dashboard;
pub mod draft_orders;
pub mod settings;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::middleware::widget_cors_middleware;
use crate::state::AppState;

/// Create the storefront widget routes router.
pub fn widget_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/draft-orders",
            post(draft_orders::create).options(draft_orders::preflight),
        )
        .layer(axum::middleware::from_fn(widget_cors_middleware))
}

/// Create the embedded admin routes router.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(settings::show).put(settings::update))
        .route("/stats", get(dashboard::stats))
}

/// Create all routes for the app.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", widget_routes())
        .nest("/app", app_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
