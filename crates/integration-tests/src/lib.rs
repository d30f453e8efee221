//! Integration tests for the Draft Order App.
//!
//! The tests in `tests/` drive the real router end to end with
//! `tower::ServiceExt::oneshot`. Everything they exercise - request framing,
//! CORS, identity resolution failures - resolves before any outbound call,
//! so no live database or Shopify store is required; the database pool is
//! created lazily and never successfully connects.
//!
//! # Test Categories
//!
//! - `draft_order_api` - The widget endpoint: validation, preflight, CORS,
//!   and authentication failure framing
//! - `app_api` - The embedded admin endpoints: session token gating

use std::time::Duration;

use axum::Router;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;

use draft_order_server::config::{AppConfig, DEFAULT_API_VERSION, ShopifyAppConfig};
use draft_order_server::routes;
use draft_order_server::state::AppState;

/// App API key used to mint session tokens in tests.
pub const TEST_API_KEY: &str = "test-api-key";

/// App API secret used to sign session tokens in tests.
pub const TEST_API_SECRET: &str = "test-api-secret";

/// Connection string pointing at a port nothing listens on; the pool is
/// lazy, so tests only see it fail if they actually reach the database.
const UNREACHABLE_DATABASE_URL: &str = "postgres://postgres@127.0.0.1:1/draft_app_test";

/// Build an application state with no SMTP and an unreachable, lazily
/// connected database.
///
/// # Panics
///
/// Panics if the pool options or state are invalid, which would be a bug in
/// the test setup itself.
#[must_use]
pub fn test_state() -> AppState {
    let config = AppConfig {
        database_url: SecretString::from(UNREACHABLE_DATABASE_URL),
        host: "127.0.0.1".parse().expect("valid address"),
        port: 0,
        shopify: ShopifyAppConfig {
            api_key: TEST_API_KEY.to_string(),
            api_secret: SecretString::from(TEST_API_SECRET),
            api_version: DEFAULT_API_VERSION.to_string(),
        },
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };

    // Short acquire timeout: the tests that do reach the pool expect a fast
    // connection failure, not the default 30s retry window.
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(UNREACHABLE_DATABASE_URL)
        .expect("valid connection string");

    AppState::new(config, pool).expect("state builds without SMTP")
}

/// Build the full router over a fresh test state.
#[must_use]
pub fn app() -> Router {
    routes::routes().with_state(test_state())
}
