//! Database operations for the app's `PostgreSQL` store.
//!
//! # Tables
//!
//! - `merchant_settings` - Per-shop discount/tag configuration, lazily
//!   created with defaults on first read
//! - `shop_credentials` - Admin API access tokens persisted at install time,
//!   read by the authentication fallback path
//!
//! Both tables are keyed by the shop domain; a shop never has more than one
//! row in either.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! binary via `sqlx::migrate!`; they run on startup.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod credentials;
pub mod settings;

pub use credentials::ShopCredential;
pub use settings::{MerchantSetting, SettingsUpdate};

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The underlying query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
