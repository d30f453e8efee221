//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::Mailer;
use crate::shopify::AdminClient;

/// Error constructing application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("mailer setup failed: {0}")]
    Mailer(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; carries the configuration, the database
/// pool, the Admin API client, and the optional mailer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    shopify: AdminClient,
    mailer: Option<Mailer>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The mailer is only constructed when SMTP is configured; without it the
    /// draft order endpoint still works and reports `emailSent: false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured SMTP relay parameters are invalid.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, StateError> {
        let shopify = AdminClient::new(&config.shopify);
        let mailer = config.email.as_ref().map(Mailer::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                shopify,
                mailer,
            }),
        })
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Get the mailer, if SMTP is configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&Mailer> {
        self.inner.mailer.as_ref()
    }
}
