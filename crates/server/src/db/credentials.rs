//! Shop credential repository.
//!
//! Persists the offline Admin API access token obtained when a shop installs
//! the app. The draft order endpoint reads from here: directly after a
//! verified session token, or through the fallback path when a storefront
//! request arrives without one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use draft_order_core::ShopDomain;

use super::RepositoryError;

/// A persisted Admin API credential for one shop.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopCredential {
    /// Shop domain this token belongs to (unique).
    pub shop: String,
    /// Offline Admin API access token.
    pub access_token: String,
    /// Scopes granted at install time.
    pub scope: String,
    pub installed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Look up the stored credential for a shop.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_shop(
    pool: &PgPool,
    shop: &ShopDomain,
) -> Result<Option<ShopCredential>, RepositoryError> {
    let credential = sqlx::query_as::<_, ShopCredential>(
        r"
        SELECT shop, access_token, scope, installed_at, updated_at
        FROM shop_credentials
        WHERE shop = $1
        ",
    )
    .bind(shop.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(credential)
}

/// Store or refresh the credential for a shop.
///
/// Called by the install/auth callback collaborator; reinstalls overwrite the
/// previous token in place.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn upsert(
    pool: &PgPool,
    shop: &ShopDomain,
    access_token: &str,
    scope: &str,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO shop_credentials (shop, access_token, scope)
        VALUES ($1, $2, $3)
        ON CONFLICT (shop) DO UPDATE SET
            access_token = EXCLUDED.access_token,
            scope = EXCLUDED.scope,
            updated_at = NOW()
        ",
    )
    .bind(shop.as_str())
    .bind(access_token)
    .bind(scope)
    .execute(pool)
    .await?;

    Ok(())
}
