//! Merchant settings repository.
//!
//! One row per shop. Rows come into existence on first read with all
//! discounts at zero and double mode off; the only mutation path is the
//! explicit settings update from the embedded admin page.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use draft_order_core::ShopDomain;

use super::RepositoryError;

/// Per-shop draft order configuration.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSetting {
    /// Shop domain this record belongs to (unique).
    pub shop: String,
    /// When true and both discounts are configured, each cart produces two
    /// draft orders with independent discounts/tags.
    pub double_draft_orders_enabled: bool,
    /// Percentage discount for the first draft in double mode.
    pub discount1: Decimal,
    /// Percentage discount for the second draft in double mode.
    pub discount2: Decimal,
    /// Tag for the first draft in double mode.
    pub tag1: String,
    /// Tag for the second draft in double mode.
    pub tag2: String,
    /// Percentage discount in single mode.
    pub single_discount: Decimal,
    /// Tag in single mode.
    pub single_tag: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized field set for a settings update.
///
/// Built by the settings route, which zeroes whichever mode's fields are
/// inactive so a record never carries stale values from the other mode.
#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    pub double_draft_orders_enabled: bool,
    pub discount1: Decimal,
    pub discount2: Decimal,
    pub tag1: String,
    pub tag2: String,
    pub single_discount: Decimal,
    pub single_tag: String,
}

const SETTING_COLUMNS: &str = r"
    shop,
    double_draft_orders_enabled,
    discount1,
    discount2,
    tag1,
    tag2,
    single_discount,
    single_tag,
    created_at,
    updated_at
";

/// Get the settings for a shop, creating the default record if none exists.
///
/// The insert-or-touch upsert makes concurrent first reads for a never-seen
/// shop converge on one row instead of surfacing a duplicate-key error to
/// the loser.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_or_create(
    pool: &PgPool,
    shop: &ShopDomain,
) -> Result<MerchantSetting, RepositoryError> {
    let setting = sqlx::query_as::<_, MerchantSetting>(&format!(
        r"
        INSERT INTO merchant_settings (shop)
        VALUES ($1)
        ON CONFLICT (shop) DO UPDATE SET shop = EXCLUDED.shop
        RETURNING {SETTING_COLUMNS}
        "
    ))
    .bind(shop.as_str())
    .fetch_one(pool)
    .await?;

    Ok(setting)
}

/// Replace a shop's settings, creating the record if it does not exist yet.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn update(
    pool: &PgPool,
    shop: &ShopDomain,
    update: &SettingsUpdate,
) -> Result<MerchantSetting, RepositoryError> {
    let setting = sqlx::query_as::<_, MerchantSetting>(&format!(
        r"
        INSERT INTO merchant_settings (
            shop,
            double_draft_orders_enabled,
            discount1,
            discount2,
            tag1,
            tag2,
            single_discount,
            single_tag
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (shop) DO UPDATE SET
            double_draft_orders_enabled = EXCLUDED.double_draft_orders_enabled,
            discount1 = EXCLUDED.discount1,
            discount2 = EXCLUDED.discount2,
            tag1 = EXCLUDED.tag1,
            tag2 = EXCLUDED.tag2,
            single_discount = EXCLUDED.single_discount,
            single_tag = EXCLUDED.single_tag,
            updated_at = NOW()
        RETURNING {SETTING_COLUMNS}
        "
    ))
    .bind(shop.as_str())
    .bind(update.double_draft_orders_enabled)
    .bind(update.discount1)
    .bind(update.discount2)
    .bind(&update.tag1)
    .bind(&update.tag2)
    .bind(update.single_discount)
    .bind(&update.single_tag)
    .fetch_one(pool)
    .await?;

    Ok(setting)
}
