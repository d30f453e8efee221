//! Merchant settings endpoints for the embedded admin page.
//!
//! Session-token auth only; these endpoints change how money is discounted,
//! so the widget's body-`shop` fallback is not acceptable here.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::auth;
use crate::db::{self, MerchantSetting, SettingsUpdate};
use crate::error::ApiError;
use crate::state::AppState;

/// Settings form as submitted by the embedded admin page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsForm {
    pub enabled: bool,
    #[serde(default)]
    pub discount1: Decimal,
    #[serde(default)]
    pub discount2: Decimal,
    #[serde(default)]
    pub tag1: String,
    #[serde(default)]
    pub tag2: String,
    #[serde(default)]
    pub single_discount: Decimal,
    #[serde(default)]
    pub single_tag: String,
}

impl SettingsForm {
    /// Normalize into the stored field set.
    ///
    /// Only the active mode's fields are kept; the other mode's are zeroed so
    /// a later toggle never resurrects stale discounts.
    fn normalize(self) -> SettingsUpdate {
        if self.enabled {
            SettingsUpdate {
                double_draft_orders_enabled: true,
                discount1: self.discount1,
                discount2: self.discount2,
                tag1: self.tag1,
                tag2: self.tag2,
                single_discount: Decimal::ZERO,
                single_tag: String::new(),
            }
        } else {
            SettingsUpdate {
                double_draft_orders_enabled: false,
                discount1: Decimal::ZERO,
                discount2: Decimal::ZERO,
                tag1: String::new(),
                tag2: String::new(),
                single_discount: self.single_discount,
                single_tag: self.single_tag,
            }
        }
    }
}

/// `GET /app/settings` - the shop's settings, created with defaults on first
/// access.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MerchantSetting>, ApiError> {
    let shop = auth::require_session_shop(&state, &headers)?;
    let setting = db::settings::get_or_create(state.pool(), &shop).await?;
    Ok(Json(setting))
}

/// `PUT /app/settings` - replace the shop's settings.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SettingsForm>, JsonRejection>,
) -> Result<Json<MerchantSetting>, ApiError> {
    let shop = auth::require_session_shop(&state, &headers)?;
    let Json(form) = payload
        .map_err(|_| ApiError::Validation("Invalid JSON in request body".to_string()))?;

    let setting = db::settings::update(state.pool(), &shop, &form.normalize()).await?;

    tracing::info!(
        shop = %shop,
        double = setting.double_draft_orders_enabled,
        "Settings updated"
    );
    Ok(Json(setting))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_double_mode_zeroes_single_fields() {
        let form = SettingsForm {
            enabled: true,
            discount1: Decimal::new(10, 0),
            discount2: Decimal::new(15, 0),
            tag1: "first".to_string(),
            tag2: "second".to_string(),
            single_discount: Decimal::new(5, 0),
            single_tag: "solo".to_string(),
        };

        let update = form.normalize();
        assert!(update.double_draft_orders_enabled);
        assert_eq!(update.discount1, Decimal::new(10, 0));
        assert_eq!(update.single_discount, Decimal::ZERO);
        assert_eq!(update.single_tag, "");
    }

    #[test]
    fn test_normalize_single_mode_zeroes_double_fields() {
        let form = SettingsForm {
            enabled: false,
            discount1: Decimal::new(10, 0),
            discount2: Decimal::new(15, 0),
            tag1: "first".to_string(),
            tag2: "second".to_string(),
            single_discount: Decimal::new(5, 0),
            single_tag: "solo".to_string(),
        };

        let update = form.normalize();
        assert!(!update.double_draft_orders_enabled);
        assert_eq!(update.discount1, Decimal::ZERO);
        assert_eq!(update.tag1, "");
        assert_eq!(update.single_discount, Decimal::new(5, 0));
        assert_eq!(update.single_tag, "solo");
    }

    #[test]
    fn test_form_defaults_absent_fields() {
        let form: SettingsForm =
            serde_json::from_str(r#"{"enabled": false, "singleDiscount": 7}"#).expect("parses");
        assert_eq!(form.single_discount, Decimal::new(7, 0));
        assert_eq!(form.discount1, Decimal::ZERO);
        assert_eq!(form.single_tag, "");
    }
}
