//! Dashboard stats endpoint for the embedded admin page.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;
use tracing::instrument;

use crate::auth::{self, AuthError};
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

/// Dashboard figures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Draft orders this app has created on the shop, matched on the fixed
    /// creation note.
    pub draft_order_count: usize,
}

/// `GET /app/stats` - count the app-created draft orders.
#[instrument(skip_all)]
pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, ApiError> {
    let shop = auth::require_session_shop(&state, &headers)?;

    let credential = db::credentials::get_by_shop(state.pool(), &shop)
        .await?
        .ok_or(AuthError::CredentialNotFound)?;

    let draft_order_count = state
        .shopify()
        .count_app_draft_orders(&shop, &credential.access_token)
        .await?;

    Ok(Json(StatsResponse { draft_order_count }))
}
