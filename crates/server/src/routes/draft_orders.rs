//! Draft order creation endpoint.
//!
//! The pipeline runs strictly forward: intake, identity resolution, order
//! construction, notification. Any failure before notification short-circuits
//! into the uniform error envelope; notification failures only flip
//! `emailSent` to `false`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;
use tracing::instrument;

use draft_order_core::{Email, ShopDomain};

use crate::auth;
use crate::db;
use crate::drafts::{self, DraftOrderRequest};
use crate::error::ApiError;
use crate::services::OrderSummary;
use crate::shopify::{DraftOrder, DraftOrderInput};
use crate::state::AppState;

/// Success envelope for the widget.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderResponse {
    pub success: bool,
    pub drafts: Vec<DraftOrder>,
    pub email_sent: bool,
}

/// `POST /api/draft-orders` - convert the posted cart into draft order(s).
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DraftOrderRequest>, JsonRejection>,
) -> Result<Json<DraftOrderResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|_| ApiError::Validation("Invalid JSON in request body".to_string()))?;

    if request.items().is_empty() {
        return Err(ApiError::Validation("Cart is empty".to_string()));
    }

    let identity = auth::resolve_identity(&state, &headers, request.shop.as_deref()).await?;
    let setting = db::settings::get_or_create(state.pool(), &identity.shop).await?;

    let line_items = drafts::line_items(request.items());
    let shipping = drafts::mailing_address(request.address.as_ref(), request.customer.as_ref());
    let billing = drafts::billing_address(&request, &shipping);
    let linkage = drafts::customer_linkage(request.customer.as_ref());

    let mut created = Vec::new();
    for tier in drafts::plan(&setting) {
        let input = DraftOrderInput::build(
            line_items.clone(),
            shipping.clone(),
            billing.clone(),
            linkage.clone(),
            tier.discount_input(),
            &tier.tag,
        );

        // Sequential on purpose: a failure must abort before the next
        // creation is attempted. An already-created first draft is not
        // rolled back.
        let draft = state
            .shopify()
            .create_draft_order(&identity.shop, &identity.access_token, &input)
            .await?;

        tracing::info!(shop = %identity.shop, draft = %draft.name, "Draft order created");
        created.push(draft);
    }

    let email_sent = send_confirmation(&state, &identity.shop, &request, &created).await;

    Ok(Json(DraftOrderResponse {
        success: true,
        drafts: created,
        email_sent,
    }))
}

/// `OPTIONS /api/draft-orders` - CORS preflight.
///
/// Always an empty 204 regardless of auth state; the CORS middleware supplies
/// the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Best-effort confirmation email from the first created draft.
///
/// Returns whether an email actually went out. Skipped silently when SMTP is
/// not configured or the customer gave no usable address.
async fn send_confirmation(
    state: &AppState,
    shop: &ShopDomain,
    request: &DraftOrderRequest,
    created: &[DraftOrder],
) -> bool {
    let Some(mailer) = state.mailer() else {
        tracing::debug!("SMTP not configured, skipping confirmation email");
        return false;
    };

    let Some(customer) = request.customer.as_ref() else {
        return false;
    };

    let Some(email) = customer
        .email
        .as_deref()
        .and_then(|raw| Email::parse(raw).ok())
    else {
        return false;
    };

    let Some(first) = created.first() else {
        return false;
    };

    let summary = OrderSummary::from_draft(shop, customer.first_name.as_deref(), first);

    match mailer.send_order_summary(&email, &summary).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(shop = %shop, error = %e, "Failed to send confirmation email");
            false
        }
    }
}
