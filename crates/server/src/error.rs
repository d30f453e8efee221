//! Unified error handling with Sentry integration.
//!
//! Every failure leaving the draft-order pipeline is mapped to the uniform
//! JSON envelope `{"success": false, "error": "..."}` the storefront widget
//! expects, with the HTTP status reflecting the failure class: 400 for
//! request validation, 401 for identity resolution, 500 for platform and
//! internal failures. Server-class errors are captured to Sentry before the
//! response is built.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::RepositoryError;
use crate::shopify::ShopifyError;

/// Application-level error type for the API surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body was malformed or incomplete.
    #[error("{0}")]
    Validation(String),

    /// No shop/credential could be resolved for the request.
    #[error(transparent)]
    Authentication(#[from] AuthError),

    /// Shopify rejected or failed a draft order operation.
    #[error("{0}")]
    Creation(#[from] ShopifyError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The failure envelope returned to the widget.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl ApiError {
    /// HTTP status for this failure class.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Creation(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Creation(_) | Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Creation errors carry the upstream detail so the merchant can see
        // what Shopify rejected; database/internal details stay server-side.
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (
            self.status(),
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
