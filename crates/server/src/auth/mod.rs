//! Identity resolution for inbound requests.
//!
//! Two paths produce the `(shop, access token)` pair every Admin API call
//! needs:
//!
//! 1. **Session path** - a verified session token in the `Authorization`
//!    header names the shop; its stored credential is used as-is.
//! 2. **Fallback path** - storefront widget requests arrive without a session
//!    token, so the shop must be named in the request body; the stored
//!    credential is then probed against a read-only Admin API query before
//!    use, because nothing else vouches for the request.
//!
//! The fallback trades one extra round trip for certainty that a revoked
//! token is reported as "reinstall required" instead of failing mid-creation.
//! Each terminal failure carries a distinct message so the widget can tell a
//! missing `shop` parameter from a shop that needs to reinstall the app.

use axum::http::HeaderMap;
use tracing::instrument;

use draft_order_core::ShopDomain;

use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

pub mod session_token;

pub use session_token::SessionTokenError;

/// Errors produced by identity resolution.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// Neither the session token nor the request body named a shop.
    #[error("No shop provided in session or request body")]
    MissingShop,

    /// The shop has no persisted credential.
    #[error("No credential found for shop - reinstall required")]
    CredentialNotFound,

    /// The persisted credential was rejected by Shopify.
    #[error("Stored credential rejected by Shopify - reinstall required")]
    CredentialRevoked,

    /// An endpoint that only accepts the session path got no valid token.
    #[error("Missing or invalid session token")]
    SessionRequired,
}

/// A resolved request identity.
#[derive(Debug, Clone)]
pub struct ResolvedIdentity {
    /// The shop all downstream calls are addressed to.
    pub shop: ShopDomain,
    /// Admin API access token for that shop.
    pub access_token: String,
}

/// Pull the bearer token out of the `Authorization` header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the shop named by a valid session token on this request, if any.
fn session_shop(state: &AppState, headers: &HeaderMap) -> Option<ShopDomain> {
    let token = bearer_token(headers)?;

    match session_token::verify(
        token,
        &state.config().shopify.api_key,
        &state.config().shopify.api_secret,
    ) {
        Ok(shop) => Some(shop),
        Err(e) => {
            tracing::warn!(error = %e, "Session token verification failed");
            None
        }
    }
}

/// Resolve `(shop, access token)` for a draft order request.
///
/// Tries the session path first and falls back to the body-`shop` path; see
/// the module docs for the trust model of each.
///
/// # Errors
///
/// Returns `ApiError::Authentication` when no identity is resolvable, and
/// `ApiError::Database` if the credential lookup itself fails.
#[instrument(skip_all)]
pub async fn resolve_identity(
    state: &AppState,
    headers: &HeaderMap,
    shop_from_body: Option<&str>,
) -> Result<ResolvedIdentity, ApiError> {
    if let Some(shop) = session_shop(state, headers) {
        tracing::info!(shop = %shop, "Authenticated via session token");

        let credential = db::credentials::get_by_shop(state.pool(), &shop)
            .await?
            .ok_or(AuthError::CredentialNotFound)?;

        return Ok(ResolvedIdentity {
            shop,
            access_token: credential.access_token,
        });
    }

    // Fallback: the widget posts from the storefront with no session token.
    tracing::info!("No usable session token, trying stored-credential fallback");

    let shop = shop_from_body
        .and_then(|s| ShopDomain::parse(s).ok())
        .ok_or(AuthError::MissingShop)?;

    let credential = db::credentials::get_by_shop(state.pool(), &shop)
        .await?
        .ok_or(AuthError::CredentialNotFound)?;

    if let Err(e) = state
        .shopify()
        .verify_access_token(&shop, &credential.access_token)
        .await
    {
        tracing::warn!(shop = %shop, error = %e, "Stored credential failed probe");
        return Err(AuthError::CredentialRevoked.into());
    }

    Ok(ResolvedIdentity {
        shop,
        access_token: credential.access_token,
    })
}

/// Resolve the shop for an embedded-admin request, session path only.
///
/// The settings and dashboard endpoints change or expose merchant
/// configuration, so the body-`shop` fallback is not acceptable there.
///
/// # Errors
///
/// Returns `ApiError::Authentication` when the session token is missing or
/// invalid.
pub fn require_session_shop(state: &AppState, headers: &HeaderMap) -> Result<ShopDomain, ApiError> {
    session_shop(state, headers).ok_or_else(|| AuthError::SessionRequired.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer abc.def.ghi".parse().expect("valid header"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Basic dXNlcg==".parse().expect("valid header"),
        );
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_auth_error_messages_are_distinct() {
        let messages = [
            AuthError::MissingShop.to_string(),
            AuthError::CredentialNotFound.to_string(),
            AuthError::CredentialRevoked.to_string(),
            AuthError::SessionRequired.to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
