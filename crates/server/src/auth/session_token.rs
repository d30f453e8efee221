//! Shopify session token verification.
//!
//! Embedded app surfaces send a short-lived JWT (the "session token") in the
//! `Authorization` header. The token is signed with the app's client secret
//! using HS256; verifying it proves the request originated from the shop in
//! the `dest` claim without any server-side session state.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;

use draft_order_core::ShopDomain;

type HmacSha256 = Hmac<Sha256>;

/// Errors produced by session token verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionTokenError {
    /// The token is not a structurally valid HS256 JWT.
    #[error("session token is not a valid JWT")]
    Malformed,
    /// The signature does not match the app secret.
    #[error("session token signature mismatch")]
    InvalidSignature,
    /// The token's `exp` claim is in the past.
    #[error("session token expired")]
    Expired,
    /// The token was minted for a different app.
    #[error("session token audience does not match this app")]
    WrongAudience,
    /// The `dest` claim does not name a usable shop domain.
    #[error("session token destination is not a shop domain")]
    InvalidDestination,
}

#[derive(Debug, Deserialize)]
struct Header {
    alg: String,
}

/// The claims this app cares about; Shopify sends more, which are ignored.
#[derive(Debug, Deserialize)]
struct Claims {
    /// Shop URL the token was issued for, e.g. `https://my-store.myshopify.com`.
    dest: String,
    /// App client id the token was minted for.
    aud: String,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// Verify a session token and return the shop it belongs to.
///
/// Checks, in order: JWT structure, HS256 algorithm, signature against the
/// app secret, expiry, audience (= app API key), and that `dest` carries a
/// parseable shop domain.
///
/// # Errors
///
/// Returns a [`SessionTokenError`] describing the first check that failed.
pub fn verify(
    token: &str,
    api_key: &str,
    api_secret: &SecretString,
) -> Result<ShopDomain, SessionTokenError> {
    let mut parts = token.split('.');
    let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(SessionTokenError::Malformed);
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| SessionTokenError::Malformed)?;
    let header: Header =
        serde_json::from_slice(&header_bytes).map_err(|_| SessionTokenError::Malformed)?;
    if header.alg != "HS256" {
        return Err(SessionTokenError::Malformed);
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| SessionTokenError::Malformed)?;

    // Signature covers the raw `header.claims` input, verified in constant
    // time by the Mac implementation.
    let mut mac = HmacSha256::new_from_slice(api_secret.expose_secret().as_bytes())
        .map_err(|_| SessionTokenError::InvalidSignature)?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(claims_b64.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| SessionTokenError::InvalidSignature)?;

    let claims_bytes = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| SessionTokenError::Malformed)?;
    let claims: Claims =
        serde_json::from_slice(&claims_bytes).map_err(|_| SessionTokenError::Malformed)?;

    if claims.exp <= chrono::Utc::now().timestamp() {
        return Err(SessionTokenError::Expired);
    }

    if claims.aud != api_key {
        return Err(SessionTokenError::WrongAudience);
    }

    shop_from_dest(&claims.dest).ok_or(SessionTokenError::InvalidDestination)
}

/// Extract the shop domain from a `dest` claim (`https://{shop}`).
fn shop_from_dest(dest: &str) -> Option<ShopDomain> {
    let host = dest
        .strip_prefix("https://")
        .unwrap_or(dest)
        .split('/')
        .next()?;

    ShopDomain::parse(host).ok()
}
