//! Shop domain type.
//!
//! The shop domain is the tenant key for the entire app: settings and
//! credentials are partitioned by it, and every Admin API call is addressed
//! to it. Parsing normalizes case so lookups never miss on a
//! `My-Store.myshopify.com` vs `my-store.myshopify.com` mismatch.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    /// The input string is empty.
    #[error("shop domain cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("shop domain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character not valid in a hostname.
    #[error("shop domain contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input has no dot, so it cannot be a store hostname.
    #[error("shop domain must be a hostname like my-store.myshopify.com")]
    NotAHostname,
}

/// A Shopify store domain (e.g., `my-store.myshopify.com`).
///
/// Accepts any hostname, not just `*.myshopify.com`, because stores can be
/// reached through custom domains. Rejects anything that is not a bare
/// hostname - in particular inputs carrying a scheme or path, which would
/// otherwise end up interpolated into Admin API URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Maximum length of a hostname (RFC 1035).
    pub const MAX_LENGTH: usize = 253;

    /// Parse a `ShopDomain` from a string.
    ///
    /// Leading/trailing whitespace is trimmed and the result is lowercased.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 253 characters,
    /// contains characters invalid in a hostname, or has no dot.
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ShopDomainError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(ShopDomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.')))
        {
            return Err(ShopDomainError::InvalidCharacter(c));
        }

        if !trimmed.contains('.') {
            return Err(ShopDomainError::NotAHostname);
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Returns the shop domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
