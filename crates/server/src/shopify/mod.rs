//! Shopify Admin API GraphQL client.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents executed over `reqwest`; responses are
//!   deserialized into serde types and flattened for the rest of the app
//! - Multi-tenant: every call is addressed to a `(shop, access token)` pair
//!   resolved per request, there is no per-store client instance
//! - A response is only treated as success when the HTTP status, the
//!   top-level `errors` list, and the mutation's `userErrors` list all agree

use thiserror::Error;

mod client;
pub mod types;

pub use client::AdminClient;
pub use types::{
    AppliedDiscountInput, CustomerLinkage, DraftOrder, DraftOrderInput, DraftOrderLineItem,
    DraftOrderLineItemInput, MailingAddressInput, Money,
};

/// Note attached to every draft order this app creates.
///
/// The dashboard counts app-created drafts by searching on this exact string,
/// so it is part of the wire contract, not presentation.
pub const APP_ORDER_NOTE: &str = "Created via Draft App";

/// Errors that can occur when interacting with the Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed (includes request timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Mutation-level user error (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// Access token rejected by Shopify.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// A GraphQL error returned by the Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response, if provided.
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(|e| {
            if e.path.is_empty() {
                e.message.clone()
            } else {
                let path = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                format!("{} (at {path})", e.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let err = ShopifyError::GraphQL(vec![
            GraphQLError {
                message: "Field not found".to_string(),
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                path: vec![serde_json::Value::String("draftOrderCreate".to_string())],
            },
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID (at draftOrderCreate)"
        );
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_rate_limited_display() {
        let err = ShopifyError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
