//! Admin API GraphQL client.
//!
//! One client instance serves every shop; each call carries the target shop
//! domain and the access token resolved for the request.

use std::sync::Arc;

use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;

use draft_order_core::ShopDomain;

use crate::config::ShopifyAppConfig;

use super::{APP_ORDER_NOTE, GraphQLError, ShopifyError};
use super::types::{DraftOrder, DraftOrderInput, RawConnection, RawDraftOrder};

/// Outbound request timeout; expiry surfaces as a creation failure.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Mutation document for draft order creation.
///
/// Projects only the fields the response envelope and the confirmation email
/// consume; `lineItems(first: 250)` covers the Admin API's own per-draft
/// line item ceiling.
const DRAFT_ORDER_CREATE: &str = r"
mutation DraftOrderCreate($input: DraftOrderInput!) {
  draftOrderCreate(input: $input) {
    draftOrder {
      id
      name
      invoiceUrl
      createdAt
      totalPriceSet { shopMoney { amount currencyCode } }
      lineItems(first: 250) {
        edges {
          node {
            title
            quantity
            variant { title image { url } }
            originalUnitPriceSet { shopMoney { amount currencyCode } }
          }
        }
      }
    }
    userErrors { field message }
  }
}
";

/// Query counting drafts created by this app, matched on the fixed note.
const APP_DRAFT_ORDER_COUNT: &str = r"
query AppDraftOrderCount($query: String!) {
  draftOrders(first: 100, query: $query) {
    edges { node { id } }
  }
}
";

/// Minimal read-only query used to probe whether a stored token still works.
const SHOP_PROBE: &str = r"
query ShopProbe {
  shop { name }
}
";

/// Shopify Admin API GraphQL client.
///
/// Cheaply cloneable; holds only the shared HTTP connection pool and the
/// pinned API version.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    api_version: String,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftOrderCreateData {
    draft_order_create: Option<DraftOrderCreatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftOrderCreatePayload {
    draft_order: Option<RawDraftOrder>,
    #[serde(default)]
    user_errors: Vec<UserErrorResponse>,
}

#[derive(Debug, Deserialize)]
struct UserErrorResponse {
    field: Option<Vec<String>>,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftOrderCountData {
    draft_orders: RawConnection<DraftOrderIdNode>,
}

#[derive(Debug, Deserialize)]
struct DraftOrderIdNode {
    #[allow(dead_code)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct ShopProbeData {
    shop: ShopProbeNode,
}

#[derive(Debug, Deserialize)]
struct ShopProbeNode {
    #[allow(dead_code)]
    name: String,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created, which only happens when
    /// the TLS backend fails to initialize.
    #[must_use]
    pub fn new(config: &ShopifyAppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(AdminClientInner {
                client,
                api_version: config.api_version.clone(),
            }),
        }
    }

    fn endpoint(&self, shop: &ShopDomain) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            shop.as_str(),
            self.inner.api_version
        )
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL document against a shop's Admin API.
    async fn execute<T: DeserializeOwned>(
        &self,
        shop: &ShopDomain,
        access_token: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(shop))
            .header("X-Shopify-Access-Token", access_token)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        let graphql_response: GraphQLResponse<T> = response.json().await?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    path: e.path,
                })
                .collect();
            return Err(ShopifyError::GraphQL(converted));
        }

        graphql_response.data.ok_or_else(|| {
            ShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }

    // =========================================================================
    // Draft order methods
    // =========================================================================

    /// Create a draft order on a shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response carries GraphQL
    /// errors, or the mutation reports user errors - any of which aborts the
    /// caller's whole operation.
    #[instrument(skip(self, access_token, input), fields(shop = %shop))]
    pub async fn create_draft_order(
        &self,
        shop: &ShopDomain,
        access_token: &str,
        input: &DraftOrderInput,
    ) -> Result<DraftOrder, ShopifyError> {
        let variables = serde_json::json!({ "input": input });

        let data: DraftOrderCreateData = self
            .execute(shop, access_token, DRAFT_ORDER_CREATE, variables)
            .await?;

        draft_order_from_payload(data)
    }

    /// Count the draft orders this app has created on a shop.
    ///
    /// Matches on the fixed creation note; capped at 100 by the underlying
    /// query, which is all the dashboard surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns errors.
    #[instrument(skip(self, access_token), fields(shop = %shop))]
    pub async fn count_app_draft_orders(
        &self,
        shop: &ShopDomain,
        access_token: &str,
    ) -> Result<usize, ShopifyError> {
        let variables = serde_json::json!({ "query": format!("note:'{APP_ORDER_NOTE}'") });

        let data: DraftOrderCountData = self
            .execute(shop, access_token, APP_DRAFT_ORDER_COUNT, variables)
            .await?;

        Ok(data.draft_orders.edges.len())
    }

    /// Probe a stored access token with a minimal read-only query.
    ///
    /// Used by the authentication fallback path to confirm a persisted token
    /// has not been revoked before spending a mutation on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, access_token), fields(shop = %shop))]
    pub async fn verify_access_token(
        &self,
        shop: &ShopDomain,
        access_token: &str,
    ) -> Result<(), ShopifyError> {
        let _: ShopProbeData = self
            .execute(shop, access_token, SHOP_PROBE, serde_json::json!({}))
            .await?;

        Ok(())
    }
}

/// Convert a `draftOrderCreate` payload into the flat projection, treating
/// user errors and a missing draft as failures.
fn draft_order_from_payload(data: DraftOrderCreateData) -> Result<DraftOrder, ShopifyError> {
    let Some(payload) = data.draft_order_create else {
        return Err(ShopifyError::GraphQL(vec![GraphQLError {
            message: "No draftOrderCreate payload in response".to_string(),
            path: vec![],
        }]));
    };

    if !payload.user_errors.is_empty() {
        let messages: Vec<String> = payload
            .user_errors
            .iter()
            .map(|e| {
                let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
                if field.is_empty() {
                    e.message.clone()
                } else {
                    format!("{}: {}", field, e.message)
                }
            })
            .collect();
        return Err(ShopifyError::UserError(messages.join("; ")));
    }

    payload.draft_order.map(DraftOrder::from).ok_or_else(|| {
        ShopifyError::GraphQL(vec![GraphQLError {
            message: "No draft order returned from create".to_string(),
            path: vec![],
        }])
    })
}
