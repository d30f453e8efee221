//! Shopify global ID construction.
//!
//! The Admin API addresses every resource by a `gid://shopify/<Type>/<id>`
//! URI. Storefront-side payloads (the `/cart.js` document, Liquid customer
//! objects) carry bare numeric ids, so the app namespaces them here before
//! they reach a mutation input.

/// Build a product variant global ID from a numeric variant id.
#[must_use]
pub fn product_variant(id: u64) -> String {
    format!("gid://shopify/ProductVariant/{id}")
}

/// Build a customer global ID from a numeric customer id.
#[must_use]
pub fn customer(id: u64) -> String {
    format!("gid://shopify/Customer/{id}")
}
