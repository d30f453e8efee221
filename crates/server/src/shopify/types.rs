//! Wire types for the Admin API draft order operations.
//!
//! Input types serialize to the exact `DraftOrderInput` shape the
//! `draftOrderCreate` mutation expects; optional fields are omitted rather
//! than sent as null. Response types deserialize the connection-shaped
//! payload and flatten it into [`DraftOrder`] for the response envelope and
//! the confirmation email.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use draft_order_core::{Email, gid};

// =============================================================================
// Mutation input
// =============================================================================

/// How a draft order is associated with a customer.
///
/// The platform rejects inputs carrying both a customer id and an email, so
/// the association is an enum rather than two optional fields. An id always
/// wins over an email when the widget sends both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerLinkage {
    /// Link by Shopify customer id (logged-in storefront visitor).
    ById(u64),
    /// Link by email only; Shopify matches or invites the customer.
    ByEmail(Email),
    /// No association; the draft stays anonymous.
    Anonymous,
}

impl CustomerLinkage {
    /// Split into the mutually exclusive `customerId`/`email` input fields.
    fn into_fields(self) -> (Option<String>, Option<String>) {
        match self {
            Self::ById(id) => (Some(gid::customer(id)), None),
            Self::ByEmail(email) => (None, Some(email.as_str().to_owned())),
            Self::Anonymous => (None, None),
        }
    }
}

/// A percentage discount applied to a whole draft order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscountInput {
    pub title: String,
    pub description: String,
    /// Percentage value; the GraphQL field is a Float.
    pub value: f64,
    /// Always "PERCENTAGE"; fixed-amount discounts are not offered.
    pub value_type: &'static str,
}

/// One cart line mapped to a variant global ID.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderLineItemInput {
    pub variant_id: String,
    pub quantity: i64,
}

/// Address input; absent request fields are carried as empty strings so the
/// mutation shape stays stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddressInput {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub company: String,
    pub zip: String,
    pub first_name: String,
    pub last_name: String,
}

/// Input object for the `draftOrderCreate` mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderInput {
    pub line_items: Vec<DraftOrderLineItemInput>,
    pub note: String,
    pub tags: Vec<String>,
    /// Drafts are merchant-side until finalized; never expose them.
    pub visible_to_customer: bool,
    pub shipping_address: MailingAddressInput,
    pub billing_address: MailingAddressInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_discount: Option<AppliedDiscountInput>,
}

impl DraftOrderInput {
    /// Assemble a creation input.
    ///
    /// `tag` is dropped when empty and `discount` when its percentage is not
    /// positive, so unconfigured settings produce no tag and no zero-percent
    /// discount on the order.
    #[must_use]
    pub fn build(
        line_items: Vec<DraftOrderLineItemInput>,
        shipping_address: MailingAddressInput,
        billing_address: MailingAddressInput,
        linkage: CustomerLinkage,
        discount: Option<AppliedDiscountInput>,
        tag: &str,
    ) -> Self {
        let (customer_id, email) = linkage.into_fields();

        Self {
            line_items,
            note: super::APP_ORDER_NOTE.to_string(),
            tags: if tag.is_empty() {
                Vec::new()
            } else {
                vec![tag.to_string()]
            },
            visible_to_customer: false,
            shipping_address,
            billing_address,
            customer_id,
            email,
            applied_discount: discount,
        }
    }
}

// =============================================================================
// Response projection
// =============================================================================

/// A money amount with its currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount; Shopify sends it as a string on the wire.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency_code: String,
}

/// A created draft order, flattened from the mutation payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrder {
    pub id: String,
    pub name: String,
    pub invoice_url: Option<String>,
    pub created_at: String,
    pub total_price: Money,
    pub line_items: Vec<DraftOrderLineItem>,
}

/// One line of a created draft order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderLineItem {
    pub title: String,
    pub quantity: i64,
    /// Variant title when the product has real options ("Small / Red");
    /// `None` for single-variant products.
    pub variant_title: Option<String>,
    pub image_url: Option<String>,
    pub unit_price: Money,
}

// Raw deserialization targets mirroring the GraphQL response shape; they
// never leave this module.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawDraftOrder {
    pub id: String,
    pub name: String,
    pub invoice_url: Option<String>,
    pub created_at: String,
    pub total_price_set: RawMoneyBag,
    pub line_items: RawConnection<RawLineItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawMoneyBag {
    pub shop_money: Money,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawConnection<T> {
    pub edges: Vec<RawEdge<T>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawEdge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawLineItem {
    pub title: String,
    pub quantity: i64,
    pub variant: Option<RawVariant>,
    pub original_unit_price_set: RawMoneyBag,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawVariant {
    pub title: Option<String>,
    pub image: Option<RawImage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawImage {
    pub url: String,
}

impl From<RawDraftOrder> for DraftOrder {
    fn from(raw: RawDraftOrder) -> Self {
        let line_items = raw
            .line_items
            .edges
            .into_iter()
            .map(|edge| {
                let item = edge.node;
                let (variant_title, image_url) = item.variant.map_or((None, None), |v| {
                    (v.title, v.image.map(|image| image.url))
                });

                DraftOrderLineItem {
                    title: item.title,
                    quantity: item.quantity,
                    variant_title,
                    image_url,
                    unit_price: item.original_unit_price_set.shop_money,
                }
            })
            .collect();

        Self {
            id: raw.id,
            name: raw.name,
            invoice_url: raw.invoice_url,
            created_at: raw.created_at,
            total_price: raw.total_price_set.shop_money,
            line_items,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> MailingAddressInput {
        MailingAddressInput {
            address1: "1 Main St".to_string(),
            address2: String::new(),
            city: "Springfield".to_string(),
            province: "IL".to_string(),
            country: "US".to_string(),
            company: String::new(),
            zip: "62701".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
        }
    }

    fn line_items() -> Vec<DraftOrderLineItemInput> {
        vec![DraftOrderLineItemInput {
            variant_id: "gid://shopify/ProductVariant/42".to_string(),
            quantity: 2,
        }]
    }

    #[test]
    fn test_input_links_customer_by_id() {
        let input = DraftOrderInput::build(
            line_items(),
            address(),
            address(),
            CustomerLinkage::ById(123),
            None,
            "vip",
        );

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["customerId"], "gid://shopify/Customer/123");
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_input_links_customer_by_email() {
        let email = Email::parse("jo@example.com").unwrap();
        let input = DraftOrderInput::build(
            line_items(),
            address(),
            address(),
            CustomerLinkage::ByEmail(email),
            None,
            "",
        );

        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("customerId").is_none());
        assert_eq!(json["email"], "jo@example.com");
    }

    #[test]
    fn test_input_anonymous_has_no_linkage() {
        let input = DraftOrderInput::build(
            line_items(),
            address(),
            address(),
            CustomerLinkage::Anonymous,
            None,
            "",
        );

        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("customerId").is_none());
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_input_is_never_customer_visible() {
        let input = DraftOrderInput::build(
            line_items(),
            address(),
            address(),
            CustomerLinkage::Anonymous,
            None,
            "",
        );

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["visibleToCustomer"], false);
        assert_eq!(json["note"], super::super::APP_ORDER_NOTE);
    }

    #[test]
    fn test_input_omits_absent_discount() {
        let input = DraftOrderInput::build(
            line_items(),
            address(),
            address(),
            CustomerLinkage::Anonymous,
            None,
            "",
        );

        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("appliedDiscount").is_none());
        assert_eq!(json["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_input_discount_shape() {
        let discount = AppliedDiscountInput {
            title: "Discount 1".to_string(),
            description: "Discount 1".to_string(),
            value: 10.0,
            value_type: "PERCENTAGE",
        };
        let input = DraftOrderInput::build(
            line_items(),
            address(),
            address(),
            CustomerLinkage::Anonymous,
            Some(discount),
            "bundle",
        );

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["appliedDiscount"]["valueType"], "PERCENTAGE");
        assert_eq!(json["appliedDiscount"]["value"], 10.0);
        assert_eq!(json["tags"], serde_json::json!(["bundle"]));
    }

    #[test]
    fn test_money_roundtrips_as_string() {
        let money: Money =
            serde_json::from_str(r#"{"amount":"12.34","currencyCode":"USD"}"#).unwrap();
        assert_eq!(money.amount, Decimal::new(1234, 2));

        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json["amount"], "12.34");
    }

    #[test]
    fn test_draft_order_flattening() {
        let raw: RawDraftOrder = serde_json::from_str(
            r##"{
                "id": "gid://shopify/DraftOrder/99",
                "name": "#D99",
                "invoiceUrl": null,
                "createdAt": "2025-06-01T12:00:00Z",
                "totalPriceSet": {"shopMoney": {"amount": "30.00", "currencyCode": "USD"}},
                "lineItems": {"edges": [
                    {"node": {
                        "title": "Tea",
                        "quantity": 3,
                        "variant": {"title": "Loose Leaf", "image": {"url": "https://cdn/x.png"}},
                        "originalUnitPriceSet": {"shopMoney": {"amount": "10.00", "currencyCode": "USD"}}
                    }},
                    {"node": {
                        "title": "Mug",
                        "quantity": 1,
                        "variant": null,
                        "originalUnitPriceSet": {"shopMoney": {"amount": "0.00", "currencyCode": "USD"}}
                    }}
                ]}
            }"##,
        )
        .unwrap();

        let order = DraftOrder::from(raw);
        assert_eq!(order.name, "#D99");
        assert_eq!(order.line_items.len(), 2);
        assert_eq!(order.line_items[0].variant_title.as_deref(), Some("Loose Leaf"));
        assert_eq!(
            order.line_items[0].image_url.as_deref(),
            Some("https://cdn/x.png")
        );
        assert!(order.line_items[1].variant_title.is_none());
        assert_eq!(order.total_price.amount, Decimal::new(3000, 2));
    }
}
