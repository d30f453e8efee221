//! Draft order construction.
//!
//! Pure mapping from the widget's request payload plus the shop's settings to
//! one or two `draftOrderCreate` inputs. Everything here is synchronous and
//! side-effect free; the route drives the actual Admin API calls.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use draft_order_core::{Email, gid};

use crate::db::settings::MerchantSetting;
use crate::shopify::{
    AppliedDiscountInput, CustomerLinkage, DraftOrderLineItemInput, MailingAddressInput,
};

// =============================================================================
// Request payload
// =============================================================================

/// Request body for `POST /api/draft-orders`.
///
/// The cart and customer sub-objects mirror what the storefront exposes (the
/// `/cart.js` document and the Liquid customer object), so their fields are
/// snake_case while the widget's own fields are camelCase.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftOrderRequest {
    #[serde(default)]
    pub customer: Option<CustomerPayload>,
    #[serde(default)]
    pub cart: Option<CartPayload>,
    #[serde(default)]
    pub address: Option<AddressPayload>,
    #[serde(default, rename = "billingAddress")]
    pub billing_address: Option<AddressPayload>,
    #[serde(default, rename = "useShipping")]
    pub use_shipping: bool,
    /// Shop domain for the authentication fallback path.
    #[serde(default)]
    pub shop: Option<String>,
}

impl DraftOrderRequest {
    /// The cart lines, empty when the cart object is absent.
    #[must_use]
    pub fn items(&self) -> &[CartItemPayload] {
        self.cart.as_ref().map_or(&[], |cart| cart.items.as_slice())
    }
}

/// Storefront customer data, all fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPayload {
    pub id: Option<u64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// The cart as the widget reads it from `/cart.js`.
#[derive(Debug, Clone, Deserialize)]
pub struct CartPayload {
    #[serde(default)]
    pub items: Vec<CartItemPayload>,
}

/// One cart line.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemPayload {
    pub variant_id: u64,
    pub quantity: i64,
}

/// Address fields as collected by the widget modal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressPayload {
    pub address1: Option<String>,
    /// Second address line; the widget labels it "apartment".
    pub apartment: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub company: Option<String>,
    /// Postal code; the widget labels it "PIN".
    pub pin: Option<String>,
}

// =============================================================================
// Mapping
// =============================================================================

/// Map cart lines 1:1 onto variant-GID line item inputs.
#[must_use]
pub fn line_items(items: &[CartItemPayload]) -> Vec<DraftOrderLineItemInput> {
    items
        .iter()
        .map(|item| DraftOrderLineItemInput {
            variant_id: gid::product_variant(item.variant_id),
            quantity: item.quantity,
        })
        .collect()
}

/// Build the mutation address from widget fields, folding absent values to
/// empty strings. The customer's name rides along on both addresses.
#[must_use]
pub fn mailing_address(
    address: Option<&AddressPayload>,
    customer: Option<&CustomerPayload>,
) -> MailingAddressInput {
    let address = address.cloned().unwrap_or_default();
    let field = |value: Option<String>| value.unwrap_or_default();

    MailingAddressInput {
        address1: field(address.address1),
        address2: field(address.apartment),
        city: field(address.city),
        province: field(address.state),
        country: field(address.country),
        company: field(address.company),
        zip: field(address.pin),
        first_name: customer
            .and_then(|c| c.first_name.clone())
            .unwrap_or_default(),
        last_name: customer
            .and_then(|c| c.last_name.clone())
            .unwrap_or_default(),
    }
}

/// The billing address: identical to shipping when the customer ticked
/// "same as shipping", otherwise built from the separate billing payload.
#[must_use]
pub fn billing_address(request: &DraftOrderRequest, shipping: &MailingAddressInput) -> MailingAddressInput {
    if request.use_shipping {
        shipping.clone()
    } else {
        mailing_address(request.billing_address.as_ref(), request.customer.as_ref())
    }
}

/// How to associate the draft with a customer: platform id when present,
/// else a parseable email, else anonymous.
#[must_use]
pub fn customer_linkage(customer: Option<&CustomerPayload>) -> CustomerLinkage {
    let Some(customer) = customer else {
        return CustomerLinkage::Anonymous;
    };

    if let Some(id) = customer.id {
        return CustomerLinkage::ById(id);
    }

    customer
        .email
        .as_deref()
        .and_then(|raw| Email::parse(raw).ok())
        .map_or(CustomerLinkage::Anonymous, CustomerLinkage::ByEmail)
}

// =============================================================================
// Plan decision
// =============================================================================

/// One draft order to create: its discount percentage, label, and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountTier {
    pub label: &'static str,
    pub percent: Decimal,
    pub tag: String,
}

impl DiscountTier {
    /// The `appliedDiscount` input for this tier, omitted entirely when the
    /// percentage is not positive so no zero-percent discount lands on the
    /// order.
    #[must_use]
    pub fn discount_input(&self) -> Option<AppliedDiscountInput> {
        if self.percent <= Decimal::ZERO {
            return None;
        }

        Some(AppliedDiscountInput {
            title: self.label.to_string(),
            description: self.label.to_string(),
            value: self.percent.to_f64().unwrap_or(0.0),
            value_type: "PERCENTAGE",
        })
    }
}

/// Decide how many drafts to create and with which discount/tag pairs.
///
/// Double mode only engages when both discounts are configured; otherwise a
/// single draft with the single-mode discount/tag is created, which avoids
/// splitting a cart into two zero-discount duplicates when a merchant
/// enables the toggle before filling in the percentages.
#[must_use]
pub fn plan(setting: &MerchantSetting) -> Vec<DiscountTier> {
    if setting.double_draft_orders_enabled
        && setting.discount1 > Decimal::ZERO
        && setting.discount2 > Decimal::ZERO
    {
        vec![
            DiscountTier {
                label: "Discount 1",
                percent: setting.discount1,
                tag: setting.tag1.clone(),
            },
            DiscountTier {
                label: "Discount 2",
                percent: setting.discount2,
                tag: setting.tag2.clone(),
            },
        ]
    } else {
        vec![DiscountTier {
            label: "Single Discount",
            percent: setting.single_discount,
            tag: setting.single_tag.clone(),
        }]
    }
}
