//! Customer confirmation email service.
//!
//! Uses SMTP via lettre for delivery with Askama HTML + plain-text templates.
//! Sending is strictly best-effort: the draft order endpoint reports failures
//! through an `emailSent: false` flag and nothing else.

use askama::Template;
use chrono::Datelike;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use thiserror::Error;

use draft_order_core::{Email, ShopDomain};

use crate::config::EmailConfig;
use crate::shopify::DraftOrder;

/// Shown when a line's variant has no image.
const FALLBACK_IMAGE_URL: &str = "https://via.placeholder.com/60";

/// Shopify's synthetic variant title for single-variant products; carries no
/// information, so the summary suppresses it.
const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// HTML template for the order summary email.
#[derive(Template)]
#[template(path = "email/order_summary.html")]
struct OrderSummaryHtml<'a> {
    summary: &'a OrderSummary,
}

/// Plain text template for the order summary email.
#[derive(Template)]
#[template(path = "email/order_summary.txt")]
struct OrderSummaryText<'a> {
    summary: &'a OrderSummary,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailerError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// One rendered line of the order summary.
#[derive(Debug, Clone)]
pub struct SummaryLine {
    pub title: String,
    /// Variant qualifier; `None` for single-variant products.
    pub variant_title: Option<String>,
    pub quantity: i64,
    pub image_url: String,
    /// Line total (`unit price x quantity`) formatted to two decimals.
    pub line_total: String,
    pub currency: String,
}

/// The order summary rendered into the confirmation email.
///
/// Built from the **first** created draft; in double mode the second draft is
/// a discount variation of the same cart, so one summary covers the order.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub greeting_name: String,
    pub shop: String,
    pub lines: Vec<SummaryLine>,
    pub currency: String,
    /// Grand total summed over the lines with decimal arithmetic, not read
    /// back from the platform total. The two must agree to the cent; a
    /// mismatch indicates a line item mapping bug upstream.
    pub total: Decimal,
    pub year: i32,
}

impl OrderSummary {
    /// Build the summary from a created draft order.
    #[must_use]
    pub fn from_draft(shop: &ShopDomain, first_name: Option<&str>, order: &DraftOrder) -> Self {
        let mut total = Decimal::ZERO;

        let lines = order
            .line_items
            .iter()
            .map(|item| {
                let quantity = Decimal::from(item.quantity);
                let line_total = item.unit_price.amount * quantity;
                total += line_total;

                let variant_title = item
                    .variant_title
                    .clone()
                    .filter(|title| title != DEFAULT_VARIANT_TITLE);

                SummaryLine {
                    title: item.title.clone(),
                    variant_title,
                    quantity: item.quantity,
                    image_url: item
                        .image_url
                        .clone()
                        .unwrap_or_else(|| FALLBACK_IMAGE_URL.to_string()),
                    line_total: format!("{line_total:.2}"),
                    currency: item.unit_price.currency_code.clone(),
                }
            })
            .collect();

        let greeting_name = first_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Customer")
            .to_string();

        Self {
            greeting_name,
            shop: shop.as_str().to_string(),
            lines,
            currency: order.total_price.currency_code.clone(),
            total,
            year: chrono::Utc::now().year(),
        }
    }

    /// Grand total formatted to two decimals for display.
    #[must_use]
    pub fn total_display(&self) -> String {
        format!("{:.2}", self.total)
    }
}

/// Email service for customer order confirmations.
#[derive(Clone)]
pub struct Mailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    /// Create a new mailer from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay parameters are invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the draft-order confirmation email.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render, the message cannot be
    /// built, or SMTP delivery fails.
    pub async fn send_order_summary(
        &self,
        to: &Email,
        summary: &OrderSummary,
    ) -> Result<(), MailerError> {
        let html = OrderSummaryHtml { summary }.render()?;
        let text = OrderSummaryText { summary }.render()?;

        // Display name is the shop so the customer recognizes the sender.
        let from = format!("\"{}\" <{}>", summary.shop, self.from_address);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|_| MailerError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| MailerError::InvalidAddress(to.as_str().to_string()))?)
            .subject("Your order is now in draft status")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, "Order summary email sent");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::{DraftOrderLineItem, Money};

    fn money(amount: &str) -> Money {
        Money {
            amount: amount.parse().unwrap(),
            currency_code: "USD".to_string(),
        }
    }

    fn order() -> DraftOrder {
        DraftOrder {
            id: "gid://shopify/DraftOrder/1".to_string(),
            name: "#D1".to_string(),
            invoice_url: None,
            created_at: "2025-06-01T12:00:00Z".to_string(),
            total_price: money("35.00"),
            line_items: vec![
                DraftOrderLineItem {
                    title: "Tea".to_string(),
                    quantity: 3,
                    variant_title: Some("Loose Leaf".to_string()),
                    image_url: Some("https://cdn.example/tea.png".to_string()),
                    unit_price: money("10.00"),
                },
                DraftOrderLineItem {
                    title: "Mug".to_string(),
                    quantity: 1,
                    variant_title: Some("Default Title".to_string()),
                    image_url: None,
                    unit_price: money("5.00"),
                },
            ],
        }
    }

    fn shop() -> ShopDomain {
        ShopDomain::parse("my-store.myshopify.com").unwrap()
    }

    #[test]
    fn test_summary_total_matches_platform_total() {
        let order = order();
        let summary = OrderSummary::from_draft(&shop(), Some("Jo"), &order);

        // The summed total must agree with what Shopify reported.
        assert_eq!(summary.total, order.total_price.amount);
        assert_eq!(summary.total_display(), "35.00");
    }

    #[test]
    fn test_summary_line_totals() {
        let summary = OrderSummary::from_draft(&shop(), Some("Jo"), &order());
        assert_eq!(summary.lines[0].line_total, "30.00");
        assert_eq!(summary.lines[1].line_total, "5.00");
    }

    #[test]
    fn test_summary_suppresses_default_variant_title() {
        let summary = OrderSummary::from_draft(&shop(), Some("Jo"), &order());
        assert_eq!(summary.lines[0].variant_title.as_deref(), Some("Loose Leaf"));
        assert!(summary.lines[1].variant_title.is_none());
    }

    #[test]
    fn test_summary_falls_back_to_placeholder_image() {
        let summary = OrderSummary::from_draft(&shop(), Some("Jo"), &order());
        assert_eq!(summary.lines[1].image_url, FALLBACK_IMAGE_URL);
    }

    #[test]
    fn test_summary_greeting_falls_back_to_customer() {
        let summary = OrderSummary::from_draft(&shop(), None, &order());
        assert_eq!(summary.greeting_name, "Customer");

        let summary = OrderSummary::from_draft(&shop(), Some("  "), &order());
        assert_eq!(summary.greeting_name, "Customer");
    }

    #[test]
    fn test_html_template_renders() {
        let summary = OrderSummary::from_draft(&shop(), Some("Jo"), &order());
        let html = OrderSummaryHtml { summary: &summary }.render().unwrap();

        assert!(html.contains("Hello Jo"));
        assert!(html.contains("Tea - Loose Leaf"));
        assert!(html.contains("USD 35.00"));
        assert!(html.contains("support@my-store.myshopify.com"));
    }

    #[test]
    fn test_text_template_renders() {
        let summary = OrderSummary::from_draft(&shop(), Some("Jo"), &order());
        let text = OrderSummaryText { summary: &summary }.render().unwrap();

        assert!(text.contains("Tea (Loose Leaf) x 3"));
        assert!(text.contains("Total: USD 35.00"));
    }
}
