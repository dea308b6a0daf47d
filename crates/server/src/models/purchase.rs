//! Purchase domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use pixelmart_core::{CurrencyCode, ProductId, PurchaseId, UserId};

/// A completed purchase (domain type).
///
/// Written once per successful PayPal capture; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Purchase {
    /// Unique purchase ID.
    pub id: PurchaseId,
    /// User who paid.
    pub buyer_id: UserId,
    /// Product that was bought.
    pub product_id: ProductId,
    /// PayPal order ID of the capture.
    pub paypal_order_id: String,
    /// Amount captured.
    pub amount: Decimal,
    /// Currency of the capture.
    pub currency: CurrencyCode,
    /// When the capture completed.
    pub created_at: DateTime<Utc>,
}

/// Wire representation of a purchase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub id: PurchaseId,
    pub buyer_id: UserId,
    pub product_id: ProductId,
    pub paypal_order_id: String,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub created_at: DateTime<Utc>,
}

impl From<Purchase> for PurchaseResponse {
    fn from(purchase: Purchase) -> Self {
        Self {
            id: purchase.id,
            buyer_id: purchase.buyer_id,
            product_id: purchase.product_id,
            paypal_order_id: purchase.paypal_order_id,
            amount: purchase.amount,
            currency: purchase.currency,
            created_at: purchase.created_at,
        }
    }
}
