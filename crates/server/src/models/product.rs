//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use pixelmart_core::{CurrencyCode, ProductId, UserId};

/// A digital product listing (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// User who listed this product.
    pub seller_id: UserId,
    /// Listing title.
    pub title: String,
    /// Listing description.
    pub description: String,
    /// Price in the currency's standard unit.
    pub price: Decimal,
    /// Listing currency.
    pub currency: CurrencyCode,
    /// Marketplace category (e.g., "icons", "templates", "audio").
    pub category: String,
    /// URL of the digital asset itself.
    pub file_url: Option<String>,
    /// URL of a preview image.
    pub preview_url: Option<String>,
    /// When the product was listed.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Wire representation of a product listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub seller_id: UserId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub currency: CurrencyCode,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            seller_id: product.seller_id,
            title: product.title,
            description: product.description,
            price: product.price,
            currency: product.currency,
            category: product.category,
            file_url: product.file_url,
            preview_url: product.preview_url,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_response_wire_shape() {
        let product = Product {
            id: ProductId::new(1),
            seller_id: UserId::new(2),
            title: "Icon pack".to_owned(),
            description: "200 vector icons".to_owned(),
            price: Decimal::new(1999, 2),
            currency: CurrencyCode::USD,
            category: "icons".to_owned(),
            file_url: None,
            preview_url: Some("https://cdn.example.com/p/1.png".to_owned()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(ProductResponse::from(product)).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.get("sellerId").unwrap(), 2);
        assert_eq!(obj.get("price").unwrap(), "19.99");
        assert!(obj.contains_key("previewUrl"));
        assert!(!obj.contains_key("fileUrl"));
    }
}
