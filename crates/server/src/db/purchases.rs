//! Purchase repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pixelmart_core::{CurrencyCode, ProductId, PurchaseId, UserId};

use super::RepositoryError;
use crate::models::Purchase;

/// Raw `market.purchases` row.
#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: i32,
    buyer_id: i32,
    product_id: i32,
    paypal_order_id: String,
    amount: Decimal,
    currency: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = RepositoryError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let currency: CurrencyCode = row.currency.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;

        Ok(Self {
            id: PurchaseId::new(row.id),
            buyer_id: UserId::new(row.buyer_id),
            product_id: ProductId::new(row.product_id),
            paypal_order_id: row.paypal_order_id,
            amount: row.amount,
            currency,
            created_at: row.created_at,
        })
    }
}

const PURCHASE_COLUMNS: &str =
    "id, buyer_id, product_id, paypal_order_id, amount, currency, created_at";

/// Input for recording a purchase.
#[derive(Debug)]
pub struct NewPurchase<'a> {
    pub buyer_id: UserId,
    pub product_id: ProductId,
    pub paypal_order_id: &'a str,
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

/// Repository for purchase database operations.
pub struct PurchaseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PurchaseRepository<'a> {
    /// Create a new purchase repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a completed capture.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the PayPal order was already
    /// recorded (replayed capture), `RepositoryError::Database` otherwise.
    pub async fn create(&self, new_purchase: &NewPurchase<'_>) -> Result<Purchase, RepositoryError> {
        let row = sqlx::query_as::<_, PurchaseRow>(&format!(
            "INSERT INTO market.purchases (buyer_id, product_id, paypal_order_id, amount, currency)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PURCHASE_COLUMNS}"
        ))
        .bind(new_purchase.buyer_id.as_i32())
        .bind(new_purchase.product_id.as_i32())
        .bind(new_purchase.paypal_order_id)
        .bind(new_purchase.amount)
        .bind(new_purchase.currency.code())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order already captured".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Purchase::try_from(row)
    }

    /// List a user's purchases, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_buyer(&self, buyer_id: UserId) -> Result<Vec<Purchase>, RepositoryError> {
        let rows = sqlx::query_as::<_, PurchaseRow>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM market.purchases
             WHERE buyer_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(buyer_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Purchase::try_from).collect()
    }
}
