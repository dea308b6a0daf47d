//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pixelmart_core::{CurrencyCode, ProductId, UserId};

use super::RepositoryError;
use crate::models::Product;

/// Raw `market.products` row.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    seller_id: i32,
    title: String,
    description: String,
    price: Decimal,
    currency: String,
    category: String,
    file_url: Option<String>,
    preview_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let currency: CurrencyCode = row.currency.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            seller_id: UserId::new(row.seller_id),
            title: row.title,
            description: row.description,
            price: row.price,
            currency,
            category: row.category,
            file_url: row.file_url,
            preview_url: row.preview_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, seller_id, title, description, price, currency, category, \
                               file_url, preview_url, created_at, updated_at";

/// Input for creating a product.
#[derive(Debug)]
pub struct NewProduct<'a> {
    pub seller_id: UserId,
    pub title: &'a str,
    pub description: &'a str,
    pub price: Decimal,
    pub currency: CurrencyCode,
    pub category: &'a str,
    pub file_url: Option<&'a str>,
    pub preview_url: Option<&'a str>,
}

/// Partial product update; `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct ProductUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<Decimal>,
    pub category: Option<&'a str>,
    pub file_url: Option<&'a str>,
    pub preview_url: Option<&'a str>,
}

/// Optional listing filters.
#[derive(Debug, Default)]
pub struct ProductFilter<'a> {
    pub category: Option<&'a str>,
    pub seller_id: Option<UserId>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter<'_>) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM market.products
             WHERE ($1::text IS NULL OR category = $1)
               AND ($2::int IS NULL OR seller_id = $2)
             ORDER BY created_at DESC"
        ))
        .bind(filter.category)
        .bind(filter.seller_id.map(|id| id.as_i32()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM market.products WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Create a new product listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new_product: &NewProduct<'_>) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO market.products
                 (seller_id, title, description, price, currency, category, file_url, preview_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(new_product.seller_id.as_i32())
        .bind(new_product.title)
        .bind(new_product.description)
        .bind(new_product.price)
        .bind(new_product.currency.code())
        .bind(new_product.category)
        .bind(new_product.file_url)
        .bind(new_product.preview_url)
        .fetch_one(self.pool)
        .await?;

        Product::try_from(row)
    }

    /// Update a product listing; `None` fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate<'_>,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE market.products
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 price = COALESCE($4, price),
                 category = COALESCE($5, category),
                 file_url = COALESCE($6, file_url),
                 preview_url = COALESCE($7, preview_url),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.title)
        .bind(update.description)
        .bind(update.price)
        .bind(update.category)
        .bind(update.file_url)
        .bind(update.preview_url)
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), Product::try_from)
    }

    /// Delete a product listing.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM market.products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
