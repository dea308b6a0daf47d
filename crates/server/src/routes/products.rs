//! Product route handlers.
//!
//! Listing and reading are public; creation requires a selling role; update
//! and delete carry the same ownership-or-admin guard. Delete is guarded
//! identically to update - sibling mutations never differ in their guards.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use pixelmart_core::{CurrencyCode, ProductId, UserId};

use crate::db::products::{NewProduct, ProductFilter, ProductRepository, ProductUpdate};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{Product, ProductResponse};
use crate::state::AppState;

/// Listing filter query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub seller_id: Option<i32>,
}

/// Product creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub category: String,
    pub file_url: Option<String>,
    pub preview_url: Option<String>,
}

/// Product update request body; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub file_url: Option<String>,
    pub preview_url: Option<String>,
}

/// List products, optionally filtered by category or seller.
///
/// `GET /api/products`
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = ProductRepository::new(state.pool())
        .list(&ProductFilter {
            category: query.category.as_deref(),
            seller_id: query.seller_id.map(UserId::new),
        })
        .await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Get a single product.
///
/// `GET /api/products/{id}`
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = fetch_product(&state, ProductId::new(id)).await?;
    Ok(Json(product.into()))
}

/// Create a product listing.
///
/// `POST /api/products`
///
/// # Errors
///
/// Returns 403 unless the caller has a selling role.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    if !user.role.can_sell() {
        return Err(AppError::Forbidden(
            "A seller account is required to list products".to_owned(),
        ));
    }

    validate_listing(&body.title, &body.category, body.price)?;

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            seller_id: user.id,
            title: body.title.trim(),
            description: &body.description,
            price: body.price,
            currency: body.currency,
            category: &body.category,
            file_url: body.file_url.as_deref(),
            preview_url: body.preview_url.as_deref(),
        })
        .await?;

    tracing::info!(product_id = %product.id, seller_id = %user.id, "product listed");

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Update a product listing.
///
/// `PUT /api/products/{id}`
///
/// # Errors
///
/// Returns 403 unless the caller owns the listing or is an admin.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = fetch_product(&state, ProductId::new(id)).await?;

    if !user.can_modify(product.seller_id) {
        return Err(AppError::Forbidden(
            "You can only modify your own products".to_owned(),
        ));
    }

    if let Some(price) = body.price
        && price <= Decimal::ZERO
    {
        return Err(AppError::BadRequest("price must be positive".to_owned()));
    }

    let updated = ProductRepository::new(state.pool())
        .update(
            product.id,
            &ProductUpdate {
                title: body.title.as_deref(),
                description: body.description.as_deref(),
                price: body.price,
                category: body.category.as_deref(),
                file_url: body.file_url.as_deref(),
                preview_url: body.preview_url.as_deref(),
            },
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Delete a product listing.
///
/// `DELETE /api/products/{id}`
///
/// # Errors
///
/// Returns 403 unless the caller owns the listing or is an admin.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode, AppError> {
    let product = fetch_product(&state, ProductId::new(id)).await?;

    if !user.can_modify(product.seller_id) {
        return Err(AppError::Forbidden(
            "You can only delete your own products".to_owned(),
        ));
    }

    ProductRepository::new(state.pool()).delete(product.id).await?;

    tracing::info!(product_id = %product.id, user_id = %user.id, "product deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_product(state: &AppState, id: ProductId) -> Result<Product, AppError> {
    ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))
}

fn validate_listing(title: &str, category: &str, price: Decimal) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".to_owned()));
    }
    if category.trim().is_empty() {
        return Err(AppError::BadRequest("category must not be empty".to_owned()));
    }
    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be positive".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_listing() {
        assert!(validate_listing("Icon pack", "icons", Decimal::new(999, 2)).is_ok());
        assert!(validate_listing("", "icons", Decimal::new(999, 2)).is_err());
        assert!(validate_listing("Icon pack", " ", Decimal::new(999, 2)).is_err());
        assert!(validate_listing("Icon pack", "icons", Decimal::ZERO).is_err());
        assert!(validate_listing("Icon pack", "icons", Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn test_create_request_defaults_currency() {
        let body: CreateProductRequest = serde_json::from_str(
            r#"{"title":"Pack","description":"d","price":"9.99","category":"icons"}"#,
        )
        .unwrap();
        assert_eq!(body.currency, CurrencyCode::USD);
    }
}
