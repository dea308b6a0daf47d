//! User profile route handlers.
//!
//! Public profiles are readable by anyone; every mutation carries the
//! ownership-or-admin guard. Password changes additionally verify the
//! current password and are owner-only.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use pixelmart_core::{Email, UserId};

use crate::db::users::{ProfileUpdate, UserRepository};
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{ProductResponse, PublicProfile, UserResponse};
use crate::routes::auth::MessageResponse;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Profile update request body; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

/// Password change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// List all accounts.
///
/// `GET /api/users`
///
/// Admin-only: 401 when not logged in, 403 for any other role.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get a user's public profile.
///
/// `GET /api/users/{id}`
///
/// # Errors
///
/// Returns 404 if the user doesn't exist.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PublicProfile>, AppError> {
    let user = UserRepository::new(state.pool())
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_owned()))?;

    Ok(Json(user.into()))
}

/// Update a user's profile.
///
/// `PATCH /api/users/{id}`
///
/// # Errors
///
/// Returns 403 unless the caller owns the profile or is an admin.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let target = UserId::new(id);
    if !current.can_modify(target) {
        return Err(AppError::Forbidden(
            "You can only update your own profile".to_owned(),
        ));
    }

    let email = body
        .email
        .as_deref()
        .map(Email::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let updated = UserRepository::new(state.pool())
        .update_profile(
            target,
            &ProfileUpdate {
                email: email.as_ref(),
                full_name: body.full_name.as_deref(),
                avatar_url: body.avatar_url.as_deref(),
                bio: body.bio.as_deref(),
            },
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Change a user's password.
///
/// `POST /api/users/{id}/password`
///
/// Owner-only - even admins must not rotate someone's password through this
/// endpoint, since it requires knowing the current one.
///
/// # Errors
///
/// Returns 403 for non-owners, 401 if the current password is wrong, 400 if
/// the new password fails validation.
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let target = UserId::new(id);
    if current.id != target {
        return Err(AppError::Forbidden(
            "You can only change your own password".to_owned(),
        ));
    }

    AuthService::new(state.pool())
        .change_password(target, &body.current_password, &body.new_password)
        .await?;

    tracing::info!(user_id = %target, "password changed");

    Ok(Json(MessageResponse {
        message: "Password updated",
    }))
}

/// List a user's product listings.
///
/// `GET /api/users/{id}/products`
///
/// # Errors
///
/// Returns 404 if the user doesn't exist.
pub async fn list_user_products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    use crate::db::products::{ProductFilter, ProductRepository};

    let seller = UserId::new(id);

    // 404 for unknown users rather than an empty list
    UserRepository::new(state.pool())
        .get_by_id(seller)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_owned()))?;

    let products = ProductRepository::new(state.pool())
        .list(&ProductFilter {
            seller_id: Some(seller),
            ..ProductFilter::default()
        })
        .await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}
