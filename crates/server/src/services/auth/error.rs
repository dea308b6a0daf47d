//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::password::PasswordHashError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] pixelmart_core::UsernameError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] pixelmart_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    ///
    /// Deliberately covers both cases so responses cannot be used for
    /// username enumeration; the distinction only appears in server logs.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Username or email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash(#[from] PasswordHashError),
}
