//! Authentication service.
//!
//! Registration, login, and password changes over the user repository, plus
//! the checkout step-up secret check. Login deliberately collapses
//! unknown-username and wrong-password into one generic failure.

mod error;
pub mod password;

pub use error::AuthError;
pub use password::{PasswordHashError, hash_password, verify_password};

use sqlx::PgPool;

use pixelmart_core::{Email, Role, UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Input for registering a new account.
#[derive(Debug)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
}

/// Authentication service.
///
/// Handles account registration, credential verification, and password
/// changes.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// New accounts start with the `user` role; sellers and admins are
    /// promoted via `pixelmart-cli admin set-role`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidEmail` if an
    /// identifier fails validation, `AuthError::WeakPassword` if the password
    /// doesn't meet requirements, and `AuthError::UserAlreadyExists` if the
    /// username or email is taken.
    pub async fn register(&self, input: Registration<'_>) -> Result<User, AuthError> {
        let username = Username::parse(input.username)?;
        let email = input.email.map(Email::parse).transpose()?;

        validate_password(input.password)?;
        let password_hash = hash_password(input.password)?;

        let user = self
            .users
            .create(&NewUser {
                username: &username,
                password_hash: &password_hash,
                email: email.as_ref(),
                full_name: input.full_name,
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` whether the username is
    /// unknown or the password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((user, password_hash)) = self.users.get_password_hash(&username).await? else {
            tracing::debug!(username = %username, "login rejected: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &password_hash)? {
            tracing::debug!(username = %username, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Change a user's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password is
    /// wrong, `AuthError::WeakPassword` if the new one fails validation.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        let stored = self
            .users
            .get_password_hash_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(current, &stored)? {
            return Err(AuthError::InvalidCredentials);
        }

        validate_password(new)?;
        let new_hash = hash_password(new)?;
        self.users.update_password(user_id, &new_hash).await?;

        Ok(())
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("Secret123!").is_ok());
    }
}
