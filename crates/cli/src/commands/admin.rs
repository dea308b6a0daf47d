//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin user
//! pixelmart-cli admin create -u admin -p 'strong password here'
//!
//! # Promote an existing user to seller
//! pixelmart-cli admin set-role -u someone -r seller
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use pixelmart_core::{Email, Role, Username};
use pixelmart_server::db::users::{NewUser, UserRepository};
use pixelmart_server::services::auth::hash_password;

use super::CommandError;

/// Create a new admin user.
///
/// # Errors
///
/// Returns `CommandError::Invalid` if an input fails validation or the
/// username is taken.
pub async fn create_admin(
    username: &str,
    password: &str,
    email: Option<&str>,
    full_name: Option<&str>,
) -> Result<(), CommandError> {
    let username =
        Username::parse(username).map_err(|e| CommandError::Invalid(e.to_string()))?;
    let email = email
        .map(Email::parse)
        .transpose()
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    if password.len() < 8 {
        return Err(CommandError::Invalid(
            "password must be at least 8 characters".to_owned(),
        ));
    }

    let password_hash =
        hash_password(password).map_err(|e| CommandError::Invalid(e.to_string()))?;

    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    tracing::info!("Creating admin user: {}", username);

    let user = users
        .create(&NewUser {
            username: &username,
            password_hash: &password_hash,
            email: email.as_ref(),
            full_name,
            role: Role::Admin,
        })
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    tracing::info!("Admin user created successfully! ID: {}", user.id);

    Ok(())
}

/// Change an existing user's role.
///
/// # Errors
///
/// Returns `CommandError::Invalid` if the role is unknown or the user does
/// not exist.
pub async fn set_role(username: &str, role: &str) -> Result<(), CommandError> {
    let username =
        Username::parse(username).map_err(|e| CommandError::Invalid(e.to_string()))?;
    let role: Role = role
        .parse()
        .map_err(|_| CommandError::Invalid(format!("invalid role: {role}")))?;

    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    let user = users
        .get_by_username(&username)
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?
        .ok_or_else(|| CommandError::Invalid(format!("no such user: {username}")))?;

    users
        .update_role(user.id, role)
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    tracing::info!("Updated role for {} to {}", username, role);

    Ok(())
}
