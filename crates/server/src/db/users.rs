//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pixelmart_core::{Email, Role, UserId, Username};

use super::RepositoryError;
use crate::models::User;

/// Raw `market.users` row.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: Option<String>,
    full_name: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        let role: Role = row
            .role
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid role in database: {e}")))?;

        Ok(Self {
            id: UserId::new(row.id),
            username,
            email,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            bio: row.bio,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, username, email, full_name, avatar_url, bio, role, created_at, updated_at";

/// Input for creating a user.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a Username,
    pub password_hash: &'a str,
    pub email: Option<&'a Email>,
    pub full_name: Option<&'a str>,
    pub role: Role,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct ProfileUpdate<'a> {
    pub email: Option<&'a Email>,
    pub full_name: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub bio: Option<&'a str>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM market.users WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM market.users WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user and their password hash by username, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct RowWithHash {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, RowWithHash>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM market.users WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some((User::try_from(row.user)?, row.password_hash)))
    }

    /// Get a user's password hash by ID, for password changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash_by_id(
        &self,
        id: UserId,
    ) -> Result<Option<String>, RepositoryError> {
        let hash: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM market.users WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        Ok(hash.map(|(h,)| h))
    }

    /// List all users, oldest first.
    ///
    /// Admin-only surface; callers are expected to have checked the role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM market.users ORDER BY created_at ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email already
    /// exists, `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser<'_>) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO market.users (username, password_hash, email, full_name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new_user.username.as_str())
        .bind(new_user.password_hash)
        .bind(new_user.email.map(Email::as_str))
        .bind(new_user.full_name)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username or email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        User::try_from(row)
    }

    /// Update a user's profile fields; `None` fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist,
    /// `RepositoryError::Conflict` if the new email is taken.
    pub async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate<'_>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE market.users
             SET email = COALESCE($2, email),
                 full_name = COALESCE($3, full_name),
                 avatar_url = COALESCE($4, avatar_url),
                 bio = COALESCE($5, bio),
                 updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.email.map(Email::as_str))
        .bind(update.full_name)
        .bind(update.avatar_url)
        .bind(update.bio)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.map_or(Err(RepositoryError::NotFound), User::try_from)
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE market.users SET password_hash = $2, updated_at = now() WHERE id = $1")
                .bind(id.as_i32())
                .bind(password_hash)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Update a user's role.
    ///
    /// Used by the CLI to bootstrap admins and by profile upgrades to seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update_role(&self, id: UserId, role: Role) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE market.users SET role = $2, updated_at = now() WHERE id = $1")
                .bind(id.as_i32())
                .bind(role.as_str())
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
