//! User domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. The password hash never leaves the repository layer, so no wire
//! view here can leak it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pixelmart_core::{Email, Role, UserId, Username};

/// A marketplace user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login identifier and public handle.
    pub username: Username,
    /// Optional contact email.
    pub email: Option<Email>,
    /// Optional display name.
    pub full_name: Option<String>,
    /// Optional avatar URL.
    pub avatar_url: Option<String>,
    /// Optional profile bio.
    pub bio: Option<String>,
    /// Account role, read fresh from the database on every request.
    pub role: Role,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Ownership-or-admin check used by every mutating endpoint that
    /// references a resource owner.
    #[must_use]
    pub fn can_modify(&self, owner: UserId) -> bool {
        self.id == owner || self.role == Role::Admin
    }
}

/// Wire representation of the authenticated user's own account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub username: Username,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Wire representation of another user's profile.
///
/// Same as [`UserResponse`] minus the email address, which is only shown to
/// the account owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: UserId,
    pub username: Username,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(id: i32, role: Role) -> User {
        User {
            id: UserId::new(id),
            username: Username::parse("alice").unwrap(),
            email: Some(Email::parse("alice@example.com").unwrap()),
            full_name: None,
            avatar_url: None,
            bio: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_modify_own_resource() {
        assert!(user(1, Role::User).can_modify(UserId::new(1)));
    }

    #[test]
    fn test_cannot_modify_others_resource() {
        assert!(!user(1, Role::User).can_modify(UserId::new(2)));
        assert!(!user(1, Role::Seller).can_modify(UserId::new(2)));
    }

    #[test]
    fn test_admin_can_modify_any_resource() {
        assert!(user(1, Role::Admin).can_modify(UserId::new(2)));
    }

    #[test]
    fn test_user_response_has_no_password_field() {
        let json = serde_json::to_value(UserResponse::from(user(1, Role::User))).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("passwordHash"));
        assert_eq!(obj.get("username").unwrap(), "alice");
    }

    #[test]
    fn test_public_profile_omits_email() {
        let json = serde_json::to_value(PublicProfile::from(user(1, Role::Seller))).unwrap();
        assert!(json.as_object().unwrap().get("email").is_none());
    }

    #[test]
    fn test_camel_case_fields() {
        let mut u = user(1, Role::User);
        u.full_name = Some("Alice Smith".to_owned());
        let json = serde_json::to_value(UserResponse::from(u)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("fullName"));
        assert!(obj.contains_key("createdAt"));
    }
}
