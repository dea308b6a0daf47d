//! Marketplace account roles.

use serde::{Deserialize, Serialize};

/// Account role with different permission levels.
///
/// Roles are evaluated freshly on every request from the user row, never
/// cached in the session, so a role change takes effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular buyer account.
    #[default]
    User,
    /// Can list products for sale in addition to buying.
    Seller,
    /// Full access, including other users' resources.
    Admin,
}

impl Role {
    /// Whether this role may create product listings.
    #[must_use]
    pub const fn can_sell(self) -> bool {
        matches!(self, Self::Seller | Self::Admin)
    }

    /// String form as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for role in [Role::User, Role::Seller, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_invalid_role() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_can_sell() {
        assert!(!Role::User.can_sell());
        assert!(Role::Seller.can_sell());
        assert!(Role::Admin.can_sell());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Role::Seller).unwrap();
        assert_eq!(json, "\"seller\"");
    }
}
