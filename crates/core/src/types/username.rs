//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too short.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a disallowed character.
    #[error("username may only contain letters, digits, '.', '_' and '-'")]
    InvalidCharacter,
}

/// A marketplace username.
///
/// Usernames are the login identifier and the public handle shown on product
/// listings. They are normalized to lowercase at parse time so lookups are
/// case-insensitive.
///
/// ## Constraints
///
/// - Length: 3-32 characters
/// - Allowed characters: ASCII letters, digits, `.`, `_`, `-`
///
/// ## Examples
///
/// ```
/// use pixelmart_core::Username;
///
/// assert!(Username::parse("alice").is_ok());
/// assert!(Username::parse("pixel.seller-01").is_ok());
/// assert_eq!(Username::parse("Alice").unwrap().as_str(), "alice");
///
/// assert!(Username::parse("").is_err());      // empty
/// assert!(Username::parse("ab").is_err());    // too short
/// assert!(Username::parse("a b").is_err());   // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum length of a username.
    pub const MIN_LENGTH: usize = 3;

    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `Username` from a string.
    ///
    /// The input is lowercased before validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is shorter than 3 or longer than 32 characters
    /// - Contains characters outside `[a-z0-9._-]`
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        let normalized = s.to_ascii_lowercase();

        if normalized.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if normalized.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(UsernameError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Username {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Username {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Username {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("alice").is_ok());
        assert!(Username::parse("bob_42").is_ok());
        assert!(Username::parse("pixel.seller-01").is_ok());
        assert!(Username::parse("abc").is_ok());
        assert!(Username::parse(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn test_parse_lowercases() {
        let name = Username::parse("Alice.Smith").unwrap();
        assert_eq!(name.as_str(), "alice.smith");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Username::parse(""), Err(UsernameError::Empty)));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Username::parse(&"a".repeat(33)),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            Username::parse("has space"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("emoji🙂"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("semi;colon"),
            Err(UsernameError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_display() {
        let name = Username::parse("alice").unwrap();
        assert_eq!(format!("{name}"), "alice");
    }

    #[test]
    fn test_serde_roundtrip() {
        let name = Username::parse("alice").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"alice\"");

        let parsed: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn test_from_str() {
        let name: Username = "alice".parse().unwrap();
        assert_eq!(name.as_str(), "alice");
    }
}
