//! Session-related types.
//!
//! Types stored in the session for authentication state. The session holds
//! only the numeric user id; the full user row is re-fetched on every request
//! so role and profile changes take effect without re-login.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session keys for authentication data.
pub mod keys {
    /// Key for the logged-in user's id.
    pub const USER_ID: &str = "user_id";

    /// Key for the checkout step-up authorization grant.
    pub const CHECKOUT_GRANT: &str = "checkout_grant";
}

/// A time-limited checkout authorization.
///
/// Issued when the user passes the PayPal admin-password check, stored in
/// the session, and checked on every payment-route request. Expiry is
/// evaluated at the gate rather than trusting a sticky flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutGrant {
    /// When the grant was issued.
    pub granted_at: DateTime<Utc>,
    /// When the grant stops being honored.
    pub expires_at: DateTime<Utc>,
}

impl CheckoutGrant {
    /// Grant lifetime in minutes.
    pub const TTL_MINUTES: i64 = 15;

    /// Issue a new grant valid for [`Self::TTL_MINUTES`] from `now`.
    #[must_use]
    pub fn issue(now: DateTime<Utc>) -> Self {
        Self {
            granted_at: now,
            expires_at: now + Duration::minutes(Self::TTL_MINUTES),
        }
    }

    /// Whether the grant is still honored at `now`.
    #[must_use]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
