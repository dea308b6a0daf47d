//! Business logic services for the marketplace.

pub mod auth;
pub mod paypal;

pub use auth::{AuthError, AuthService};
pub use paypal::{PayPalClient, PayPalError};
