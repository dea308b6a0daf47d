//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::auth::{PasswordHashError, hash_password};
use crate::services::paypal::PayPalClient;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to hash checkout secret: {0}")]
    CheckoutSecret(#[from] PasswordHashError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    paypal: PayPalClient,
    checkout_secret_hash: String,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The checkout admin secret is hashed exactly once here and the hash is
    /// what handlers verify against; the configuration value is injected, not
    /// read lazily from process globals.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing the checkout secret fails.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, StateError> {
        use secrecy::ExposeSecret;

        let checkout_secret_hash = hash_password(config.checkout_password.expose_secret())?;
        let paypal = PayPalClient::new(config.paypal.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                paypal,
                checkout_secret_hash,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the PayPal API client.
    #[must_use]
    pub fn paypal(&self) -> &PayPalClient {
        &self.inner.paypal
    }

    /// Get the stored hash of the checkout admin secret.
    #[must_use]
    pub fn checkout_secret_hash(&self) -> &str {
        &self.inner.checkout_secret_hash
    }
}
