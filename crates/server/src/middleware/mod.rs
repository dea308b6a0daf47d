//! HTTP middleware stack for the marketplace API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Rate limiting (governor, per route group)
//!
//! Authentication itself is extractor-based: handlers declare `RequireAuth`,
//! `RequireAdmin`, or `RequireCheckoutAuth` parameters instead of relying on
//! a blanket layer.

pub mod auth;
pub mod checkout;
pub mod rate_limit;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth, destroy_session, establish_session};
pub use checkout::{RequireCheckoutAuth, grant_checkout};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use session::create_session_layer;
