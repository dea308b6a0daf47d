//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! pixelmart-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Migration files live in `crates/server/migrations/`. The tower-sessions
//! table is managed by the session store itself at server startup, not here.

use super::CommandError;

/// Run marketplace database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the connection or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
