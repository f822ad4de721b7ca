//! Connection pool setup.

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::config::DatabaseConfig;

/// Builds pool options from configuration.
pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
}

/// Parses the database URL and applies the server-side statement timeout.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    let statement_timeout = format!("{}ms", config.statement_timeout.as_millis());

    let options = PgConnectOptions::from_str(&config.url)
        .context("Invalid DATABASE_URL")?
        .options([("statement_timeout", statement_timeout.as_str())]);

    Ok(options)
}

/// Connects to PostgreSQL, retrying with exponential backoff.
///
/// # Errors
///
/// Returns the last connection error once `DB_CONNECT_RETRIES` attempts fail.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options = connect_options(config)?;

    let strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(config.connect_retries.saturating_sub(1));

    let pool = Retry::spawn(strategy, || {
        let options = connect_options.clone();
        async move {
            pool_options(config)
                .connect_with(options)
                .await
                .inspect_err(|e| tracing::warn!(error = %e, "Database connection attempt failed"))
        }
    })
    .await
    .context("Failed to connect to database")?;

    Ok(pool)
}
