use std::{fmt::Display, future::Future, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::AppConfig;

/// Fixed-count, fixed-backoff policy used while the database comes up.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries allowed after the first failed attempt.
    pub max_retries: u32,
    pub backoff: Duration,
}

/// Runs `op` until it succeeds or the failures exceed `policy.max_retries`.
/// The last error is returned when the budget is spent.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut failures: u32 = 0;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                failures += 1;
                warn!(attempt = failures, error = %e, "postgres is unavailable");
                if failures > policy.max_retries {
                    return Err(e);
                }
                info!(backoff_secs = policy.backoff.as_secs(), "backing off before retry");
                tokio::time::sleep(policy.backoff).await;
            }
        }
    }
}

/// Connects the shared pool, retrying per the configured startup policy.
pub async fn connect_with_retry(config: &AppConfig) -> anyhow::Result<PgPool> {
    let policy = RetryPolicy {
        max_retries: config.db.connect_retries,
        backoff: config.db.retry_backoff(),
    };

    let pool = retry(policy, || {
        PgPoolOptions::new()
            .max_connections(config.db.max_connections)
            .connect(&config.database_url)
    })
    .await
    .context("connect to database")?;

    info!("connected to postgres");
    Ok(pool)
}
