use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub max_connections: u32,
    pub connect_retries: u32,
    pub retry_backoff_secs: u64,
    pub query_timeout_secs: u64,
}

impl DbConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_retries: 10,
            retry_backoff_secs: 2,
            query_timeout_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db: DbConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("DSN"))
            .context("DATABASE_URL (or DSN) must be set")?;

        let defaults = DbConfig::default();
        let db = DbConfig {
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            connect_retries: env_or("DB_CONNECT_RETRIES", defaults.connect_retries),
            retry_backoff_secs: env_or("DB_RETRY_BACKOFF_SECS", defaults.retry_backoff_secs),
            query_timeout_secs: env_or("DB_QUERY_TIMEOUT_SECS", defaults.query_timeout_secs),
        };

        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 80),
            db,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
