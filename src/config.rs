use std::{str::FromStr, time::Duration};

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub storage_timeout_ms: u64,
    pub history_max_days: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or(std::env::var("APP_PORT").ok(), 8080),
            db_max_connections: parse_or(std::env::var("DB_MAX_CONNECTIONS").ok(), 10),
            storage_timeout_ms: parse_or(std::env::var("STORAGE_TIMEOUT_MS").ok(), 5_000),
            history_max_days: parse_or(std::env::var("HISTORY_MAX_DAYS").ok(), 90),
        })
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
