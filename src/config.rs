//! Runtime configuration read from the environment (and `.env`, if present).

use std::env;
use std::str::FromStr;

use anyhow::{Context, bail};
use chrono::NaiveTime;

use crate::nbu::DEFAULT_NBU_URL;
use crate::resolver::ResolutionStrategy;

pub const DEFAULT_BASE_CURRENCY: &str = "UAH";
pub const DEFAULT_SNAPSHOT_LIMIT: i64 = 61;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub nbu_url: String,
    pub bind_addr: String,
    pub base_currency: String,
    pub snapshot_limit: i64,
    pub resolution: ResolutionStrategy,
    pub refresh_at: NaiveTime,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let snapshot_limit = parse_or(&get, "SNAPSHOT_LIMIT", DEFAULT_SNAPSHOT_LIMIT)?;
        if snapshot_limit <= 0 {
            bail!("SNAPSHOT_LIMIT must be positive, got {snapshot_limit}");
        }

        let refresh_at = match get("REFRESH_AT") {
            Some(v) => NaiveTime::parse_from_str(v.trim(), "%H:%M")
                .with_context(|| format!("Invalid REFRESH_AT {v:?}, expected HH:MM"))?,
            None => NaiveTime::from_hms_opt(6, 0, 0).context("Invalid default refresh time")?,
        };

        let base_currency = get("BASE_CURRENCY")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string());

        Ok(Self {
            database_url: get("DATABASE_URL"),
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5)?,
            nbu_url: get("NBU_API_URL").unwrap_or_else(|| DEFAULT_NBU_URL.to_string()),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            base_currency,
            snapshot_limit,
            resolution: parse_or(&get, "RATE_RESOLUTION", ResolutionStrategy::default())?,
            refresh_at,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {key} {v:?}: {e}")),
        None => Ok(default),
    }
}
