//! Mapping a currency code to the observation that stands for its current rate.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use log::debug;

use crate::error::{RateError, RateResult};
use crate::exchange_rate::ExchangeRate;
use crate::store::RateStore;

/// Which row wins when a code has several observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionStrategy {
    /// Highest id, i.e. the most recently inserted row.
    #[default]
    Latest,
    /// Lowest id, the store's natural first row.
    DistinctFirst,
}

impl FromStr for ResolutionStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "first" | "distinct-first" => Ok(Self::DistinctFirst),
            other => bail!("Unknown rate resolution strategy: {other}"),
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::DistinctFirst => write!(f, "first"),
        }
    }
}

/// Source of the single observation backing a code's rate.
#[async_trait]
pub trait ResolveRate: Send + Sync {
    async fn resolve(&self, code: &str) -> RateResult<ExchangeRate>;
}

/// Store-backed resolver applying one strategy to every lookup.
pub struct RateResolver {
    store: Arc<dyn RateStore>,
    strategy: ResolutionStrategy,
}

impl RateResolver {
    pub fn new(store: Arc<dyn RateStore>, strategy: ResolutionStrategy) -> Self {
        Self { store, strategy }
    }

    pub async fn resolve_latest(&self, code: &str) -> RateResult<ExchangeRate> {
        self.store
            .find_latest_by_code(code)
            .await?
            .ok_or_else(|| RateError::unknown_currency(code))
    }

    pub async fn resolve_distinct_first(&self, code: &str) -> RateResult<ExchangeRate> {
        self.store
            .find_distinct_first_by_code(code)
            .await?
            .ok_or_else(|| RateError::unknown_currency(code))
    }
}

#[async_trait]
impl ResolveRate for RateResolver {
    async fn resolve(&self, code: &str) -> RateResult<ExchangeRate> {
        let rate = match self.strategy {
            ResolutionStrategy::Latest => self.resolve_latest(code).await?,
            ResolutionStrategy::DistinctFirst => self.resolve_distinct_first(code).await?,
        };
        debug!(
            "Resolved {} to row {} ({}) using {}",
            code, rate.id, rate.rate, self.strategy
        );
        Ok(rate)
    }
}
